#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle state for Gateclash: the cell grids and the gates.
//!
//! Each side owns one [`Grid`]; the pair, together with the [`GateState`]
//! and the current [`Phase`], forms the [`TurnContext`] that the turn system
//! mutates in place. Grids treat out-of-bounds access as a silent no-op so
//! every operation stays total.

use gateclash_core::{CellContent, Coord, Phase, Side};

/// Number of columns in every battle grid.
pub const GRID_COLUMNS: usize = 8;
/// Number of rows in every battle grid.
pub const GRID_ROWS: usize = 6;

/// Fixed-size cell matrix owned by one side of the battle.
///
/// Columns are addressed by `x` and rows by `y`. Row zero is the player's
/// own edge and the last row is the enemy's; gravity packs each column
/// toward its owner's edge, so the two sides stack in opposite directions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: [[CellContent; GRID_ROWS]; GRID_COLUMNS],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Creates a grid with every cell empty.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [[CellContent::Empty; GRID_ROWS]; GRID_COLUMNS],
        }
    }

    /// Reports whether `coord` addresses a cell inside the grid.
    #[must_use]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        self.slot(coord).is_some()
    }

    /// Returns the content at `coord`, or `None` when out of bounds.
    #[must_use]
    pub fn content(&self, coord: Coord) -> Option<CellContent> {
        self.slot(coord).map(|(x, y)| self.cells[x][y])
    }

    /// Writes `content` into the cell at `coord`.
    ///
    /// Out-of-bounds writes are ignored.
    pub fn set_content(&mut self, content: CellContent, coord: Coord) {
        if let Some((x, y)) = self.slot(coord) {
            self.cells[x][y] = content;
        }
    }

    /// Exchanges the contents of two distinct in-bounds cells.
    ///
    /// Returns `false` without touching the grid when either coordinate is
    /// out of bounds or both name the same cell.
    #[must_use]
    pub fn swap(&mut self, a: Coord, b: Coord) -> bool {
        let (Some(slot_a), Some(slot_b)) = (self.slot(a), self.slot(b)) else {
            return false;
        };
        if a == b {
            return false;
        }
        let held = self.cells[slot_a.0][slot_a.1];
        self.cells[slot_a.0][slot_a.1] = self.cells[slot_b.0][slot_b.1];
        self.cells[slot_b.0][slot_b.1] = held;
        true
    }

    /// Packs every column toward `toward`'s own edge, removing interior gaps.
    pub fn collapse_all(&mut self, toward: Side) {
        for x in 0..GRID_COLUMNS as i32 {
            self.collapse_column(x, toward);
        }
    }

    /// Packs one column toward `toward`'s own edge, preserving the relative
    /// order of its occupants.
    pub fn collapse_column(&mut self, x: i32, toward: Side) {
        if x < 0 || x >= GRID_COLUMNS as i32 {
            return;
        }
        let column = x as usize;
        let order = Self::rows_from_edge(toward);

        let mut packed: Vec<CellContent> = Vec::with_capacity(GRID_ROWS);
        for &y in &order {
            let content = self.cells[column][y as usize];
            if !content.is_empty() {
                packed.push(content);
            }
        }
        for (offset, &y) in order.iter().enumerate() {
            self.cells[column][y as usize] =
                packed.get(offset).copied().unwrap_or(CellContent::Empty);
        }
    }

    /// Nearest occupied cell to `side`'s own edge in the given column.
    #[must_use]
    pub fn front_coord(&self, side: Side, x: i32) -> Option<Coord> {
        Self::rows_from_edge(side)
            .into_iter()
            .map(|y| Coord::new(x, y))
            .find(|coord| {
                self.content(*coord)
                    .is_some_and(|content| !content.is_empty())
            })
    }

    /// Nearest empty cell to `side`'s own edge in the given column, or
    /// `None` when the column is full or out of bounds.
    #[must_use]
    pub fn next_insertion_coord(&self, side: Side, x: i32) -> Option<Coord> {
        Self::rows_from_edge(side)
            .into_iter()
            .map(|y| Coord::new(x, y))
            .find(|coord| self.content(*coord).is_some_and(|content| content.is_empty()))
    }

    /// Reports whether `coord` is the front cell of its column for `side`.
    #[must_use]
    pub fn is_front_cell(&self, coord: Coord, side: Side) -> bool {
        self.front_coord(side, coord.x()) == Some(coord)
    }

    fn slot(&self, coord: Coord) -> Option<(usize, usize)> {
        if coord.x() >= 0
            && coord.x() < GRID_COLUMNS as i32
            && coord.y() >= 0
            && coord.y() < GRID_ROWS as i32
        {
            Some((coord.x() as usize, coord.y() as usize))
        } else {
            None
        }
    }

    /// Row indices ordered from `side`'s own edge outward.
    fn rows_from_edge(side: Side) -> [i32; GRID_ROWS] {
        let mut order = [0; GRID_ROWS];
        for (index, row) in order.iter_mut().enumerate() {
            *row = match side {
                Side::Player => index as i32,
                Side::Enemy => (GRID_ROWS - 1 - index) as i32,
            };
        }
        order
    }
}

/// Hit points remaining on each side's gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateState {
    player_hp: i32,
    enemy_hp: i32,
}

impl GateState {
    /// Creates gates with both sides at `hit_points`.
    #[must_use]
    pub const fn new(hit_points: i32) -> Self {
        Self {
            player_hp: hit_points,
            enemy_hp: hit_points,
        }
    }

    /// Hit points remaining on `side`'s gate.
    #[must_use]
    pub const fn hit_points(&self, side: Side) -> i32 {
        match side {
            Side::Player => self.player_hp,
            Side::Enemy => self.enemy_hp,
        }
    }

    /// Applies `amount` damage to `side`'s gate.
    pub fn apply_damage(&mut self, side: Side, amount: i32) {
        match side {
            Side::Player => self.player_hp -= amount,
            Side::Enemy => self.enemy_hp -= amount,
        }
    }

    /// Reports whether either gate has fallen.
    #[must_use]
    pub const fn breached(&self) -> bool {
        self.player_hp <= 0 || self.enemy_hp <= 0
    }
}

/// Complete mutable state of one battle.
///
/// Owned by the orchestrating caller between turns and mutated in place by
/// the turn system; read accessors on the fields drive presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnContext {
    /// Grid owned by the player side.
    pub player_grid: Grid,
    /// Grid owned by the enemy side.
    pub enemy_grid: Grid,
    /// Hit points remaining on both gates.
    pub gates: GateState,
    /// Phase the battle is currently in.
    pub phase: Phase,
    /// Moves the player may still spend this turn.
    pub player_moves_remaining: i32,
}
