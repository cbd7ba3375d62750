#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded board population that never opens with a ready-made triple.

use gateclash_core::{CellContent, Coord, Rng, Side, Unit, UnitClass};
use gateclash_world::{Grid, GRID_COLUMNS, GRID_ROWS};

const PLAYER_EMPTY_TARGET: usize = 6;

/// Builds freshly randomized battle grids, fully determined by a seed.
///
/// Cells are filled column by column, row by row; a candidate class is
/// rejected when the two cells immediately to its left or immediately below
/// already hold friendly units of that class, so no placement completes a
/// triple against cells placed before it.
#[derive(Clone, Debug)]
pub struct BoardInitializer {
    rng: Rng,
}

impl BoardInitializer {
    /// Creates an initializer whose boards are fully determined by `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            rng: Rng::new(seed),
        }
    }

    /// Produces the initial grid for `side`, gravity-collapsed and ready for
    /// play.
    ///
    /// The enemy board keeps its back row empty for later spawns; the player
    /// board is carved down to [`PLAYER_EMPTY_TARGET`] empty cells so the
    /// opening position has room to maneuver.
    pub fn make_initial_grid(&mut self, side: Side) -> Grid {
        let mut grid = Grid::new();
        for x in 0..GRID_COLUMNS as i32 {
            for y in 0..GRID_ROWS as i32 {
                if Self::leave_empty(side, y) {
                    continue;
                }
                self.place_unit_if_possible(side, Coord::new(x, y), &mut grid);
            }
        }

        if side == Side::Player {
            self.carve_additional_empties(&mut grid, PLAYER_EMPTY_TARGET, side);
        }

        grid.collapse_all(side);
        grid
    }

    fn leave_empty(side: Side, y: i32) -> bool {
        match side {
            Side::Player => false,
            Side::Enemy => y == GRID_ROWS as i32 - 1,
        }
    }

    fn place_unit_if_possible(&mut self, side: Side, coord: Coord, grid: &mut Grid) {
        let mut options: Vec<UnitClass> = UnitClass::ALL.to_vec();
        while !options.is_empty() {
            let index = self.rng.next_index(options.len());
            let candidate = options.remove(index);
            if !Self::creates_match(grid, coord, candidate, side) {
                grid.set_content(
                    CellContent::Unit(Unit {
                        side,
                        kind: candidate,
                    }),
                    coord,
                );
                return;
            }
        }
        // Roster exhausted: the cell stays empty.
    }

    fn creates_match(grid: &Grid, coord: Coord, candidate: UnitClass, side: Side) -> bool {
        let left_pair = [
            Coord::new(coord.x() - 1, coord.y()),
            Coord::new(coord.x() - 2, coord.y()),
        ];
        let below_pair = [
            Coord::new(coord.x(), coord.y() - 1),
            Coord::new(coord.x(), coord.y() - 2),
        ];
        Self::pair_matches(grid, side, candidate, left_pair)
            || Self::pair_matches(grid, side, candidate, below_pair)
    }

    fn pair_matches(grid: &Grid, side: Side, candidate: UnitClass, pair: [Coord; 2]) -> bool {
        pair.into_iter()
            .all(|coord| holds_matching_unit(grid, coord, side, candidate))
    }

    fn carve_additional_empties(&mut self, grid: &mut Grid, target: usize, side: Side) {
        let mut empties = count_empty_cells(grid);
        while empties < target {
            let coord = Coord::new(
                self.rng.next_index(GRID_COLUMNS) as i32,
                self.rng.next_index(GRID_ROWS) as i32,
            );
            if Self::leave_empty(side, coord.y()) {
                continue;
            }
            if !matches!(grid.content(coord), Some(CellContent::Unit(_))) {
                continue;
            }
            grid.set_content(CellContent::Empty, coord);
            empties += 1;
        }
        grid.collapse_all(side);
    }
}

fn holds_matching_unit(grid: &Grid, coord: Coord, side: Side, kind: UnitClass) -> bool {
    matches!(
        grid.content(coord),
        Some(CellContent::Unit(unit)) if unit.side == side && unit.kind == kind
    )
}

fn count_empty_cells(grid: &Grid) -> usize {
    let mut total = 0;
    for x in 0..GRID_COLUMNS as i32 {
        for y in 0..GRID_ROWS as i32 {
            if grid
                .content(Coord::new(x, y))
                .is_some_and(|content| content.is_empty())
            {
                total += 1;
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::{count_empty_cells, BoardInitializer, PLAYER_EMPTY_TARGET};
    use gateclash_core::{CellContent, Coord, Side};
    use gateclash_world::{GRID_COLUMNS, GRID_ROWS};

    #[test]
    fn same_seed_reproduces_the_same_boards() {
        for seed in [0, 1, 7, 0xdead_beef, u64::MAX] {
            let mut first = BoardInitializer::new(seed);
            let mut second = BoardInitializer::new(seed);
            assert_eq!(
                first.make_initial_grid(Side::Player),
                second.make_initial_grid(Side::Player)
            );
            assert_eq!(
                first.make_initial_grid(Side::Enemy),
                second.make_initial_grid(Side::Enemy)
            );
        }
    }

    #[test]
    fn player_board_opens_with_exactly_the_target_empties() {
        for seed in 0..32 {
            let mut initializer = BoardInitializer::new(seed);
            let grid = initializer.make_initial_grid(Side::Player);
            assert_eq!(count_empty_cells(&grid), PLAYER_EMPTY_TARGET);
        }
    }

    #[test]
    fn player_columns_pack_toward_row_zero() {
        let mut initializer = BoardInitializer::new(99);
        let grid = initializer.make_initial_grid(Side::Player);
        for x in 0..GRID_COLUMNS as i32 {
            let mut seen_empty = false;
            for y in 0..GRID_ROWS as i32 {
                let empty = grid
                    .content(Coord::new(x, y))
                    .is_some_and(|content| content.is_empty());
                if seen_empty {
                    assert!(empty, "occupied cell above a gap at column {x}");
                }
                seen_empty |= empty;
            }
        }
    }

    #[test]
    fn enemy_board_leaves_one_row_per_column_open() {
        let mut initializer = BoardInitializer::new(5);
        let grid = initializer.make_initial_grid(Side::Enemy);
        for x in 0..GRID_COLUMNS as i32 {
            // One row was held back per column; collapse packs it to row 0.
            assert_eq!(grid.content(Coord::new(x, 0)), Some(CellContent::Empty));
            for y in 1..GRID_ROWS as i32 {
                assert!(grid
                    .content(Coord::new(x, y))
                    .is_some_and(|content| !content.is_empty()));
            }
        }
    }
}
