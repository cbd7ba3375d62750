#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy turn planning: finish almost-complete stacks, then fill at random.

use std::collections::HashSet;

use gateclash_core::{BalanceProvider, CellContent, Coord, Rng, Side, UnitClass};
use gateclash_world::{Grid, GRID_COLUMNS, GRID_ROWS};

/// Single step of an enemy turn plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AiAction {
    /// Exchange two cells on the enemy grid. Reserved for future policies;
    /// the current planner never emits it.
    Swap(Coord, Coord),
    /// Place the listed units onto empty cells.
    Spawn(Vec<(Coord, UnitClass)>),
    /// Hand the turn over to the resolution phase.
    EndTurn,
}

/// Ordered plan the enemy executes for one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiMove {
    /// Actions in execution order, always terminated by [`AiAction::EndTurn`].
    pub actions: Vec<AiAction>,
}

/// Plans enemy turns deterministically from a seeded generator.
#[derive(Clone, Debug)]
pub struct AiSystem {
    rng: Rng,
}

struct Completion {
    coord: Coord,
    kind: UnitClass,
}

impl AiSystem {
    /// Creates a planner whose decisions are fully determined by `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            rng: Rng::new(seed),
        }
    }

    /// Decides the enemy's plan for the current board.
    ///
    /// At most `balance.enemy_spawn_per_turn()` placements are planned:
    /// completions of two-of-a-kind vertical windows first, in column-major
    /// scan order, then uniformly random back-row fills with random classes.
    pub fn decide_turn(&mut self, grid: &Grid, balance: &dyn BalanceProvider) -> AiMove {
        let mut actions = Vec::new();
        let placements = self.plan_spawns(grid, balance);
        if !placements.is_empty() {
            actions.push(AiAction::Spawn(placements));
        }
        actions.push(AiAction::EndTurn);
        AiMove { actions }
    }

    fn plan_spawns(&mut self, grid: &Grid, balance: &dyn BalanceProvider) -> Vec<(Coord, UnitClass)> {
        let budget = balance.enemy_spawn_per_turn();
        if budget == 0 {
            return Vec::new();
        }

        let mut placements: Vec<(Coord, UnitClass)> = Vec::new();
        let mut reserved: HashSet<Coord> = HashSet::new();

        for completion in completion_opportunities(grid) {
            if placements.len() >= budget {
                break;
            }
            if reserved.insert(completion.coord) {
                placements.push((completion.coord, completion.kind));
            }
        }

        if placements.len() < budget {
            let back_row = GRID_ROWS as i32 - 1;
            let mut open: Vec<Coord> = (0..GRID_COLUMNS as i32)
                .map(|x| Coord::new(x, back_row))
                .filter(|coord| {
                    grid.content(*coord)
                        .is_some_and(|content| content.is_empty())
                })
                .filter(|coord| !reserved.contains(coord))
                .collect();

            while placements.len() < budget && !open.is_empty() {
                let index = self.rng.next_index(open.len());
                let coord = open.remove(index);
                placements.push((coord, self.random_unit_class()));
            }
        }

        placements
    }

    fn random_unit_class(&mut self) -> UnitClass {
        UnitClass::ALL[self.rng.next_index(UnitClass::ALL.len())]
    }
}

/// Scans every three-cell vertical window for two friendly units of one
/// class plus one empty cell, in column-major order.
fn completion_opportunities(grid: &Grid) -> Vec<Completion> {
    let mut found = Vec::new();
    for x in 0..GRID_COLUMNS as i32 {
        for start_y in 0..=(GRID_ROWS as i32 - 3) {
            if let Some(completion) = window_completion(grid, x, start_y) {
                found.push(completion);
            }
        }
    }
    found
}

fn window_completion(grid: &Grid, x: i32, start_y: i32) -> Option<Completion> {
    let mut units: Vec<(Coord, UnitClass)> = Vec::new();
    let mut empty_coord = None;
    for offset in 0..3 {
        let coord = Coord::new(x, start_y + offset);
        let Some(content) = grid.content(coord) else {
            continue;
        };
        match content {
            CellContent::Unit(unit) if unit.side == Side::Enemy => {
                units.push((coord, unit.kind));
            }
            CellContent::Empty => empty_coord = Some(coord),
            // Walls, attackers, and hostile units disqualify what the
            // window gathered so far; later cells may still re-qualify it.
            _ => {
                empty_coord = None;
                units.clear();
            }
        }
    }

    let coord = empty_coord?;
    if units.len() == 2 && units[0].1 == units[1].1 {
        Some(Completion {
            coord,
            kind: units[0].1,
        })
    } else {
        None
    }
}
