#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Countdown resolution: attacker launches, collisions, and gate damage.

use gateclash_core::{Attacker, CellContent, Coord, Side};
use gateclash_world::{GateState, Grid, GRID_COLUMNS, GRID_ROWS};

/// Resolves one side's attacker countdowns for the turn.
///
/// Every attacker belonging to the side ticks down by one. An expired
/// attacker needs a clear lane ahead on its own board; a friendly occupant
/// anywhere ahead delays it for a tick instead. With a clear lane it crosses
/// into the opponent's board and either grinds a wall, destroys the first
/// occupant it meets, or — with nothing in the way — strikes the gate.
#[derive(Clone, Copy, Debug, Default)]
pub struct CombatSystem;

impl CombatSystem {
    /// Creates a new combat system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks every one of `side`'s attackers on `grid`, launching those
    /// whose countdown expires, then re-packs both boards.
    pub fn resolve_countdowns(
        &self,
        grid: &mut Grid,
        opponent_grid: &mut Grid,
        gates: &mut GateState,
        side: Side,
    ) {
        for x in 0..GRID_COLUMNS as i32 {
            for y in 0..GRID_ROWS as i32 {
                let coord = Coord::new(x, y);
                let Some(CellContent::Attacker(mut attacker)) = grid.content(coord) else {
                    continue;
                };
                if attacker.side != side {
                    continue;
                }

                attacker.countdown -= 1;
                if attacker.countdown <= 0 {
                    grid.set_content(CellContent::Empty, coord);
                    advance(attacker, coord, grid, opponent_grid, gates, side);
                } else {
                    grid.set_content(CellContent::Attacker(attacker), coord);
                }
            }
        }

        grid.collapse_all(side);
        opponent_grid.collapse_all(side.opponent());
    }
}

fn advance(
    attacker: Attacker,
    start: Coord,
    grid: &mut Grid,
    opponent_grid: &mut Grid,
    gates: &mut GateState,
    side: Side,
) {
    let step = travel_step(side);

    // Anything friendly ahead keeps the attacker home this tick, with the
    // countdown clamped so it retries instead of firing at zero.
    let mut y = start.y() + step;
    while let Some(content) = grid.content(Coord::new(start.x(), y)) {
        if content.is_empty() {
            y += step;
            continue;
        }
        let delayed = Attacker {
            countdown: attacker.countdown.max(1),
            ..attacker
        };
        grid.set_content(CellContent::Attacker(delayed), start);
        return;
    }

    let mut y = entry_row(side);
    while let Some(content) = opponent_grid.content(Coord::new(start.x(), y)) {
        let coord = Coord::new(start.x(), y);
        match content {
            CellContent::Empty => y += step,
            CellContent::Wall(mut wall) => {
                wall.hit_points -= attacker.damage;
                let remains = if wall.hit_points <= 0 {
                    CellContent::Empty
                } else {
                    CellContent::Wall(wall)
                };
                opponent_grid.set_content(remains, coord);
                return;
            }
            CellContent::Unit(_) | CellContent::Attacker(_) => {
                opponent_grid.set_content(CellContent::Empty, coord);
                return;
            }
        }
    }

    // Clear lane all the way through: the blow lands on the gate.
    gates.apply_damage(side.opponent(), attacker.damage);
}

fn travel_step(side: Side) -> i32 {
    match side {
        Side::Player => 1,
        Side::Enemy => -1,
    }
}

/// Row at which `side`'s attackers enter the opponent board.
fn entry_row(side: Side) -> i32 {
    match side {
        Side::Player => 0,
        Side::Enemy => GRID_ROWS as i32 - 1,
    }
}
