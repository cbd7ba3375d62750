#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Converts matched triples into attackers and walls, in place.

use gateclash_core::{Attacker, BalanceProvider, CellContent, Coord, Side, Wall};
use gateclash_system_matching::MatchResults;
use gateclash_world::Grid;

/// Everything one fusion pass changed, for callers driving presentation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FusionOutcome {
    /// Attackers created this pass, with their landing coordinates.
    pub attackers: Vec<(Coord, Attacker)>,
    /// Wall segments written this pass, one entry per cell.
    pub walls: Vec<(Coord, Wall)>,
    /// Coordinates cleared by vertical fusion.
    pub cleared: Vec<Coord>,
}

/// Applies match results to a grid, spending triples on new pieces.
#[derive(Clone, Copy, Debug, Default)]
pub struct FusionSystem;

impl FusionSystem {
    /// Creates a new fusion system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fuses every matched triple on `grid` for `side`.
    ///
    /// Vertical triples are cleared and replaced by a single attacker on
    /// their middle cell; horizontal triples are overwritten whole by a
    /// three-cell wall. Both passes consume the same pre-fusion match
    /// snapshot, and vertical fusion runs first, so a coordinate claimed by
    /// both ends up holding the wall.
    pub fn resolve(
        &self,
        matches: &MatchResults,
        grid: &mut Grid,
        side: Side,
        balance: &dyn BalanceProvider,
    ) -> FusionOutcome {
        let mut outcome = FusionOutcome::default();

        for triplet in &matches.vertical {
            let attacker = Attacker {
                side,
                kind: triplet.kind,
                countdown: balance.base_countdown(triplet.kind),
                damage: balance.base_damage(triplet.kind),
            };
            for &coord in &triplet.coords {
                grid.set_content(CellContent::Empty, coord);
                outcome.cleared.push(coord);
            }
            let middle = triplet.middle();
            grid.set_content(CellContent::Attacker(attacker), middle);
            outcome.attackers.push((middle, attacker));
        }

        for triplet in &matches.horizontal {
            let wall = Wall {
                side,
                kind: triplet.kind,
                hit_points: balance.wall_hit_points(triplet.kind),
            };
            for &coord in &triplet.coords {
                grid.set_content(CellContent::Wall(wall), coord);
                outcome.walls.push((coord, wall));
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::FusionSystem;
    use gateclash_core::{BalanceProvider, CellContent, Coord, Side, Unit, UnitClass};
    use gateclash_system_matching::MatchFinder;
    use gateclash_world::Grid;

    struct TestBalance;

    impl BalanceProvider for TestBalance {
        fn gate_hit_points(&self) -> i32 {
            10
        }

        fn player_moves_per_turn(&self) -> i32 {
            3
        }

        fn enemy_spawn_per_turn(&self) -> usize {
            2
        }

        fn base_damage(&self, kind: UnitClass) -> i32 {
            match kind {
                UnitClass::Warrior => 4,
                UnitClass::Archer => 5,
                UnitClass::Knight => 6,
            }
        }

        fn base_countdown(&self, kind: UnitClass) -> i32 {
            match kind {
                UnitClass::Warrior => 7,
                UnitClass::Archer => 8,
                UnitClass::Knight => 9,
            }
        }

        fn wall_hit_points(&self, kind: UnitClass) -> i32 {
            match kind {
                UnitClass::Warrior => 11,
                UnitClass::Archer => 12,
                UnitClass::Knight => 13,
            }
        }
    }

    fn place_units(grid: &mut Grid, side: Side, cells: &[(i32, i32, UnitClass)]) {
        for &(x, y, kind) in cells {
            grid.set_content(CellContent::Unit(Unit { side, kind }), Coord::new(x, y));
        }
    }

    #[test]
    fn vertical_triple_becomes_an_attacker_on_the_middle_cell() {
        let mut grid = Grid::new();
        place_units(
            &mut grid,
            Side::Player,
            &[
                (1, 2, UnitClass::Archer),
                (1, 3, UnitClass::Archer),
                (1, 4, UnitClass::Archer),
            ],
        );
        let matches = MatchFinder::new().find_matches(&grid, Side::Player);
        let outcome =
            FusionSystem::new().resolve(&matches, &mut grid, Side::Player, &TestBalance);

        assert_eq!(grid.content(Coord::new(1, 2)), Some(CellContent::Empty));
        assert_eq!(grid.content(Coord::new(1, 4)), Some(CellContent::Empty));
        let Some(CellContent::Attacker(attacker)) = grid.content(Coord::new(1, 3)) else {
            panic!("middle cell should hold the new attacker");
        };
        assert_eq!(attacker.side, Side::Player);
        assert_eq!(attacker.kind, UnitClass::Archer);
        assert_eq!(attacker.countdown, TestBalance.base_countdown(UnitClass::Archer));
        assert_eq!(attacker.damage, TestBalance.base_damage(UnitClass::Archer));

        assert_eq!(outcome.attackers.len(), 1);
        assert_eq!(outcome.attackers[0].0, Coord::new(1, 3));
        assert_eq!(outcome.cleared.len(), 3);
        assert!(outcome.walls.is_empty());
    }

    #[test]
    fn horizontal_triple_becomes_three_wall_cells() {
        let mut grid = Grid::new();
        place_units(
            &mut grid,
            Side::Enemy,
            &[
                (4, 5, UnitClass::Knight),
                (5, 5, UnitClass::Knight),
                (6, 5, UnitClass::Knight),
            ],
        );
        let matches = MatchFinder::new().find_matches(&grid, Side::Enemy);
        let outcome = FusionSystem::new().resolve(&matches, &mut grid, Side::Enemy, &TestBalance);

        for x in 4..=6 {
            let Some(CellContent::Wall(wall)) = grid.content(Coord::new(x, 5)) else {
                panic!("cell ({x}, 5) should hold a wall segment");
            };
            assert_eq!(wall.side, Side::Enemy);
            assert_eq!(wall.kind, UnitClass::Knight);
            assert_eq!(wall.hit_points, TestBalance.wall_hit_points(UnitClass::Knight));
        }
        assert_eq!(outcome.walls.len(), 3);
        assert!(outcome.cleared.is_empty());
    }

    #[test]
    fn overlapping_vertical_and_horizontal_triples_leave_a_wall() {
        // Column 2 and row 2 each hold a warrior triple sharing (2, 2). The
        // vertical pass clears and plants its attacker first; the horizontal
        // wall write lands second and wins the shared cell.
        let mut grid = Grid::new();
        place_units(
            &mut grid,
            Side::Player,
            &[
                (2, 1, UnitClass::Warrior),
                (2, 2, UnitClass::Warrior),
                (2, 3, UnitClass::Warrior),
                (1, 2, UnitClass::Warrior),
                (3, 2, UnitClass::Warrior),
            ],
        );
        let matches = MatchFinder::new().find_matches(&grid, Side::Player);
        assert_eq!(matches.vertical.len(), 1);
        assert_eq!(matches.horizontal.len(), 1);

        let outcome =
            FusionSystem::new().resolve(&matches, &mut grid, Side::Player, &TestBalance);

        assert!(
            matches!(grid.content(Coord::new(2, 2)), Some(CellContent::Wall(_))),
            "the shared cell is overwritten by the later horizontal pass"
        );
        assert_eq!(grid.content(Coord::new(2, 1)), Some(CellContent::Empty));
        assert_eq!(grid.content(Coord::new(2, 3)), Some(CellContent::Empty));
        assert!(
            matches!(grid.content(Coord::new(1, 2)), Some(CellContent::Wall(_)))
                && matches!(grid.content(Coord::new(3, 2)), Some(CellContent::Wall(_)))
        );
        // The outcome still reports the attacker; the caller sees both
        // fusions even though the board keeps only the wall.
        assert_eq!(outcome.attackers.len(), 1);
        assert_eq!(outcome.walls.len(), 3);
    }
}
