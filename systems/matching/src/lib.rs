#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Row and column scanning that decomposes unit streaks into triples.

use gateclash_core::{CellContent, Coord, Side, UnitClass};
use gateclash_world::{Grid, GRID_COLUMNS, GRID_ROWS};

/// Three same-side, same-class contiguous cells consumed together by fusion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchTriplet {
    /// Coordinates of the three matched cells in scan order.
    pub coords: [Coord; 3],
    /// Class shared by the matched units.
    pub kind: UnitClass,
}

impl MatchTriplet {
    /// Middle coordinate of the triple, where a fused attacker lands.
    #[must_use]
    pub const fn middle(&self) -> Coord {
        self.coords[1]
    }
}

/// Disjoint vertical and horizontal triples found by one scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchResults {
    /// Triples aligned along columns, in column-major scan order.
    pub vertical: Vec<MatchTriplet>,
    /// Triples aligned along rows, in row-major scan order.
    pub horizontal: Vec<MatchTriplet>,
}

impl MatchResults {
    /// Reports whether the scan found nothing to fuse.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }
}

/// Scans grids for fusable triples of friendly units.
///
/// The column pass and the row pass run over the same grid snapshot, so a
/// cell can appear in one vertical and one horizontal triple of the same
/// result. Within a streak, triples are consumed greedily from the near end:
/// four in a row yield one triple, not two overlapping ones.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchFinder;

impl MatchFinder {
    /// Creates a new match finder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds every non-overlapping triple `side` currently has on `grid`.
    #[must_use]
    pub fn find_matches(&self, grid: &Grid, side: Side) -> MatchResults {
        let mut results = MatchResults::default();
        for x in 0..GRID_COLUMNS as i32 {
            scan_line(
                grid,
                side,
                (0..GRID_ROWS as i32).map(|y| Coord::new(x, y)),
                &mut results.vertical,
            );
        }
        for y in 0..GRID_ROWS as i32 {
            scan_line(
                grid,
                side,
                (0..GRID_COLUMNS as i32).map(|x| Coord::new(x, y)),
                &mut results.horizontal,
            );
        }
        results
    }
}

fn scan_line(
    grid: &Grid,
    side: Side,
    coords: impl Iterator<Item = Coord>,
    found: &mut Vec<MatchTriplet>,
) {
    let mut streak: Vec<(Coord, UnitClass)> = Vec::new();
    for coord in coords {
        match grid.content(coord) {
            Some(CellContent::Unit(unit)) if unit.side == side => {
                streak.push((coord, unit.kind));
            }
            _ => {
                consume_triplets(&streak, found);
                streak.clear();
            }
        }
    }
    consume_triplets(&streak, found);
}

/// Greedily decomposes a streak into non-overlapping triples.
fn consume_triplets(streak: &[(Coord, UnitClass)], found: &mut Vec<MatchTriplet>) {
    let mut index = 0;
    while index + 2 < streak.len() {
        let (first, kind) = streak[index];
        if streak[index + 1].1 == kind && streak[index + 2].1 == kind {
            found.push(MatchTriplet {
                coords: [first, streak[index + 1].0, streak[index + 2].0],
                kind,
            });
            index += 3;
        } else {
            index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchFinder, MatchTriplet};
    use gateclash_core::{Attacker, CellContent, Coord, Side, Unit, UnitClass, Wall};
    use gateclash_world::Grid;

    fn place_units(grid: &mut Grid, side: Side, cells: &[(i32, i32, UnitClass)]) {
        for &(x, y, kind) in cells {
            grid.set_content(CellContent::Unit(Unit { side, kind }), Coord::new(x, y));
        }
    }

    fn column_triplet(x: i32, start_y: i32, kind: UnitClass) -> MatchTriplet {
        MatchTriplet {
            coords: [
                Coord::new(x, start_y),
                Coord::new(x, start_y + 1),
                Coord::new(x, start_y + 2),
            ],
            kind,
        }
    }

    #[test]
    fn streak_of_seven_decomposes_into_two_disjoint_triples() {
        let mut grid = Grid::new();
        // Row 2 reads [W,W,W,W,A,A,A] left to right.
        place_units(
            &mut grid,
            Side::Enemy,
            &[
                (0, 2, UnitClass::Warrior),
                (1, 2, UnitClass::Warrior),
                (2, 2, UnitClass::Warrior),
                (3, 2, UnitClass::Warrior),
                (4, 2, UnitClass::Archer),
                (5, 2, UnitClass::Archer),
                (6, 2, UnitClass::Archer),
            ],
        );
        let results = MatchFinder::new().find_matches(&grid, Side::Enemy);

        assert_eq!(
            results.horizontal,
            vec![
                MatchTriplet {
                    coords: [Coord::new(0, 2), Coord::new(1, 2), Coord::new(2, 2)],
                    kind: UnitClass::Warrior,
                },
                MatchTriplet {
                    coords: [Coord::new(4, 2), Coord::new(5, 2), Coord::new(6, 2)],
                    kind: UnitClass::Archer,
                },
            ],
            "the fourth warrior is left over; a four-streak yields one triple"
        );
        assert!(results.vertical.is_empty());
    }

    #[test]
    fn four_streak_yields_one_triple_from_the_near_end() {
        let mut grid = Grid::new();
        place_units(
            &mut grid,
            Side::Enemy,
            &[
                (0, 0, UnitClass::Warrior),
                (0, 1, UnitClass::Warrior),
                (0, 2, UnitClass::Warrior),
                (0, 3, UnitClass::Warrior),
            ],
        );
        let results = MatchFinder::new().find_matches(&grid, Side::Enemy);
        assert_eq!(
            results.vertical,
            vec![column_triplet(0, 0, UnitClass::Warrior)]
        );
    }

    #[test]
    fn interrupted_streak_yields_nothing() {
        let mut grid = Grid::new();
        place_units(
            &mut grid,
            Side::Player,
            &[
                (3, 0, UnitClass::Knight),
                (3, 1, UnitClass::Knight),
                (3, 2, UnitClass::Warrior),
                (3, 3, UnitClass::Knight),
            ],
        );
        let results = MatchFinder::new().find_matches(&grid, Side::Player);
        assert!(results.is_empty());
    }

    #[test]
    fn opposing_units_break_a_streak() {
        let mut grid = Grid::new();
        place_units(
            &mut grid,
            Side::Player,
            &[(0, 0, UnitClass::Archer), (0, 1, UnitClass::Archer)],
        );
        place_units(&mut grid, Side::Enemy, &[(0, 2, UnitClass::Archer)]);
        place_units(&mut grid, Side::Player, &[(0, 3, UnitClass::Archer)]);

        let results = MatchFinder::new().find_matches(&grid, Side::Player);
        assert!(results.is_empty());
    }

    #[test]
    fn walls_and_attackers_break_streaks() {
        let mut grid = Grid::new();
        place_units(
            &mut grid,
            Side::Player,
            &[(2, 0, UnitClass::Warrior), (2, 1, UnitClass::Warrior)],
        );
        grid.set_content(
            CellContent::Wall(Wall {
                side: Side::Player,
                kind: UnitClass::Warrior,
                hit_points: 2,
            }),
            Coord::new(2, 2),
        );
        place_units(
            &mut grid,
            Side::Player,
            &[(4, 0, UnitClass::Knight), (5, 0, UnitClass::Knight)],
        );
        grid.set_content(
            CellContent::Attacker(Attacker {
                side: Side::Player,
                kind: UnitClass::Knight,
                countdown: 1,
                damage: 3,
            }),
            Coord::new(6, 0),
        );

        let results = MatchFinder::new().find_matches(&grid, Side::Player);
        assert!(results.is_empty());
    }

    #[test]
    fn row_and_column_passes_are_independent() {
        let mut grid = Grid::new();
        // A cross of warriors centered at (2, 2).
        place_units(
            &mut grid,
            Side::Enemy,
            &[
                (2, 1, UnitClass::Warrior),
                (2, 2, UnitClass::Warrior),
                (2, 3, UnitClass::Warrior),
                (1, 2, UnitClass::Warrior),
                (3, 2, UnitClass::Warrior),
            ],
        );

        let results = MatchFinder::new().find_matches(&grid, Side::Enemy);
        assert_eq!(results.vertical, vec![column_triplet(2, 1, UnitClass::Warrior)]);
        assert_eq!(
            results.horizontal,
            vec![MatchTriplet {
                coords: [Coord::new(1, 2), Coord::new(2, 2), Coord::new(3, 2)],
                kind: UnitClass::Warrior,
            }],
            "the shared center cell appears in both passes"
        );
    }

    #[test]
    fn wrong_side_sees_no_matches() {
        let mut grid = Grid::new();
        place_units(
            &mut grid,
            Side::Enemy,
            &[
                (0, 0, UnitClass::Archer),
                (1, 0, UnitClass::Archer),
                (2, 0, UnitClass::Archer),
            ],
        );
        let results = MatchFinder::new().find_matches(&grid, Side::Player);
        assert!(results.is_empty());
    }
}
