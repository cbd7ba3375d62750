#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gateclash battle engine.
//!
//! This crate defines the cell and unit data model both boards are built
//! from, the turn phase machine, the balance capability the simulation
//! systems consume, and the deterministic generator used wherever the
//! simulation draws random numbers. The authoritative grids live in the
//! world crate; the systems crates mutate them exclusively through these
//! shared types.

use serde::{Deserialize, Serialize};

const SEED_INCREMENT: u64 = 0x9e37_79b9_7f4a_7c15;
const MIX_MULTIPLIER_ONE: u64 = 0xbf58_476d_1ce4_e5b9;
const MIX_MULTIPLIER_TWO: u64 = 0x94d0_49bb_1331_11eb;

/// Identifies which combatant owns a grid, unit, or gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The human-controlled side, packed toward row zero.
    Player,
    /// The machine-controlled side, packed toward the last row.
    Enemy,
}

impl Side {
    /// Returns the side seated across the battlefield.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Combat discipline a unit belongs to, used to index balance tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitClass {
    /// Mid-damage, mid-speed line fighter.
    Warrior,
    /// Fast, low-damage skirmisher.
    Archer,
    /// Slow, high-damage shock trooper.
    Knight,
}

impl UnitClass {
    /// Every unit class in roster order.
    pub const ALL: [Self; 3] = [Self::Warrior, Self::Archer, Self::Knight];
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    x: i32,
    y: i32,
}

impl Coord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

/// Basic unit occupying a single cell until it is merged away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unit {
    /// Side that owns the unit.
    pub side: Side,
    /// Class the unit was drafted into.
    pub kind: UnitClass,
}

/// Stationary barrier formed by a horizontal triple merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wall {
    /// Side that owns the wall.
    pub side: Side,
    /// Class of the units that merged into the wall.
    pub kind: UnitClass,
    /// Damage the wall can still absorb before it crumbles.
    pub hit_points: i32,
}

/// Ranged unit formed by a vertical triple merge.
///
/// An attacker charges in place, ticking its countdown once per resolution
/// pass, and launches toward the opposing gate when the countdown expires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attacker {
    /// Side that owns the attacker.
    pub side: Side,
    /// Class of the units that merged into the attacker.
    pub kind: UnitClass,
    /// Resolution passes remaining until the attacker launches.
    pub countdown: i32,
    /// Damage dealt to whatever the attacker finally strikes.
    pub damage: i32,
}

/// Exhaustive description of what occupies a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellContent {
    /// Nothing occupies the cell.
    Empty,
    /// A basic unit occupies the cell.
    Unit(Unit),
    /// A defensive wall segment occupies the cell.
    Wall(Wall),
    /// A charging attacker occupies the cell.
    Attacker(Attacker),
}

impl CellContent {
    /// Reports whether the cell holds nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Strictly sequential phase machine a battle advances through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The player is spending moves; external input is accepted.
    PlayerInput,
    /// Player-side countdowns are being resolved.
    PlayerResolve,
    /// The enemy planner is deciding and applying its turn.
    EnemyInput,
    /// Enemy-side countdowns are being resolved.
    EnemyResolve,
    /// A gate has fallen; no further calls mutate the battle.
    GameOver,
}

/// Capability interface supplying tuning numbers to the battle systems.
///
/// Injected at construction so Fusion, Combat, and AI stay free of hardcoded
/// numbers and can be exercised against fake tables in tests.
pub trait BalanceProvider {
    /// Hit points each gate starts the battle with.
    fn gate_hit_points(&self) -> i32;
    /// Moves the player may spend per turn.
    fn player_moves_per_turn(&self) -> i32;
    /// Maximum number of units the enemy may spawn per turn.
    fn enemy_spawn_per_turn(&self) -> usize;
    /// Damage an attacker of the given class deals on impact.
    fn base_damage(&self, kind: UnitClass) -> i32;
    /// Resolution passes an attacker of the given class charges for.
    fn base_countdown(&self, kind: UnitClass) -> i32;
    /// Damage a wall of the given class absorbs before crumbling.
    fn wall_hit_points(&self, kind: UnitClass) -> i32;
}

/// Tuning table used by shipping battles.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardBalance;

impl BalanceProvider for StandardBalance {
    fn gate_hit_points(&self) -> i32 {
        20
    }

    fn player_moves_per_turn(&self) -> i32 {
        3
    }

    fn enemy_spawn_per_turn(&self) -> usize {
        2
    }

    fn base_damage(&self, kind: UnitClass) -> i32 {
        match kind {
            UnitClass::Warrior => 2,
            UnitClass::Archer => 1,
            UnitClass::Knight => 3,
        }
    }

    fn base_countdown(&self, kind: UnitClass) -> i32 {
        match kind {
            UnitClass::Warrior => 2,
            UnitClass::Archer => 1,
            UnitClass::Knight => 3,
        }
    }

    fn wall_hit_points(&self, kind: UnitClass) -> i32 {
        match kind {
            UnitClass::Warrior => 2,
            UnitClass::Archer => 1,
            UnitClass::Knight => 3,
        }
    }
}

/// Deterministic counter-based random number generator.
///
/// Advances a 64-bit counter by a golden-ratio increment and mixes it with
/// two xor-shift-multiply rounds, so two generators constructed from the same
/// seed emit identical sequences on every platform. Board generation and
/// enemy planning each own one of these; neither ever touches a time or
/// platform entropy source.
#[derive(Clone, Copy, Debug)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Creates a generator whose output is fully determined by `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Produces the next raw 64-bit value in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SEED_INCREMENT);
        let mut mixed = self.state;
        mixed = (mixed ^ (mixed >> 30)).wrapping_mul(MIX_MULTIPLIER_ONE);
        mixed = (mixed ^ (mixed >> 27)).wrapping_mul(MIX_MULTIPLIER_TWO);
        mixed ^ (mixed >> 31)
    }

    /// Produces a uniformly distributed index in `[0, upper_bound)`.
    ///
    /// A zero bound yields zero rather than trapping.
    pub fn next_index(&mut self, upper_bound: usize) -> usize {
        if upper_bound == 0 {
            return 0;
        }
        (self.next_u64() % upper_bound as u64) as usize
    }
}
