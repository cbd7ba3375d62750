#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless Gateclash battles.
//!
//! The adapter owns the [`TurnContext`] between turns and mutates it only
//! through the core's published operations: it composes player moves out of
//! grid primitives, hands turn transitions to the turn system, and reads the
//! grids, gates, and phase purely for display. Every battle is reproducible
//! from the printed seed; `--emit-replay` additionally captures the player's
//! moves in a transfer string a later `--replay` run can consume.

mod replay;

use anyhow::{Context, Result};
use clap::Parser;
use gateclash_core::{BalanceProvider, CellContent, Coord, Phase, Side, StandardBalance, UnitClass};
use gateclash_system_fusion::FusionSystem;
use gateclash_system_matching::MatchFinder;
use gateclash_system_turn::TurnSystem;
use gateclash_world::{Grid, TurnContext, GRID_COLUMNS, GRID_ROWS};
use rand::{Rng as _, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::replay::{BattleReplay, RecordedMove};

/// Arguments accepted by the battle runner.
#[derive(Debug, Parser)]
#[command(name = "gateclash", about = "Runs a deterministic Gateclash battle headlessly")]
struct Args {
    /// Seed the battle is reconstructed from; drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of full turns before the runner gives up.
    #[arg(long, default_value_t = 60)]
    max_turns: u32,
    /// Replay transfer string produced by a previous `--emit-replay` run.
    #[arg(long, conflicts_with = "seed")]
    replay: Option<String>,
    /// Prints a replay transfer string for this battle on exit.
    #[arg(long)]
    emit_replay: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (seed, script) = match &args.replay {
        Some(encoded) => {
            let replay =
                BattleReplay::decode(encoded).context("could not decode replay string")?;
            (replay.seed, Some(replay.moves))
        }
        None => (args.seed.unwrap_or_else(rand::random), None),
    };
    println!("battle seed: {seed}");

    let recorded = run_battle(seed, script.as_deref(), args.max_turns);

    if args.emit_replay {
        let replay = BattleReplay {
            seed,
            moves: recorded,
        };
        println!("replay: {}", replay.encode());
    }
    Ok(())
}

/// Plays one battle to its end or the turn cap, printing each turn.
///
/// Returns the player moves that were actually applied, for replay capture.
fn run_battle(seed: u64, script: Option<&[RecordedMove]>, max_turns: u32) -> Vec<RecordedMove> {
    let mut system = TurnSystem::new(StandardBalance, seed);
    let finder = MatchFinder::new();
    let fusion = FusionSystem::new();
    let mut context = system.start_battle();
    let mut auto_rng = ChaCha8Rng::seed_from_u64(seed);
    let mut scripted = script.map(|moves| moves.iter().copied());
    let mut recorded = Vec::new();

    println!();
    println!("opening position");
    print!("{}", render_battle(&context));

    for turn in 1..=max_turns {
        while context.phase == Phase::PlayerInput && context.player_moves_remaining > 0 {
            let next = match scripted.as_mut() {
                Some(moves) => moves.next(),
                None => pick_auto_move(&context.player_grid, &mut auto_rng),
            };
            let Some(chosen) = next else {
                break;
            };
            if apply_player_move(&mut context, &finder, &fusion, &StandardBalance, chosen) {
                recorded.push(chosen);
            } else if script.is_none() {
                break;
            }
        }

        system.end_player_turn(&mut context);
        system.perform_enemy_turn(&mut context, &finder, &fusion);

        println!();
        println!("turn {turn}");
        print!("{}", render_battle(&context));

        if context.phase == Phase::GameOver {
            break;
        }
    }

    println!();
    println!("{}", outcome_line(&context));
    recorded
}

/// Picks a random legal move: a player unit on a front cell, sent to a
/// different column that still has room.
fn pick_auto_move(grid: &Grid, rng: &mut ChaCha8Rng) -> Option<RecordedMove> {
    let movable: Vec<Coord> = (0..GRID_COLUMNS as i32)
        .filter_map(|x| grid.front_coord(Side::Player, x))
        .filter(|coord| {
            matches!(
                grid.content(*coord),
                Some(CellContent::Unit(unit)) if unit.side == Side::Player
            )
        })
        .collect();
    if movable.is_empty() {
        return None;
    }
    let from = movable[rng.gen_range(0..movable.len())];

    let destinations: Vec<i32> = (0..GRID_COLUMNS as i32)
        .filter(|&x| x != from.x())
        .filter(|&x| grid.next_insertion_coord(Side::Player, x).is_some())
        .collect();
    if destinations.is_empty() {
        return None;
    }
    let to_column = destinations[rng.gen_range(0..destinations.len())];
    Some(RecordedMove { from, to_column })
}

/// Applies one player move by composing core grid operations.
///
/// Mirrors the interactive flow: the moved unit leaves its front cell, both
/// touched columns re-pack, the unit lands on the destination's insertion
/// slot, a move is spent, and any resulting triples fuse immediately.
fn apply_player_move(
    context: &mut TurnContext,
    finder: &MatchFinder,
    fusion: &FusionSystem,
    balance: &dyn BalanceProvider,
    chosen: RecordedMove,
) -> bool {
    if context.phase != Phase::PlayerInput || context.player_moves_remaining <= 0 {
        return false;
    }
    if !context.player_grid.is_front_cell(chosen.from, Side::Player) {
        return false;
    }
    let Some(CellContent::Unit(unit)) = context.player_grid.content(chosen.from) else {
        return false;
    };
    if unit.side != Side::Player {
        return false;
    }
    if chosen.to_column < 0
        || chosen.to_column >= GRID_COLUMNS as i32
        || chosen.to_column == chosen.from.x()
    {
        return false;
    }

    context
        .player_grid
        .collapse_column(chosen.to_column, Side::Player);
    let Some(slot) = context
        .player_grid
        .next_insertion_coord(Side::Player, chosen.to_column)
    else {
        return false;
    };
    context
        .player_grid
        .set_content(CellContent::Empty, chosen.from);
    context
        .player_grid
        .collapse_column(chosen.from.x(), Side::Player);
    context
        .player_grid
        .set_content(CellContent::Unit(unit), slot);
    context
        .player_grid
        .collapse_column(chosen.to_column, Side::Player);
    context.player_moves_remaining -= 1;

    let matches = finder.find_matches(&context.player_grid, Side::Player);
    if !matches.is_empty() {
        let _ = fusion.resolve(&matches, &mut context.player_grid, Side::Player, balance);
    }
    context.player_grid.collapse_all(Side::Player);
    true
}

fn outcome_line(context: &TurnContext) -> String {
    if context.gates.hit_points(Side::Enemy) <= 0 {
        "the enemy gate falls; the player wins".to_owned()
    } else if context.gates.hit_points(Side::Player) <= 0 {
        "the player gate falls; the enemy wins".to_owned()
    } else {
        "turn cap reached; both gates stand".to_owned()
    }
}

/// Draws both boards facing each other, enemy on top, the shared battle line
/// in the middle, and each side's gate beyond its own back row.
fn render_battle(context: &TurnContext) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  enemy gate: {} hp\n",
        context.gates.hit_points(Side::Enemy)
    ));
    out.push_str(&render_grid(&context.enemy_grid));
    out.push_str("  --------\n");
    out.push_str(&render_grid(&context.player_grid));
    out.push_str(&format!(
        "  player gate: {} hp (moves left: {})\n",
        context.gates.hit_points(Side::Player),
        context.player_moves_remaining
    ));
    out
}

fn render_grid(grid: &Grid) -> String {
    let mut out = String::new();
    for y in (0..GRID_ROWS as i32).rev() {
        out.push_str("  ");
        for x in 0..GRID_COLUMNS as i32 {
            let content = grid.content(Coord::new(x, y)).unwrap_or(CellContent::Empty);
            out.push(cell_glyph(content));
        }
        out.push('\n');
    }
    out
}

fn cell_glyph(content: CellContent) -> char {
    match content {
        CellContent::Empty => '.',
        CellContent::Unit(unit) => class_glyph(unit.kind, unit.side),
        CellContent::Wall(wall) => match wall.side {
            Side::Player => '=',
            Side::Enemy => '#',
        },
        CellContent::Attacker(attacker) => match attacker.side {
            Side::Player => '^',
            Side::Enemy => 'v',
        },
    }
}

fn class_glyph(kind: UnitClass, side: Side) -> char {
    let glyph = match kind {
        UnitClass::Warrior => 'w',
        UnitClass::Archer => 'a',
        UnitClass::Knight => 'k',
    };
    match side {
        Side::Player => glyph,
        Side::Enemy => glyph.to_ascii_uppercase(),
    }
}
