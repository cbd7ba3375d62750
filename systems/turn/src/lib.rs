#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Phase state machine that drives a battle turn by turn.
//!
//! The turn system owns the specialised systems and the balance table and is
//! the only writer of [`TurnContext`] phase transitions. Calls made outside
//! their required phase leave the context untouched, guarding against
//! out-of-order external callers without reporting an error.

use gateclash_core::{BalanceProvider, CellContent, Coord, Phase, Side, Unit, UnitClass};
use gateclash_system_ai::{AiAction, AiMove, AiSystem};
use gateclash_system_board_init::BoardInitializer;
use gateclash_system_combat::CombatSystem;
use gateclash_system_fusion::FusionSystem;
use gateclash_system_matching::MatchFinder;
use gateclash_world::{GateState, Grid, TurnContext};

/// Stream constant separating the enemy planner's generator from the board
/// initializer's when both derive from one top-level seed.
const AI_SEED_STREAM: u64 = 0x7c3a_9d11_58b4_e6f2;

/// Drives the battle phase machine, delegating to the specialised systems.
#[derive(Debug)]
pub struct TurnSystem<B: BalanceProvider> {
    combat: CombatSystem,
    ai: AiSystem,
    board_initializer: BoardInitializer,
    balance: B,
}

impl<B: BalanceProvider> TurnSystem<B> {
    /// Creates a turn system whose battles replay identically from `seed`.
    ///
    /// The board initializer and the enemy planner each own an independent
    /// generator derived from the one top-level seed, so restarting with the
    /// same seed reconstructs both.
    #[must_use]
    pub fn new(balance: B, seed: u64) -> Self {
        Self {
            combat: CombatSystem::new(),
            ai: AiSystem::new(seed ^ AI_SEED_STREAM),
            board_initializer: BoardInitializer::new(seed),
            balance,
        }
    }

    /// Builds both boards and opens the battle awaiting player input.
    #[must_use]
    pub fn start_battle(&mut self) -> TurnContext {
        let player_grid = self.board_initializer.make_initial_grid(Side::Player);
        let enemy_grid = self.board_initializer.make_initial_grid(Side::Enemy);
        TurnContext {
            player_grid,
            enemy_grid,
            gates: GateState::new(self.balance.gate_hit_points()),
            phase: Phase::PlayerInput,
            player_moves_remaining: self.balance.player_moves_per_turn(),
        }
    }

    /// Closes the player input phase and resolves player-side countdowns.
    ///
    /// Ends the battle if a gate falls, otherwise hands the turn to the
    /// enemy and refills the player's move budget. A call outside
    /// [`Phase::PlayerInput`] is a no-op.
    pub fn end_player_turn(&mut self, context: &mut TurnContext) {
        if context.phase != Phase::PlayerInput {
            return;
        }
        context.phase = Phase::PlayerResolve;
        self.resolve_countdowns(Side::Player, context);
        if context.phase == Phase::GameOver {
            return;
        }
        context.phase = Phase::EnemyInput;
        context.player_moves_remaining = self.balance.player_moves_per_turn();
    }

    /// Runs the enemy plan, fuses any resulting triples, and ends the enemy
    /// turn in one stroke.
    ///
    /// A call outside [`Phase::EnemyInput`] is a no-op.
    pub fn perform_enemy_turn(
        &mut self,
        context: &mut TurnContext,
        match_finder: &MatchFinder,
        fusion_system: &FusionSystem,
    ) {
        if context.phase != Phase::EnemyInput {
            return;
        }
        let plan = self.ai.decide_turn(&context.enemy_grid, &self.balance);
        apply_enemy_move(&plan, context);
        context.enemy_grid.collapse_all(Side::Enemy);

        let matches = match_finder.find_matches(&context.enemy_grid, Side::Enemy);
        if !matches.is_empty() {
            let _ = fusion_system.resolve(
                &matches,
                &mut context.enemy_grid,
                Side::Enemy,
                &self.balance,
            );
            context.enemy_grid.collapse_all(Side::Enemy);
        }

        self.end_enemy_turn(context);
    }

    /// Resolves enemy-side countdowns and returns control to the player.
    ///
    /// A call outside [`Phase::EnemyInput`] is a no-op.
    pub fn end_enemy_turn(&mut self, context: &mut TurnContext) {
        if context.phase != Phase::EnemyInput {
            return;
        }
        context.phase = Phase::EnemyResolve;
        self.resolve_countdowns(Side::Enemy, context);
        if context.phase != Phase::GameOver {
            context.phase = Phase::PlayerInput;
        }
    }

    fn resolve_countdowns(&mut self, side: Side, context: &mut TurnContext) {
        match side {
            Side::Player => self.combat.resolve_countdowns(
                &mut context.player_grid,
                &mut context.enemy_grid,
                &mut context.gates,
                Side::Player,
            ),
            Side::Enemy => self.combat.resolve_countdowns(
                &mut context.enemy_grid,
                &mut context.player_grid,
                &mut context.gates,
                Side::Enemy,
            ),
        }
        if context.gates.breached() {
            context.phase = Phase::GameOver;
        }
    }
}

fn apply_enemy_move(plan: &AiMove, context: &mut TurnContext) {
    for action in &plan.actions {
        match action {
            AiAction::Swap(a, b) => {
                let _ = context.enemy_grid.swap(*a, *b);
            }
            AiAction::Spawn(placements) => {
                apply_enemy_spawns(placements, &mut context.enemy_grid);
                for (coord, _) in placements {
                    context.enemy_grid.collapse_column(coord.x(), Side::Enemy);
                }
            }
            AiAction::EndTurn => {}
        }
    }
}

/// Applies spawn placements, silently skipping any that target a cell that
/// is occupied or out of bounds.
fn apply_enemy_spawns(placements: &[(Coord, UnitClass)], grid: &mut Grid) {
    for &(coord, kind) in placements {
        if !grid
            .content(coord)
            .is_some_and(|content| content.is_empty())
        {
            continue;
        }
        grid.set_content(
            CellContent::Unit(Unit {
                side: Side::Enemy,
                kind,
            }),
            coord,
        );
    }
}
