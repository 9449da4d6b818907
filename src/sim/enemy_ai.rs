//! Enemy move selection and execution.
//!
//! Selection interprets the enemy's declared `BehaviorPattern` against
//! its move table and the battle RNG; nothing about cycling or
//! repetition is hard-coded here. Damage ranges are rolled at intent
//! time so the locked-in intent is exactly what later resolves.

use tracing::warn;

use crate::content::{BehaviorPattern, EnemyDefinition, MoveDefinition, MoveKind};
use crate::core::{BattleState, EnemyIntent, Side};
use crate::interp::ActionInterpreter;
use crate::mechanics::{deal_damage, gain_block};

/// What an executed move did, for the combat loop's trigger dispatch.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveOutcome {
    /// The move dealt attack damage (fires on-attacked triggers).
    pub attacked: bool,
    /// Player HP actually lost to the attack.
    pub hp_lost: i32,
}

/// Per-combat move selection state: one move history per enemy slot.
#[derive(Debug, Default)]
pub struct EnemyAi {
    histories: Vec<Vec<String>>,
}

impl EnemyAi {
    #[must_use]
    pub fn new(enemy_count: usize) -> Self {
        Self {
            histories: vec![Vec::new(); enemy_count],
        }
    }

    /// Select and lock in the next move for one enemy.
    ///
    /// Rolls ranged damage now and writes the concrete `EnemyIntent` so
    /// agents can read exactly what will happen.
    pub fn determine_intent(
        &mut self,
        battle: &mut BattleState,
        enemy_idx: usize,
        def: &EnemyDefinition,
    ) {
        if def.moves.is_empty() {
            warn!(enemy = %def.id, "enemy has no moves");
            return;
        }

        let history = &self.histories[enemy_idx];
        let move_id = select_move(def, history, battle);
        let Some(mv) = def.find_move(&move_id) else {
            warn!(enemy = %def.id, move_id = %move_id, "pattern names unknown move");
            return;
        };

        let damage = match (mv.damage_min, mv.damage_max) {
            (Some(lo), Some(hi)) => Some(battle.rng.random_int(lo, hi.max(lo))),
            _ => mv.damage,
        };

        battle.enemies[enemy_idx].intent = Some(EnemyIntent {
            kind: kind_name(mv.kind).to_string(),
            damage,
            hits: mv.hits.unwrap_or(1).max(1),
            block: mv.block,
        });
        battle.enemies[enemy_idx].current_move = Some(mv.id.clone());
        self.histories[enemy_idx].push(mv.id.clone());
    }

    /// Resolve one enemy's locked intent.
    pub fn execute_move(
        &mut self,
        interp: &mut ActionInterpreter,
        battle: &mut BattleState,
        enemy_idx: usize,
        def: &EnemyDefinition,
    ) -> MoveOutcome {
        let Some(move_id) = battle.enemies[enemy_idx].current_move.take() else {
            return MoveOutcome::default();
        };
        let Some(intent) = battle.enemies[enemy_idx].intent.take() else {
            return MoveOutcome::default();
        };
        let Some(mv) = def.find_move(&move_id).cloned() else {
            return MoveOutcome::default();
        };

        let mut outcome = MoveOutcome::default();

        if matches!(mv.kind, MoveKind::Attack | MoveKind::AttackDefend) {
            if let Some(damage) = intent.damage {
                outcome.attacked = true;
                outcome.hp_lost = deal_damage(
                    battle,
                    Side::Enemy(enemy_idx),
                    Side::Player,
                    damage,
                    intent.hits,
                );
            }
        }

        if matches!(mv.kind, MoveKind::Defend | MoveKind::AttackDefend) {
            if let Some(block) = intent.block {
                gain_block(&mut battle.enemies[enemy_idx].entity, block);
            }
        }

        if !mv.actions.is_empty() {
            interp.execute_actions(&mv.actions, battle, Side::Enemy(enemy_idx), None);
        }

        battle.check_battle_over();
        outcome
    }
}

/// Apply the enemy's behavior pattern to pick the next move id.
fn select_move(def: &EnemyDefinition, history: &[String], battle: &mut BattleState) -> String {
    match &def.pattern {
        BehaviorPattern::Sequential => def.moves[history.len() % def.moves.len()].id.clone(),

        BehaviorPattern::FixedSequence { sequence, loop_from } => {
            if sequence.is_empty() {
                return def.moves[0].id.clone();
            }
            let idx = history.len();
            if idx < sequence.len() {
                sequence[idx].clone()
            } else {
                let wrap = (*loop_from).min(sequence.len() - 1);
                let span = sequence.len() - wrap;
                sequence[wrap + (idx - sequence.len()) % span].clone()
            }
        }

        BehaviorPattern::WeightedRandom {
            weights,
            opening_move,
            max_consecutive,
        } => {
            if history.is_empty() {
                if let Some(opener) = opening_move {
                    return opener.clone();
                }
            }

            // Candidates in move-table order so the roll maps to a
            // stable cumulative ordering.
            let candidates: Vec<&MoveDefinition> = def
                .moves
                .iter()
                .filter(|mv| weights.get(&mv.id).copied().unwrap_or(0.0) > 0.0)
                .filter(|mv| !would_exceed_consecutive(history, &mv.id, *max_consecutive))
                .collect();

            if candidates.is_empty() {
                // Every weighted move is capped out; fall back to the
                // full table rotation.
                return def.moves[history.len() % def.moves.len()].id.clone();
            }

            let total: f64 = candidates
                .iter()
                .map(|mv| weights.get(&mv.id).copied().unwrap_or(0.0))
                .sum();
            let mut roll = battle.rng.random_float() * total;
            for mv in &candidates {
                roll -= weights.get(&mv.id).copied().unwrap_or(0.0);
                if roll <= 0.0 {
                    return mv.id.clone();
                }
            }
            candidates[candidates.len() - 1].id.clone()
        }
    }
}

/// Would picking `move_id` make it the (max+1)-th consecutive use?
fn would_exceed_consecutive(history: &[String], move_id: &str, max_consecutive: usize) -> bool {
    if max_consecutive == 0 {
        return false;
    }
    history.len() >= max_consecutive
        && history[history.len() - max_consecutive..]
            .iter()
            .all(|m| m == move_id)
}

fn kind_name(kind: MoveKind) -> &'static str {
    match kind {
        MoveKind::Attack => "attack",
        MoveKind::Defend => "defend",
        MoveKind::AttackDefend => "attack_defend",
        MoveKind::Buff => "buff",
        MoveKind::Debuff => "debuff",
    }
}
