//! Telemetry records - one per encounter, aggregated per run.
//!
//! Records use `BTreeMap` rather than the engine's usual `FxHashMap`
//! so serialized output has a stable key order; batch determinism is
//! asserted byte-for-byte on the JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::BattleResult;

/// Everything the balance pipeline wants to know about one encounter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleTelemetry {
    pub enemy_ids: Vec<String>,
    /// `None` only if the encounter was aborted before resolution.
    pub result: Option<BattleResult>,
    pub turns: u32,
    pub player_hp_start: i32,
    pub player_hp_end: i32,
    /// HP the player actually lost (damage through block).
    pub hp_lost: i32,
    /// HP the player's plays removed from enemies.
    pub damage_dealt: i32,
    /// Block the player's plays generated.
    pub block_gained: i32,
    pub cards_played: u32,
    /// Play counts broken down by card id.
    pub cards_played_by_id: BTreeMap<String, u32>,
    /// Move ids each enemy executed, grouped by turn.
    pub enemy_moves_per_turn: Vec<Vec<String>>,
}

impl BattleTelemetry {
    #[must_use]
    pub fn new(enemy_ids: Vec<String>, player_hp_start: i32) -> Self {
        Self {
            enemy_ids,
            result: None,
            turns: 0,
            player_hp_start,
            player_hp_end: player_hp_start,
            hp_lost: 0,
            damage_dealt: 0,
            block_gained: 0,
            cards_played: 0,
            cards_played_by_id: BTreeMap::new(),
            enemy_moves_per_turn: Vec::new(),
        }
    }

    pub fn record_card_play(&mut self, card_id: &str) {
        self.cards_played += 1;
        *self
            .cards_played_by_id
            .entry(card_id.to_string())
            .or_insert(0) += 1;
    }
}

/// One seeded run: its encounters plus deck context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTelemetry {
    pub seed: u64,
    pub battles: Vec<BattleTelemetry>,
    pub final_result: Option<BattleResult>,
    pub cards_in_deck: Vec<String>,
}

/// Aggregate view over a batch, for quick balance readouts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub runs: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub mean_turns: f64,
    pub mean_hp_lost: f64,
}

/// Summarize a batch of finished runs.
#[must_use]
pub fn summarize(runs: &[RunTelemetry]) -> BatchSummary {
    let wins = runs
        .iter()
        .filter(|r| r.final_result == Some(BattleResult::Win))
        .count();
    let losses = runs
        .iter()
        .filter(|r| r.final_result == Some(BattleResult::Loss))
        .count();

    let battles: Vec<&BattleTelemetry> = runs.iter().flat_map(|r| r.battles.iter()).collect();
    let n_battles = battles.len().max(1) as f64;

    BatchSummary {
        runs: runs.len(),
        wins,
        losses,
        win_rate: if runs.is_empty() {
            0.0
        } else {
            wins as f64 / runs.len() as f64
        },
        mean_turns: battles.iter().map(|b| f64::from(b.turns)).sum::<f64>() / n_battles,
        mean_hp_lost: battles.iter().map(|b| f64::from(b.hp_lost)).sum::<f64>() / n_battles,
    }
}
