//! Enemy definitions - move tables and behavior patterns.
//!
//! Move *selection* policy is data: each enemy declares one of the
//! `BehaviorPattern` variants and the enemy AI interprets it against the
//! move table and the battle RNG stream. Nothing about repetition or
//! cycling is hard-coded in the engine.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::actions::ActionNode;

/// What a move does when executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Attack,
    Defend,
    AttackDefend,
    Buff,
    Debuff,
}

/// A single entry in an enemy's move table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MoveKind,
    /// Fixed per-hit damage for attack moves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<i32>,
    /// Rolled per-hit damage range; takes precedence over `damage`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_max: Option<i32>,
    /// Hit count for multi-attacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hits: Option<i32>,
    /// Block gained by defend / attack_defend moves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<i32>,
    /// Action script for buff / debuff moves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionNode>,
}

impl MoveDefinition {
    #[must_use]
    pub fn attack(id: impl Into<String>, name: impl Into<String>, damage: i32, hits: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: MoveKind::Attack,
            damage: Some(damage),
            damage_min: None,
            damage_max: None,
            hits: Some(hits),
            block: None,
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn defend(id: impl Into<String>, name: impl Into<String>, block: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: MoveKind::Defend,
            damage: None,
            damage_min: None,
            damage_max: None,
            hits: None,
            block: Some(block),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn buff(id: impl Into<String>, name: impl Into<String>, actions: Vec<ActionNode>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: MoveKind::Buff,
            damage: None,
            damage_min: None,
            damage_max: None,
            hits: None,
            block: None,
            actions,
        }
    }
}

/// Move-selection policy, declared per enemy in content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BehaviorPattern {
    /// Cycle through the move table in order.
    Sequential,
    /// Play `sequence` in order, then loop from `loop_from`.
    FixedSequence {
        sequence: Vec<String>,
        #[serde(default)]
        loop_from: usize,
    },
    /// Pick moves by weight, never repeating one more than
    /// `max_consecutive` times in a row; an optional fixed opener.
    WeightedRandom {
        weights: FxHashMap<String, f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        opening_move: Option<String>,
        #[serde(default = "default_max_consecutive")]
        max_consecutive: usize,
    },
}

fn default_max_consecutive() -> usize {
    3
}

impl Default for BehaviorPattern {
    fn default() -> Self {
        Self::Sequential
    }
}

/// Complete definition of an enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub id: String,
    pub name: String,
    pub hp_min: i32,
    pub hp_max: i32,
    pub moves: Vec<MoveDefinition>,
    #[serde(default)]
    pub pattern: BehaviorPattern,
}

impl EnemyDefinition {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        hp_min: i32,
        hp_max: i32,
        moves: Vec<MoveDefinition>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hp_min,
            hp_max,
            moves,
            pattern: BehaviorPattern::Sequential,
        }
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: BehaviorPattern) -> Self {
        self.pattern = pattern;
        self
    }

    #[must_use]
    pub fn find_move(&self, move_id: &str) -> Option<&MoveDefinition> {
        self.moves.iter().find(|m| m.id == move_id)
    }
}
