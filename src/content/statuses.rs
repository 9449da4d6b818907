//! Status-effect definitions - buffs and debuffs with scripted triggers.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::actions::ActionNode;

/// How multiple applications of the same status interact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StackBehavior {
    /// Stacks add magnitude (Strength, Vulnerable).
    Intensity,
    /// Stacks add remaining turns.
    Duration,
    /// Doesn't stack - reapplying just refreshes.
    None,
}

/// Game events that can cause a status effect to fire its actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusTrigger {
    OnTurnStart,
    OnTurnEnd,
    OnAttack,
    OnAttacked,
    OnCardPlayed,
    OnCardDrawn,
    OnCardExhausted,
    OnAttackPlayed,
    OnBlockGained,
    OnHpLoss,
    OnDeath,
    Passive,
}

/// Complete definition of a custom status effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusDefinition {
    /// Unique identifier (e.g. `"burning"`).
    pub id: String,
    pub name: String,
    /// Debuffs are cleansed/blocked differently by some content.
    pub is_debuff: bool,
    pub stack_behavior: StackBehavior,
    /// Maps game events to the action trees fired when they occur.
    ///
    /// A status can respond to multiple events - a burn might fire
    /// `ON_TURN_END` to deal damage and `ON_DEATH` to spread.
    #[serde(default)]
    pub triggers: FxHashMap<StatusTrigger, Vec<ActionNode>>,
    /// Stacks lost automatically at end of turn. 0 = does not decay.
    #[serde(default)]
    pub decay_per_turn: i32,
    /// The status is removed entirely once stacks fall to this value
    /// or below.
    #[serde(default)]
    pub min_stacks: i32,
}

impl StatusDefinition {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, is_debuff: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_debuff,
            stack_behavior: StackBehavior::Intensity,
            triggers: FxHashMap::default(),
            decay_per_turn: 0,
            min_stacks: 0,
        }
    }

    #[must_use]
    pub fn with_trigger(mut self, trigger: StatusTrigger, actions: Vec<ActionNode>) -> Self {
        self.triggers.insert(trigger, actions);
        self
    }

    #[must_use]
    pub fn with_decay(mut self, decay_per_turn: i32) -> Self {
        self.decay_per_turn = decay_per_turn;
        self
    }

    #[must_use]
    pub fn with_stack_behavior(mut self, behavior: StackBehavior) -> Self {
        self.stack_behavior = behavior;
        self
    }
}
