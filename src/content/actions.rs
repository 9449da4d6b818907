//! Action nodes - the declarative script language all content shares.
//!
//! Cards, statuses, relics, potions, and enemy moves all describe their
//! behavior as trees of `ActionNode`. Leaf kinds are concrete game
//! operations; branch kinds (`conditional`, `for_each`, `repeat`) carry
//! children and make the structure recursive. The interpreter walks the
//! tree top-down, so no back-references are needed.
//!
//! Serde field names match the authored JSON vocabulary exactly so
//! content round-trips losslessly between the authoring pipeline, this
//! engine, and the code generator.

use serde::{Deserialize, Serialize};

/// Primitive action kinds, one per interpreter handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    DealDamage,
    GainBlock,
    ApplyStatus,
    RemoveStatus,
    DrawCards,
    DiscardCards,
    ExhaustCards,
    GainEnergy,
    LoseEnergy,
    Heal,
    LoseHp,
    AddCardToPile,
    ShuffleIntoDraw,
    GainGold,
    GainStrength,
    GainDexterity,
    Conditional,
    ForEach,
    Repeat,
    MultiplyStatus,
    DoubleBlock,
    PlayTopCard,
    /// Explicit no-op escape hatch for exotic effects.
    TriggerCustom,
}

/// A single node in an action tree.
///
/// The `condition` field does double duty (kept as one string for
/// content compatibility): on branch nodes it is a predicate from the
/// condition grammar, on leaf nodes it is a modifier tag such as
/// `"per_stack"`, `"raw"`, or `"no_strength"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionNode {
    #[serde(rename = "action_type")]
    pub kind: ActionKind,

    /// Numeric parameter - damage amount, block amount, card count, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,

    /// Symbolic target: `self`, `enemy`, `all_enemies`, `random_enemy`,
    /// `none`, `attacker`, or a resolved numeric index. `None` lets the
    /// executing context decide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Status id for apply/remove/multiply kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_name: Option<String>,

    /// Card id for add-card kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,

    /// Pile name: `draw`, `hand`, `discard`, `exhaust`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pile: Option<String>,

    /// Predicate (branch nodes) or modifier tag (leaf nodes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// Sub-actions for branch kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ActionNode>>,

    /// Repetition / hit count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<i32>,
}

impl ActionNode {
    /// A bare node of the given kind; builder methods fill in the rest.
    #[must_use]
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            value: None,
            target: None,
            status_name: None,
            card_id: None,
            pile: None,
            condition: None,
            children: None,
            times: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status_name: impl Into<String>) -> Self {
        self.status_name = Some(status_name.into());
        self
    }

    #[must_use]
    pub fn with_card(mut self, card_id: impl Into<String>) -> Self {
        self.card_id = Some(card_id.into());
        self
    }

    #[must_use]
    pub fn with_pile(mut self, pile: impl Into<String>) -> Self {
        self.pile = Some(pile.into());
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<ActionNode>) -> Self {
        self.children = Some(children);
        self
    }

    #[must_use]
    pub fn with_times(mut self, times: i32) -> Self {
        self.times = Some(times);
        self
    }

    /// Shorthand for a damage leaf.
    #[must_use]
    pub fn deal_damage(value: i32) -> Self {
        Self::new(ActionKind::DealDamage).with_value(value)
    }

    /// Shorthand for a block leaf.
    #[must_use]
    pub fn gain_block(value: i32) -> Self {
        Self::new(ActionKind::GainBlock).with_value(value)
    }

    /// Shorthand for an apply-status leaf.
    #[must_use]
    pub fn apply_status(status_name: impl Into<String>, value: i32) -> Self {
        Self::new(ActionKind::ApplyStatus)
            .with_status(status_name)
            .with_value(value)
    }

    /// Shorthand for a draw leaf.
    #[must_use]
    pub fn draw_cards(value: i32) -> Self {
        Self::new(ActionKind::DrawCards).with_value(value)
    }
}
