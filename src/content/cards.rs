//! Card definitions - the most common content type.

use serde::{Deserialize, Serialize};

use super::actions::ActionNode;

/// Energy cost sentinel: X-cost, spend all remaining energy.
pub const COST_X: i32 = -1;
/// Energy cost sentinel: unplayable (curses, statuses).
pub const COST_UNPLAYABLE: i32 = -2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardType {
    Attack,
    Skill,
    Power,
    Status,
    Curse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardRarity {
    Basic,
    Common,
    Uncommon,
    Rare,
    Special,
}

/// Targeting mode declared by a card or potion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardTarget {
    #[serde(rename = "ENEMY")]
    Enemy,
    #[serde(rename = "ALL_ENEMIES")]
    AllEnemies,
    #[serde(rename = "SELF")]
    SelfTarget,
    #[serde(rename = "NONE")]
    None,
}

/// Only the deltas that change when a card is upgraded.
///
/// `None` means "keep the base value".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<i32>,

    /// Replacement action list, or `None` to keep the base actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exhaust: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_exhaust: Option<Vec<ActionNode>>,
}

/// Complete definition of a single card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier used for cross-references (e.g. `"strike"`).
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub rarity: CardRarity,
    /// Energy cost. `-1` = X-cost, `-2` = unplayable.
    pub cost: i32,
    pub target: CardTarget,
    /// The action tree executed when this card is played.
    pub actions: Vec<ActionNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade: Option<UpgradeDefinition>,
    /// Keyword ids (e.g. `["exhaust", "ethereal"]`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Exhausted (removed for the rest of combat) after play.
    #[serde(default)]
    pub exhaust: bool,
    /// Exhausted at end of turn if still in hand.
    #[serde(default)]
    pub ethereal: bool,
    /// Always drawn in the opening hand.
    #[serde(default)]
    pub innate: bool,
    /// Not discarded at end of turn.
    #[serde(default)]
    pub retain: bool,
    /// Actions executed when this card is exhausted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_exhaust: Vec<ActionNode>,
    /// Condition that must hold for the card to be playable, in the
    /// same grammar as `conditional` nodes. `None` means no restriction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_restriction: Option<String>,
}

impl CardDefinition {
    /// A minimal card; builder methods fill in the rest.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        card_type: CardType,
        cost: i32,
        target: CardTarget,
        actions: Vec<ActionNode>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            card_type,
            rarity: CardRarity::Common,
            cost,
            target,
            actions,
            upgrade: None,
            keywords: Vec::new(),
            exhaust: false,
            ethereal: false,
            innate: false,
            retain: false,
            on_exhaust: Vec::new(),
            play_restriction: None,
        }
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: CardRarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_upgrade(mut self, upgrade: UpgradeDefinition) -> Self {
        self.upgrade = Some(upgrade);
        self
    }

    #[must_use]
    pub fn with_exhaust(mut self) -> Self {
        self.exhaust = true;
        self
    }

    #[must_use]
    pub fn with_ethereal(mut self) -> Self {
        self.ethereal = true;
        self
    }

    #[must_use]
    pub fn with_retain(mut self) -> Self {
        self.retain = true;
        self
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    #[must_use]
    pub fn with_play_restriction(mut self, restriction: impl Into<String>) -> Self {
        self.play_restriction = Some(restriction.into());
        self
    }

    #[must_use]
    pub fn with_on_exhaust(mut self, actions: Vec<ActionNode>) -> Self {
        self.on_exhaust = actions;
        self
    }
}
