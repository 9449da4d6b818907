//! Potion definitions - single-use consumables.

use serde::{Deserialize, Serialize};

use super::actions::ActionNode;
use super::cards::CardTarget;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PotionRarity {
    Common,
    Uncommon,
    Rare,
}

/// Complete definition of a single potion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PotionDefinition {
    pub id: String,
    pub name: String,
    pub rarity: PotionRarity,
    /// Targeting mode when the potion is used.
    pub target: CardTarget,
    /// The action tree executed when the potion is consumed.
    pub actions: Vec<ActionNode>,
}

impl PotionDefinition {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rarity: PotionRarity,
        target: CardTarget,
        actions: Vec<ActionNode>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rarity,
            target,
            actions,
        }
    }
}
