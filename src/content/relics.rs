//! Relic definitions - passive items that fire on game events.

use serde::{Deserialize, Serialize};

use super::actions::ActionNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RelicTier {
    Starter,
    Common,
    Uncommon,
    Rare,
    Boss,
    Shop,
    Event,
}

/// Complete definition of a single relic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelicDefinition {
    pub id: String,
    pub name: String,
    pub tier: RelicTier,
    /// Event name that activates this relic: `"on_combat_start"`,
    /// `"on_turn_start"`, `"on_turn_end"`, `"on_card_played"`,
    /// `"on_attack"`, `"on_attacked"`, `"on_hp_loss"`, ...
    pub trigger: String,
    pub actions: Vec<ActionNode>,
    /// Counter threshold. The relic absorbs matching events silently and
    /// fires every time the count reaches this value (then resets).
    /// `None` means fire on every matching event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter: Option<u32>,
    /// If true the counter is reset to zero at the start of every turn,
    /// whether or not the relic fired.
    #[serde(default)]
    pub counter_per_turn: bool,
}

impl RelicDefinition {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        tier: RelicTier,
        trigger: impl Into<String>,
        actions: Vec<ActionNode>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier,
            trigger: trigger.into(),
            actions,
            counter: None,
            counter_per_turn: false,
        }
    }

    #[must_use]
    pub fn with_counter(mut self, threshold: u32) -> Self {
        self.counter = Some(threshold);
        self
    }

    #[must_use]
    pub fn counting_per_turn(mut self) -> Self {
        self.counter_per_turn = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::actions::ActionNode;

    #[test]
    fn test_relic_json_round_trip() {
        let json = r#"{
            "id": "nunchaku",
            "name": "Nunchaku",
            "tier": "UNCOMMON",
            "trigger": "on_attack",
            "actions": [{"action_type": "gain_energy", "value": 1}],
            "counter": 10
        }"#;

        let relic: RelicDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(relic.counter, Some(10));
        assert!(!relic.counter_per_turn);

        let rendered = serde_json::to_string(&relic).unwrap();
        let reparsed: RelicDefinition = serde_json::from_str(&rendered).unwrap();
        assert_eq!(relic, reparsed);
    }

    #[test]
    fn test_builder() {
        let relic = RelicDefinition::new(
            "shuriken",
            "Shuriken",
            RelicTier::Uncommon,
            "on_attack",
            vec![ActionNode::apply_status("strength", 1).with_target("self")],
        )
        .with_counter(3)
        .counting_per_turn();

        assert_eq!(relic.counter, Some(3));
        assert!(relic.counter_per_turn);
    }
}
