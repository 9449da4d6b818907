//! Relic dispatch - event matching and counter thresholds.
//!
//! Relics belong to the player and fire on named combat events. A relic
//! with a counter absorbs matching events silently and fires every time
//! the count reaches the threshold, then starts over. Counter state
//! lives here, outside `BattleState`, because it spans the whole combat
//! and is owned by the loop rather than by content.

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::content::ActionNode;
use crate::core::{BattleState, Side};
use crate::interp::ActionInterpreter;

use super::triggers::rewrite_attacker;

/// Tracks relic counters and fires relic actions on matching events.
#[derive(Debug, Default)]
pub struct RelicDispatcher {
    counters: FxHashMap<String, u32>,
}

impl RelicDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every counter (start of combat).
    pub fn reset_counters(&mut self) {
        self.counters.clear();
    }

    /// Zero the counters of per-turn relics (start of turn).
    pub fn reset_turn_counters(&mut self, battle: &BattleState, interp: &ActionInterpreter) {
        for relic_id in &battle.relics {
            let per_turn = interp
                .registry()
                .relic(relic_id)
                .is_some_and(|def| def.counter_per_turn);
            if per_turn {
                self.counters.insert(relic_id.clone(), 0);
            }
        }
    }

    /// Current counter value for a relic, 0 if it has never matched.
    #[must_use]
    pub fn counter(&self, relic_id: &str) -> u32 {
        self.counters.get(relic_id).copied().unwrap_or(0)
    }

    /// Dispatch an event to every equipped relic, in belt order.
    pub fn fire(
        &mut self,
        interp: &mut ActionInterpreter,
        battle: &mut BattleState,
        event: &str,
        attacker: Option<Side>,
    ) {
        if battle.is_over {
            return;
        }

        let relic_ids = battle.relics.clone();
        for relic_id in relic_ids {
            if battle.is_over {
                return;
            }

            let Some(def) = interp.registry().relic(&relic_id) else {
                warn!(relic = %relic_id, "equipped relic has no definition");
                continue;
            };
            if def.trigger != event {
                continue;
            }

            if let Some(threshold) = def.counter {
                let counter = self.counters.entry(relic_id.clone()).or_insert(0);
                *counter += 1;
                if *counter < threshold {
                    continue;
                }
                *counter = 0;
            }

            let prepared: Vec<ActionNode> = def
                .actions
                .iter()
                .map(|node| {
                    let mut node = node.clone();
                    rewrite_attacker(&mut node, attacker);
                    node
                })
                .collect();

            interp.execute_actions(&prepared, battle, Side::Player, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ActionKind, ContentRegistry, RelicDefinition, RelicTier};
    use crate::core::{Enemy, GameRng, Player};

    fn registry() -> ContentRegistry {
        let mut reg = ContentRegistry::new();
        reg.register_relic(RelicDefinition::new(
            "anchor",
            "Anchor",
            RelicTier::Common,
            "on_combat_start",
            vec![ActionNode::gain_block(10).with_condition("raw")],
        ))
        .unwrap();
        reg.register_relic(
            RelicDefinition::new(
                "nunchaku",
                "Nunchaku",
                RelicTier::Uncommon,
                "on_attack_played",
                vec![ActionNode::new(ActionKind::GainEnergy).with_value(1)],
            )
            .with_counter(10),
        )
        .unwrap();
        reg.register_relic(
            RelicDefinition::new(
                "letter_opener",
                "Letter Opener",
                RelicTier::Uncommon,
                "on_skill_played",
                vec![ActionNode::deal_damage(5)
                    .with_target("all_enemies")
                    .with_condition("no_strength")],
            )
            .with_counter(3)
            .counting_per_turn(),
        )
        .unwrap();
        reg
    }

    fn battle_with_relics(relics: &[&str]) -> BattleState {
        let player = Player::new("p", 80, 3);
        let enemy = Enemy::new("cultist", "Cultist", 48);
        let mut b = BattleState::new(player, vec![enemy], GameRng::new(5));
        b.relics = relics.iter().map(|s| s.to_string()).collect();
        b
    }

    #[test]
    fn test_uncountered_relic_fires_every_match() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle_with_relics(&["anchor"]);
        let mut relics = RelicDispatcher::new();

        relics.fire(&mut interp, &mut b, "on_combat_start", None);
        assert_eq!(b.player.entity.block, 10);

        // Non-matching event does nothing.
        relics.fire(&mut interp, &mut b, "on_turn_end", None);
        assert_eq!(b.player.entity.block, 10);
    }

    #[test]
    fn test_counter_fires_on_threshold_and_resets() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle_with_relics(&["nunchaku"]);
        let mut relics = RelicDispatcher::new();

        for i in 1..=25 {
            let before = b.player.energy;
            relics.fire(&mut interp, &mut b, "on_attack_played", None);
            let fired = b.player.energy > before;
            assert_eq!(fired, i % 10 == 0, "event {i}");
        }
        assert_eq!(b.player.energy, 2);
        assert_eq!(relics.counter("nunchaku"), 5);
    }

    #[test]
    fn test_per_turn_counter_reset() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle_with_relics(&["letter_opener"]);
        let mut relics = RelicDispatcher::new();

        relics.fire(&mut interp, &mut b, "on_skill_played", None);
        relics.fire(&mut interp, &mut b, "on_skill_played", None);
        assert_eq!(relics.counter("letter_opener"), 2);

        // New turn: progress toward the threshold is lost.
        relics.reset_turn_counters(&b, &interp);
        assert_eq!(relics.counter("letter_opener"), 0);

        relics.fire(&mut interp, &mut b, "on_skill_played", None);
        relics.fire(&mut interp, &mut b, "on_skill_played", None);
        relics.fire(&mut interp, &mut b, "on_skill_played", None);
        assert_eq!(b.enemies[0].entity.current_hp, 43);
    }

    #[test]
    fn test_unknown_relic_is_skipped() {
        let reg = registry();
        let mut interp = ActionInterpreter::new(&reg);
        let mut b = battle_with_relics(&["figment"]);
        let mut relics = RelicDispatcher::new();

        relics.fire(&mut interp, &mut b, "on_combat_start", None);
        assert_eq!(b.player.entity.block, 0);
    }
}
