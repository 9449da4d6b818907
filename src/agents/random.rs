//! Uniform-random baseline agent.
//!
//! Useful as a balance-analysis floor: any content that a random
//! policy wins too often with is overtuned. Decisions consume the
//! agent's own forked RNG stream so they never perturb combat rolls.

use crate::content::{CardTarget, ContentRegistry};
use crate::core::{BattleState, CardInstance, GameRng, Player};

use super::{filled_potion_slots, PlayAgent, PlayChoice, PotionChoice, RestAction};

/// Chance to end the turn even though cards remain playable.
const END_TURN_CHANCE: f64 = 0.10;
/// Chance per decision point to drink a potion.
const POTION_CHANCE: f64 = 0.05;
/// Chance to skip a card reward.
const SKIP_REWARD_CHANCE: f64 = 0.20;

pub struct RandomAgent {
    rng: GameRng,
}

impl RandomAgent {
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }

    fn random_enemy(&mut self, battle: &BattleState) -> Option<usize> {
        let living = battle.living_enemy_indices();
        self.rng.choice(&living).copied()
    }
}

impl PlayAgent for RandomAgent {
    fn choose_card_to_play(
        &mut self,
        battle: &BattleState,
        playable: &[CardInstance],
        registry: &ContentRegistry,
    ) -> Option<PlayChoice> {
        if playable.is_empty() || self.rng.random_float() < END_TURN_CHANCE {
            return None;
        }

        let idx = self.rng.choice_index(playable.len())?;
        let card = &playable[idx];

        let needs_target = registry
            .card(&card.card_id)
            .is_some_and(|def| def.target == CardTarget::Enemy);
        let target = if needs_target {
            self.random_enemy(battle)
        } else {
            None
        };

        Some(PlayChoice {
            instance_id: card.id,
            target,
        })
    }

    fn choose_card_reward(
        &mut self,
        offered: &[String],
        _deck: &[String],
        _registry: &ContentRegistry,
    ) -> Option<String> {
        if offered.is_empty() || self.rng.random_float() < SKIP_REWARD_CHANCE {
            return None;
        }
        self.rng.choice(offered).cloned()
    }

    fn choose_potion_to_use(
        &mut self,
        battle: &BattleState,
        registry: &ContentRegistry,
    ) -> Option<PotionChoice> {
        let available = filled_potion_slots(battle);
        if available.is_empty() || self.rng.random_float() >= POTION_CHANCE {
            return None;
        }

        let slot = *self.rng.choice(&available)?;
        let potion_id = battle.potions[slot].as_ref()?;
        let needs_target = registry
            .potion(potion_id)
            .is_some_and(|def| def.target == CardTarget::Enemy);
        let target = if needs_target {
            self.random_enemy(battle)
        } else {
            None
        };

        Some(PotionChoice { slot, target })
    }

    fn choose_rest_action(&mut self, _player: &Player, _deck: &[String]) -> RestAction {
        if self.rng.random_float() < 0.5 {
            RestAction::Rest
        } else {
            RestAction::Smith
        }
    }

    fn choose_card_to_upgrade(
        &mut self,
        upgradable: &[String],
        _registry: &ContentRegistry,
    ) -> Option<String> {
        self.rng.choice(upgradable).cloned()
    }
}
