//! Player agents - the pluggable decision policy the combat loop
//! consults.
//!
//! The engine never decides for the player; it builds the list of legal
//! options and asks the agent. Returning `None` from the play/potion
//! calls means "end turn" / "skip". Agents are selected by batch
//! configuration, not inheritance: both built-ins implement the same
//! trait and the driver boxes whichever one the config names.

pub mod heuristic;
pub mod random;

use serde::{Deserialize, Serialize};

use crate::content::ContentRegistry;
use crate::core::{BattleState, CardInstance, GameRng, Player};

pub use heuristic::HeuristicAgent;
pub use random::RandomAgent;

/// A decision to play one card from the playable list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayChoice {
    /// Instance id of the chosen card (identifies it within the hand).
    pub instance_id: u64,
    /// Chosen enemy index for single-target cards.
    pub target: Option<usize>,
}

/// A decision to drink one potion from the belt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PotionChoice {
    pub slot: usize,
    pub target: Option<usize>,
}

/// What to do at a campfire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestAction {
    Rest,
    Smith,
}

/// The decision surface the combat loop (and a future run loop) needs
/// from a player policy.
pub trait PlayAgent {
    /// Pick a card (and target) from the playable list, or `None` to
    /// end the turn.
    fn choose_card_to_play(
        &mut self,
        battle: &BattleState,
        playable: &[CardInstance],
        registry: &ContentRegistry,
    ) -> Option<PlayChoice>;

    /// Pick a card id from a post-combat reward offer, or `None` to
    /// skip.
    fn choose_card_reward(
        &mut self,
        offered: &[String],
        deck: &[String],
        registry: &ContentRegistry,
    ) -> Option<String>;

    /// Decide whether to drink a potion right now, or `None` to hold.
    fn choose_potion_to_use(
        &mut self,
        battle: &BattleState,
        registry: &ContentRegistry,
    ) -> Option<PotionChoice>;

    /// Campfire decision: heal or upgrade.
    fn choose_rest_action(&mut self, player: &Player, deck: &[String]) -> RestAction;

    /// Pick a card id to upgrade, or `None` to skip.
    fn choose_card_to_upgrade(
        &mut self,
        upgradable: &[String],
        registry: &ContentRegistry,
    ) -> Option<String>;
}

/// Which built-in agent a batch run uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    #[default]
    Random,
    Heuristic,
}

/// Construct the configured agent, seeded from a forked RNG stream.
#[must_use]
pub fn build_agent(kind: AgentKind, rng: GameRng) -> Box<dyn PlayAgent> {
    match kind {
        AgentKind::Random => Box::new(RandomAgent::new(rng)),
        AgentKind::Heuristic => Box::new(HeuristicAgent::new()),
    }
}

/// Potion slots that currently hold a potion, in belt order.
#[must_use]
pub(crate) fn filled_potion_slots(battle: &BattleState) -> Vec<usize> {
    battle
        .potions
        .iter()
        .enumerate()
        .filter_map(|(slot, p)| p.as_ref().map(|_| slot))
        .collect()
}
