//! Batch driver - many independent seeded encounters.
//!
//! Each run derives its own seed (`base_seed + run_index`) and forks
//! private `"combat"` and `"agent"` RNG streams from it, so a run's
//! outcome depends only on its seed and the configuration. Parallel
//! execution writes results into slots ordered by run index; scheduling
//! can never change the output.

use std::num::NonZeroUsize;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::agents::{build_agent, AgentKind};
use crate::content::ContentRegistry;
use crate::core::{BattleState, Enemy, GameRng, Player};

use super::combat::CombatSimulator;
use super::telemetry::RunTelemetry;

/// Everything that defines one encounter setup, shared by every run in
/// a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterConfig {
    pub enemy_ids: Vec<String>,
    /// Card ids making up the deck.
    pub deck: Vec<String>,
    #[serde(default)]
    pub relics: Vec<String>,
    /// Up to 3 potion ids; extras are ignored.
    #[serde(default)]
    pub potions: Vec<String>,
    #[serde(default)]
    pub agent: AgentKind,
    #[serde(default = "default_player_hp")]
    pub player_hp: i32,
    #[serde(default = "default_player_energy")]
    pub player_energy: i32,
}

fn default_player_hp() -> i32 {
    80
}

fn default_player_energy() -> i32 {
    3
}

impl EncounterConfig {
    #[must_use]
    pub fn new(enemy_ids: Vec<String>, deck: Vec<String>) -> Self {
        Self {
            enemy_ids,
            deck,
            relics: Vec::new(),
            potions: Vec::new(),
            agent: AgentKind::default(),
            player_hp: default_player_hp(),
            player_energy: default_player_energy(),
        }
    }
}

/// Runs batches of encounters against a fixed content registry.
pub struct BatchRunner<'c> {
    registry: &'c ContentRegistry,
}

impl<'c> BatchRunner<'c> {
    #[must_use]
    pub fn new(registry: &'c ContentRegistry) -> Self {
        Self { registry }
    }

    /// Run `n` encounters with per-run seeds `base_seed..base_seed + n`.
    ///
    /// Results are ordered by run index regardless of `parallel`.
    pub fn run_batch(
        &self,
        config: &EncounterConfig,
        n: usize,
        base_seed: u64,
        parallel: bool,
    ) -> Vec<RunTelemetry> {
        if !parallel || n <= 1 {
            return (0..n)
                .map(|i| self.run_one(config, base_seed + i as u64))
                .collect();
        }

        let workers = thread::available_parallelism()
            .map_or(1, NonZeroUsize::get)
            .min(n);
        let chunk_size = n.div_ceil(workers);

        let mut results: Vec<Option<RunTelemetry>> = (0..n).map(|_| None).collect();
        thread::scope(|s| {
            for (chunk_idx, chunk) in results.chunks_mut(chunk_size).enumerate() {
                let start = chunk_idx * chunk_size;
                s.spawn(move || {
                    for (offset, slot) in chunk.iter_mut().enumerate() {
                        let seed = base_seed + (start + offset) as u64;
                        *slot = Some(self.run_one(config, seed));
                    }
                });
            }
        });
        results.into_iter().flatten().collect()
    }

    /// Run a single seeded encounter.
    pub fn run_one(&self, config: &EncounterConfig, seed: u64) -> RunTelemetry {
        let run_rng = GameRng::new(seed);
        let mut agent = build_agent(config.agent, run_rng.fork("agent"));

        let mut battle = self.build_battle(config, run_rng.fork("combat"));
        let sim = CombatSimulator::new(self.registry);
        let telemetry = sim.run(&mut battle, agent.as_mut());

        RunTelemetry {
            seed,
            final_result: telemetry.result,
            battles: vec![telemetry],
            cards_in_deck: config.deck.clone(),
        }
    }

    /// Assemble the battle state for one run: rolled enemy HP, shuffled
    /// deck, innate cards on top, relics and potions equipped.
    fn build_battle(&self, config: &EncounterConfig, mut rng: GameRng) -> BattleState {
        let mut player = Player::new("player", config.player_hp, config.player_energy);
        player.energy = config.player_energy;

        let mut enemies = Vec::with_capacity(config.enemy_ids.len());
        for enemy_id in &config.enemy_ids {
            match self.registry.enemy(enemy_id) {
                Some(def) => {
                    let hp = rng.random_int(def.hp_min, def.hp_max.max(def.hp_min));
                    enemies.push(Enemy::new(def.id.clone(), def.name.clone(), hp));
                }
                None => {
                    warn!(enemy = %enemy_id, "unknown enemy id in config, skipped");
                }
            }
        }

        let mut battle = BattleState::new(player, enemies, rng);

        for card_id in &config.deck {
            let card = battle.alloc_card(card_id.clone());
            battle.card_piles.draw.push(card);
        }
        battle.card_piles.shuffle_draw(&mut battle.rng);

        // Innate cards surface in the opening hand: stable-partition
        // them to the top of the draw pile.
        let (innate, rest): (Vec<_>, Vec<_>) =
            battle.card_piles.draw.drain(..).partition(|card| {
                self.registry
                    .card(&card.card_id)
                    .is_some_and(|def| def.innate)
            });
        battle.card_piles.draw = innate;
        battle.card_piles.draw.extend(rest);

        battle.relics = config.relics.clone();
        for (slot, potion_id) in config.potions.iter().take(3).enumerate() {
            battle.potions[slot] = Some(potion_id.clone());
        }

        battle
    }
}
