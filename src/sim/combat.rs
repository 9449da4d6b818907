//! The combat loop - one encounter from first draw to win or loss.
//!
//! Phase order per round:
//! 1. start of turn: counter++, player block cleared, energy refilled,
//!    per-turn relic counters reset, turn-start triggers and relics,
//!    enemy intents locked, 5 cards drawn;
//! 2. player phase: the agent plays potions and playable cards until it
//!    declines or nothing remains;
//! 3. end of turn: ethereal cards exhaust, retained cards stay, the
//!    rest discard; then player statuses decay; then end-turn triggers
//!    and relics fire (so hand predicates see the disposed hand and
//!    per-stack scripts read post-decay counts);
//! 4. enemy phase: leftover enemy block expires, each living enemy
//!    resolves its locked intent, reactive triggers fire, enemy
//!    statuses decay.
//!
//! The loop owns the `BattleState` exclusively and raises every event
//! itself; the interpreter and dispatchers never fire each other.

use tracing::warn;

use crate::agents::PlayAgent;
use crate::content::{CardType, ContentRegistry, StatusTrigger};
use crate::core::{BattleResult, BattleState, CardInstance, Side};
use crate::dispatch::{fire_status_triggers, RelicDispatcher};
use crate::interp::ActionInterpreter;
use crate::mechanics::decay_statuses;

use super::enemy_ai::EnemyAi;
use super::telemetry::BattleTelemetry;

/// Safety bound on runaway encounters; hitting it counts as a loss.
pub const MAX_TURNS: u32 = 200;

/// Cards drawn at the start of each turn.
const DRAW_PER_TURN: usize = 5;

/// Runs encounters against a fixed content registry.
pub struct CombatSimulator<'c> {
    registry: &'c ContentRegistry,
}

impl<'c> CombatSimulator<'c> {
    #[must_use]
    pub fn new(registry: &'c ContentRegistry) -> Self {
        Self { registry }
    }

    /// Run one encounter to completion and return its telemetry.
    pub fn run(&self, battle: &mut BattleState, agent: &mut dyn PlayAgent) -> BattleTelemetry {
        let mut interp = ActionInterpreter::new(self.registry);
        let mut relics = RelicDispatcher::new();
        let mut ai = EnemyAi::new(battle.enemies.len());
        let mut death_handled = vec![false; battle.enemies.len()];

        let enemy_ids = battle.enemies.iter().map(|e| e.enemy_id.clone()).collect();
        let mut telemetry = BattleTelemetry::new(enemy_ids, battle.player.entity.current_hp);

        relics.reset_counters();
        relics.fire(&mut interp, battle, "on_combat_start", None);
        battle.check_battle_over();

        while !battle.is_over && battle.turn < MAX_TURNS {
            battle.start_turn();
            relics.reset_turn_counters(battle, &interp);

            fire_status_triggers(
                &mut interp,
                battle,
                Side::Player,
                StatusTrigger::OnTurnStart,
                None,
            );
            for idx in battle.living_enemy_indices() {
                fire_status_triggers(
                    &mut interp,
                    battle,
                    Side::Enemy(idx),
                    StatusTrigger::OnTurnStart,
                    None,
                );
            }
            relics.fire(&mut interp, battle, "on_turn_start", None);
            self.handle_deaths(&mut interp, battle, &mut death_handled);
            if battle.is_over {
                break;
            }

            for idx in battle.living_enemy_indices() {
                let enemy_id = battle.enemies[idx].enemy_id.clone();
                if let Some(def) = self.registry.enemy(&enemy_id) {
                    ai.determine_intent(battle, idx, def);
                } else {
                    warn!(enemy = %enemy_id, "enemy has no definition, it will not act");
                }
            }

            let drawn = battle.card_piles.draw_cards(DRAW_PER_TURN, &mut battle.rng);
            for _ in &drawn {
                fire_status_triggers(
                    &mut interp,
                    battle,
                    Side::Player,
                    StatusTrigger::OnCardDrawn,
                    None,
                );
            }

            self.player_phase(
                &mut interp,
                &mut relics,
                battle,
                agent,
                &mut telemetry,
                &mut death_handled,
            );
            if battle.is_over {
                break;
            }

            // Hand disposal and decay come first: end-turn scripts see
            // the disposed hand and post-decay stack counts.
            self.dispose_hand(&mut interp, battle);
            decay_statuses(&mut battle.player.entity, self.registry);
            fire_status_triggers(
                &mut interp,
                battle,
                Side::Player,
                StatusTrigger::OnTurnEnd,
                None,
            );
            relics.fire(&mut interp, battle, "on_turn_end", None);
            self.handle_deaths(&mut interp, battle, &mut death_handled);
            battle.check_battle_over();
            if battle.is_over {
                break;
            }

            self.enemy_phase(
                &mut interp,
                &mut relics,
                battle,
                &mut ai,
                &mut telemetry,
                &mut death_handled,
            );
        }

        // Turn cap reached without resolution.
        if !battle.is_over {
            battle.is_over = true;
            battle.result = Some(BattleResult::Loss);
        }

        telemetry.result = battle.result;
        telemetry.turns = battle.turn;
        telemetry.player_hp_end = battle.player.entity.current_hp;
        telemetry.hp_lost = (telemetry.player_hp_start - telemetry.player_hp_end).max(0);
        telemetry
    }

    fn player_phase(
        &self,
        interp: &mut ActionInterpreter,
        relics: &mut RelicDispatcher,
        battle: &mut BattleState,
        agent: &mut dyn PlayAgent,
        telemetry: &mut BattleTelemetry,
        death_handled: &mut [bool],
    ) {
        loop {
            if battle.is_over {
                return;
            }

            if let Some(choice) = agent.choose_potion_to_use(battle, self.registry) {
                let potion_id = battle
                    .potions
                    .get_mut(choice.slot)
                    .and_then(|slot| slot.take());
                if let Some(potion_id) = potion_id {
                    if let Some(def) = self.registry.potion(&potion_id).cloned() {
                        interp.use_potion(&def, battle, choice.target);
                        self.handle_deaths(interp, battle, death_handled);
                    } else {
                        warn!(potion = %potion_id, "potion has no definition, discarded");
                    }
                    continue;
                }
            }

            let playable: Vec<CardInstance> = battle
                .card_piles
                .hand
                .iter()
                .filter(|c| interp.is_card_playable(battle, c))
                .cloned()
                .collect();
            if playable.is_empty() {
                return;
            }

            let Some(choice) = agent.choose_card_to_play(battle, &playable, self.registry) else {
                return;
            };
            let Some(card) = playable.iter().find(|c| c.id == choice.instance_id).cloned() else {
                warn!("agent chose a card that is not in the playable list");
                return;
            };
            let card_type = self.registry.card(&card.card_id).map(|d| d.card_type);

            let enemy_hp_before = total_enemy_hp(battle);
            let block_before = battle.player.entity.block;

            if !interp.play_card(battle, &card, choice.target, false) {
                return;
            }

            telemetry.record_card_play(&card.card_id);
            telemetry.damage_dealt += (enemy_hp_before - total_enemy_hp(battle)).max(0);
            telemetry.block_gained += (battle.player.entity.block - block_before).max(0);

            fire_status_triggers(
                interp,
                battle,
                Side::Player,
                StatusTrigger::OnCardPlayed,
                None,
            );
            relics.fire(interp, battle, "on_card_played", None);
            match card_type {
                Some(CardType::Attack) => {
                    fire_status_triggers(
                        interp,
                        battle,
                        Side::Player,
                        StatusTrigger::OnAttackPlayed,
                        None,
                    );
                    relics.fire(interp, battle, "on_attack_played", None);
                }
                Some(CardType::Skill) => {
                    relics.fire(interp, battle, "on_skill_played", None);
                }
                _ => {}
            }

            self.handle_deaths(interp, battle, death_handled);
            battle.check_battle_over();
        }
    }

    fn enemy_phase(
        &self,
        interp: &mut ActionInterpreter,
        relics: &mut RelicDispatcher,
        battle: &mut BattleState,
        ai: &mut EnemyAi,
        telemetry: &mut BattleTelemetry,
        death_handled: &mut [bool],
    ) {
        // Block an enemy banked last round expires when it next acts.
        for idx in battle.living_enemy_indices() {
            battle.enemies[idx].entity.clear_block();
        }

        let mut moves_this_turn = Vec::new();
        for idx in 0..battle.enemies.len() {
            if battle.is_over {
                break;
            }
            if battle.enemies[idx].entity.is_dead() {
                continue;
            }
            let enemy_id = battle.enemies[idx].enemy_id.clone();
            let Some(def) = self.registry.enemy(&enemy_id) else {
                continue;
            };
            if let Some(move_id) = battle.enemies[idx].current_move.clone() {
                moves_this_turn.push(move_id);
            }

            let outcome = ai.execute_move(interp, battle, idx, def);

            if outcome.attacked && !battle.player.entity.is_dead() {
                fire_status_triggers(
                    interp,
                    battle,
                    Side::Player,
                    StatusTrigger::OnAttacked,
                    Some(Side::Enemy(idx)),
                );
                relics.fire(interp, battle, "on_attacked", Some(Side::Enemy(idx)));
            }
            if outcome.hp_lost > 0 && !battle.player.entity.is_dead() {
                fire_status_triggers(
                    interp,
                    battle,
                    Side::Player,
                    StatusTrigger::OnHpLoss,
                    Some(Side::Enemy(idx)),
                );
                relics.fire(interp, battle, "on_hp_loss", Some(Side::Enemy(idx)));
            }
            self.handle_deaths(interp, battle, death_handled);
            battle.check_battle_over();
        }
        telemetry.enemy_moves_per_turn.push(moves_this_turn);

        for idx in battle.living_enemy_indices() {
            decay_statuses(&mut battle.enemies[idx].entity, self.registry);
        }
        battle.check_battle_over();
    }

    /// End-of-turn hand disposition: ethereal exhausts, retain stays,
    /// everything else discards.
    fn dispose_hand(&self, interp: &mut ActionInterpreter, battle: &mut BattleState) {
        let hand: Vec<CardInstance> = battle.card_piles.hand.clone();
        for card in hand {
            let Some(def) = self.registry.card(&card.card_id) else {
                battle.card_piles.move_to_discard(card.id);
                continue;
            };
            if def.ethereal || def.keywords.iter().any(|k| k == "ethereal") {
                interp.exhaust_from_hand(battle, card.id);
            } else if def.retain || def.keywords.iter().any(|k| k == "retain") {
                // stays in hand
            } else {
                battle.card_piles.move_to_discard(card.id);
            }
        }
    }

    /// Fire each newly-dead enemy's death triggers exactly once.
    fn handle_deaths(
        &self,
        interp: &mut ActionInterpreter,
        battle: &mut BattleState,
        death_handled: &mut [bool],
    ) {
        for idx in 0..battle.enemies.len() {
            if battle.enemies[idx].entity.is_dead() && !death_handled[idx] {
                death_handled[idx] = true;
                fire_status_triggers(
                    interp,
                    battle,
                    Side::Enemy(idx),
                    StatusTrigger::OnDeath,
                    None,
                );
            }
        }
    }
}

fn total_enemy_hp(battle: &BattleState) -> i32 {
    battle.enemies.iter().map(|e| e.entity.current_hp.max(0)).sum()
}
