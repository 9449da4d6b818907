//! Greedy heuristic agent - a priority waterfall, not a planner.
//!
//! Good enough to separate "this content is broken" from "a random
//! policy just played badly" in balance sweeps. Priorities, first match
//! wins: block lethal damage, play powers, land vulnerable, hit with
//! the biggest attack, bank leftover energy as block.

use crate::content::{ActionKind, ActionNode, CardDefinition, CardTarget, CardType, ContentRegistry};
use crate::core::{BattleState, CardInstance, Player};
use crate::interp::effective_actions;
use crate::mechanics::has_status;

use super::{filled_potion_slots, PlayAgent, PlayChoice, PotionChoice, RestAction};

/// Use a healing potion below this HP fraction.
const POTION_HP_FRACTION: f64 = 0.4;
/// Rest instead of smithing below this HP fraction.
const REST_HP_FRACTION: f64 = 0.6;

#[derive(Default)]
pub struct HeuristicAgent;

impl HeuristicAgent {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PlayAgent for HeuristicAgent {
    fn choose_card_to_play(
        &mut self,
        battle: &BattleState,
        playable: &[CardInstance],
        registry: &ContentRegistry,
    ) -> Option<PlayChoice> {
        if playable.is_empty() {
            return None;
        }

        let focus = weakest_enemy(battle);
        let incoming = incoming_damage(battle);
        let threat = incoming - battle.player.entity.block;

        // 1. About to take damage: best block card first.
        if threat > 0 {
            if let Some((card, _)) = best_by(playable, registry, script_block) {
                return Some(choice_for(card, registry, focus));
            }
        }

        // 2. Powers compound; play them early.
        if let Some(card) = playable.iter().find(|c| {
            registry
                .card(&c.card_id)
                .is_some_and(|def| def.card_type == CardType::Power)
        }) {
            return Some(choice_for(card, registry, focus));
        }

        // 3. Land vulnerable before committing attacks.
        if let Some(idx) = focus {
            if !has_status(&battle.enemies[idx].entity, "vulnerable") {
                if let Some(card) = playable.iter().find(|c| {
                    registry
                        .card(&c.card_id)
                        .is_some_and(|def| applies_vulnerable(card_script(def, c)))
                }) {
                    return Some(choice_for(card, registry, focus));
                }
            }
        }

        // 4. Biggest attack.
        if let Some((card, _)) = best_by(playable, registry, script_damage) {
            return Some(choice_for(card, registry, focus));
        }

        // 5. Nothing better: bank energy as block.
        if let Some((card, _)) = best_by(playable, registry, script_block) {
            return Some(choice_for(card, registry, focus));
        }

        None
    }

    fn choose_card_reward(
        &mut self,
        offered: &[String],
        _deck: &[String],
        registry: &ContentRegistry,
    ) -> Option<String> {
        offered
            .iter()
            .max_by_key(|id| {
                registry
                    .card(id)
                    .map(|def| script_damage(&def.actions) + script_block(&def.actions))
                    .unwrap_or(0)
            })
            .cloned()
    }

    fn choose_potion_to_use(
        &mut self,
        battle: &BattleState,
        registry: &ContentRegistry,
    ) -> Option<PotionChoice> {
        let hp_fraction =
            f64::from(battle.player.entity.current_hp) / f64::from(battle.player.entity.max_hp.max(1));
        if hp_fraction >= POTION_HP_FRACTION {
            return None;
        }

        for slot in filled_potion_slots(battle) {
            let potion_id = battle.potions[slot].as_ref()?;
            let heals = registry
                .potion(potion_id)
                .is_some_and(|def| def.actions.iter().any(|n| n.kind == ActionKind::Heal));
            if heals {
                return Some(PotionChoice { slot, target: None });
            }
        }
        None
    }

    fn choose_rest_action(&mut self, player: &Player, _deck: &[String]) -> RestAction {
        let hp_fraction =
            f64::from(player.entity.current_hp) / f64::from(player.entity.max_hp.max(1));
        if hp_fraction < REST_HP_FRACTION {
            RestAction::Rest
        } else {
            RestAction::Smith
        }
    }

    fn choose_card_to_upgrade(
        &mut self,
        upgradable: &[String],
        registry: &ContentRegistry,
    ) -> Option<String> {
        upgradable
            .iter()
            .max_by_key(|id| {
                registry
                    .card(id)
                    .map(|def| script_damage(&def.actions))
                    .unwrap_or(0)
            })
            .cloned()
    }
}

/// Living enemy with the least HP.
fn weakest_enemy(battle: &BattleState) -> Option<usize> {
    battle
        .living_enemy_indices()
        .into_iter()
        .min_by_key(|&idx| battle.enemies[idx].entity.current_hp)
}

/// Total damage every living enemy has locked in for this round.
fn incoming_damage(battle: &BattleState) -> i32 {
    battle
        .living_enemy_indices()
        .into_iter()
        .filter_map(|idx| battle.enemies[idx].intent.as_ref())
        .filter_map(|intent| intent.damage.map(|d| d * intent.hits.max(1)))
        .sum()
}

fn card_script<'a>(def: &'a CardDefinition, card: &CardInstance) -> &'a [ActionNode] {
    effective_actions(def, card.upgraded)
}

/// Highest-scoring playable card under `score`, if any scores above 0.
fn best_by<'a>(
    playable: &'a [CardInstance],
    registry: &ContentRegistry,
    score: fn(&[ActionNode]) -> i32,
) -> Option<(&'a CardInstance, i32)> {
    playable
        .iter()
        .filter_map(|card| {
            let def = registry.card(&card.card_id)?;
            let s = score(card_script(def, card));
            (s > 0).then_some((card, s))
        })
        .max_by_key(|&(_, s)| s)
}

fn choice_for(
    card: &CardInstance,
    registry: &ContentRegistry,
    focus: Option<usize>,
) -> PlayChoice {
    let needs_target = registry
        .card(&card.card_id)
        .is_some_and(|def| def.target == CardTarget::Enemy);
    PlayChoice {
        instance_id: card.id,
        target: if needs_target { focus } else { None },
    }
}

/// Sum of damage leaves in a script (hits included), recursively.
fn script_damage(actions: &[ActionNode]) -> i32 {
    actions
        .iter()
        .map(|node| {
            let own = if node.kind == ActionKind::DealDamage {
                node.value.unwrap_or(0) * node.times.unwrap_or(1).max(1)
            } else {
                0
            };
            let nested = node
                .children
                .as_deref()
                .map(script_damage)
                .unwrap_or(0);
            own + nested
        })
        .sum()
}

/// Sum of block leaves in a script, recursively.
fn script_block(actions: &[ActionNode]) -> i32 {
    actions
        .iter()
        .map(|node| {
            let own = if node.kind == ActionKind::GainBlock {
                node.value.unwrap_or(0)
            } else {
                0
            };
            let nested = node.children.as_deref().map(script_block).unwrap_or(0);
            own + nested
        })
        .sum()
}

/// Whether a script applies vulnerable to something other than the
/// caster.
fn applies_vulnerable(actions: &[ActionNode]) -> bool {
    actions.iter().any(|node| {
        let own = node.kind == ActionKind::ApplyStatus
            && node.status_name.as_deref() == Some("vulnerable")
            && node.target.as_deref() != Some("self");
        own || node
            .children
            .as_deref()
            .is_some_and(applies_vulnerable)
    })
}
