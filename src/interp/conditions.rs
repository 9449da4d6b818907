//! Predicate grammar for `conditional` branch nodes and card play
//! restrictions.
//!
//! The grammar is a small fixed set of strings, some parameterized with
//! a `:` suffix. Unknown predicates are logged and evaluate to false so
//! malformed content cannot abort a script.

use tracing::warn;

use crate::content::{CardType, ContentRegistry};
use crate::core::{BattleState, Side};
use crate::mechanics::has_status;

/// Evaluate a predicate string against the battle state.
///
/// Supported predicates:
/// - `has_status:<id>` - the acting entity has the status
/// - `target_has_status:<id>` - the chosen target has the status
/// - `hp_below:<pct>` / `hp_above:<pct>` - acting entity HP percentage
/// - `no_block` - acting entity has zero block
/// - `hand_empty` / `hand_size_gte:<n>` - hand size thresholds
/// - `only_attacks_in_hand` - every card in hand is an attack
/// - `enemy_intends_attack` - the chosen target's intent is an attack
/// - `target_is_dead` - the chosen target is dead
/// - `turn_number:<n>` - current turn equals `n` exactly
pub fn evaluate_condition(
    condition: &str,
    battle: &BattleState,
    source: Side,
    chosen_target: Option<usize>,
    registry: &ContentRegistry,
) -> bool {
    let condition = condition.trim();

    if let Some(status_id) = condition.strip_prefix("has_status:") {
        return has_status(battle.entity(source), status_id.trim());
    }

    if let Some(status_id) = condition.strip_prefix("target_has_status:") {
        return match chosen_target {
            Some(idx) if idx < battle.enemies.len() => {
                has_status(&battle.enemies[idx].entity, status_id.trim())
            }
            _ => false,
        };
    }

    if let Some(threshold) = condition.strip_prefix("hp_below:") {
        let Ok(threshold) = threshold.trim().parse::<i32>() else {
            return false;
        };
        return hp_percentage(battle, source).is_some_and(|pct| pct < f64::from(threshold));
    }

    if let Some(threshold) = condition.strip_prefix("hp_above:") {
        let Ok(threshold) = threshold.trim().parse::<i32>() else {
            return false;
        };
        return hp_percentage(battle, source).is_some_and(|pct| pct > f64::from(threshold));
    }

    if condition == "no_block" {
        return battle.entity(source).block == 0;
    }

    if condition == "hand_empty" {
        return battle.card_piles.hand.is_empty();
    }

    if let Some(n) = condition.strip_prefix("hand_size_gte:") {
        let Ok(n) = n.trim().parse::<usize>() else {
            return false;
        };
        return battle.card_piles.hand.len() >= n;
    }

    if condition == "only_attacks_in_hand" {
        let hand = &battle.card_piles.hand;
        if hand.is_empty() {
            return false;
        }
        return hand.iter().all(|card| {
            registry
                .card(&card.card_id)
                .is_some_and(|def| def.card_type == CardType::Attack)
        });
    }

    if condition == "enemy_intends_attack" {
        return match chosen_target {
            Some(idx) if idx < battle.enemies.len() => battle.enemies[idx]
                .intent
                .as_ref()
                .and_then(|intent| intent.damage)
                .is_some_and(|damage| damage > 0),
            _ => false,
        };
    }

    if condition == "target_is_dead" {
        return match chosen_target {
            Some(idx) if idx < battle.enemies.len() => battle.enemies[idx].entity.is_dead(),
            _ => false,
        };
    }

    if let Some(n) = condition.strip_prefix("turn_number:") {
        let Ok(n) = n.trim().parse::<u32>() else {
            return false;
        };
        return battle.turn == n;
    }

    warn!(condition, "unknown condition, evaluating to false");
    false
}

fn hp_percentage(battle: &BattleState, source: Side) -> Option<f64> {
    let entity = battle.entity(source);
    if entity.max_hp <= 0 {
        return None;
    }
    Some(f64::from(entity.current_hp) / f64::from(entity.max_hp) * 100.0)
}
