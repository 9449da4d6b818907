//! Damage calculation and application.
//!
//! Pipeline, in order:
//! 1. add the source's strength to the base;
//! 2. if the target is vulnerable, multiply by 1.5 and floor;
//! 3. if the source is weak, multiply by 0.75 and floor;
//! 4. clamp at 0.
//!
//! Application subtracts from block first; only the excess reduces HP.

use crate::core::{BattleState, Entity, Side};

use super::statuses::{has_status, status_stacks};

/// Final damage after all modifiers, never negative.
#[must_use]
pub fn calculate_damage(base: i32, source: &Entity, target: &Entity) -> i32 {
    let mut damage = base + status_stacks(source, "strength");

    if has_status(target, "vulnerable") {
        damage = (f64::from(damage) * 1.5).floor() as i32;
    }

    if has_status(source, "weak") {
        damage = (f64::from(damage) * 0.75).floor() as i32;
    }

    damage.max(0)
}

/// Deal `hits` hits of `base` damage from `source` to `target`.
///
/// Block is shared across hits, not reset per hit; the sequence stops
/// early if the target dies. Returns total HP actually lost.
pub fn deal_damage(battle: &mut BattleState, source: Side, target: Side, base: i32, hits: i32) -> i32 {
    let mut total_hp_lost = 0;

    for _ in 0..hits.max(0) {
        if battle.entity(target).is_dead() {
            break;
        }

        let final_damage = calculate_damage(base, battle.entity(source), battle.entity(target));
        total_hp_lost += battle.entity_mut(target).take_damage(final_damage);
    }

    total_hp_lost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, Player};
    use crate::mechanics::statuses::apply_status;

    fn battle_vs(enemy_hp: i32) -> BattleState {
        let player = Player::new("p", 80, 3);
        let enemy = crate::core::Enemy::new("dummy", "Dummy", enemy_hp);
        BattleState::new(player, vec![enemy], GameRng::new(1))
    }

    #[test]
    fn test_pipeline_strength_then_vulnerable() {
        let mut source = Entity::new("src", 10);
        let mut target = Entity::new("tgt", 10);
        apply_status(&mut source, "strength", 3);
        apply_status(&mut target, "vulnerable", 2);

        // floor((6 + 3) * 1.5) = 13
        assert_eq!(calculate_damage(6, &source, &target), 13);

        // then weak: floor(13 * 0.75) = 9
        apply_status(&mut source, "weak", 1);
        assert_eq!(calculate_damage(6, &source, &target), 9);
    }

    #[test]
    fn test_damage_never_negative() {
        let mut source = Entity::new("src", 10);
        let target = Entity::new("tgt", 10);
        apply_status(&mut source, "strength", -10);
        assert_eq!(calculate_damage(3, &source, &target), 0);
    }

    #[test]
    fn test_multi_hit_shares_block() {
        let mut battle = battle_vs(30);
        battle.enemies[0].entity.apply_block(5);

        // Three 4-damage hits against 5 block: 0 + 3 + 4 HP lost.
        let lost = deal_damage(&mut battle, Side::Player, Side::Enemy(0), 4, 3);
        assert_eq!(lost, 7);
        assert_eq!(battle.enemies[0].entity.block, 0);
        assert_eq!(battle.enemies[0].entity.current_hp, 23);
    }

    #[test]
    fn test_multi_hit_stops_on_death() {
        let mut battle = battle_vs(5);
        let lost = deal_damage(&mut battle, Side::Player, Side::Enemy(0), 4, 10);
        assert_eq!(lost, 5);
        assert!(battle.enemies[0].entity.is_dead());
    }
}
