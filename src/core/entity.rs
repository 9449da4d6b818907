//! Combatant entities - the player and enemies.
//!
//! Everything that can take damage shares the same shape: hit points,
//! block, and a map from status-effect id to signed stack count. Status
//! *semantics* (application, decay, the permanent built-ins) live in
//! `mechanics::statuses`; this module only holds the raw state and the
//! clamped HP/block arithmetic.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Which side of the battle an acting entity is on.
///
/// Threaded through the interpreter, dispatchers, and mechanics so an
/// action script can run identically whether a card, a status on an
/// enemy, or a relic fired it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    /// Index into `BattleState::enemies`.
    Enemy(usize),
}

/// Common state for anything with HP, block, and status effects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub max_hp: i32,
    pub current_hp: i32,
    pub block: i32,
    /// Status-effect id -> current stack count. Absent key means zero
    /// stacks. Entries at or below zero are removed by
    /// `mechanics::statuses::apply_status`, except the permanent
    /// built-ins which may be stored negative.
    #[serde(default)]
    pub status_effects: FxHashMap<String, i32>,
}

impl Entity {
    #[must_use]
    pub fn new(name: impl Into<String>, max_hp: i32) -> Self {
        Self {
            name: name.into(),
            max_hp,
            current_hp: max_hp,
            block: 0,
            status_effects: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current_hp <= 0
    }

    /// Add block. Negative amounts are ignored.
    pub fn apply_block(&mut self, amount: i32) {
        self.block += amount.max(0);
    }

    /// Remove up to `amount` block. Block never goes below 0.
    pub fn lose_block(&mut self, amount: i32) {
        self.block = (self.block - amount).max(0);
    }

    pub fn clear_block(&mut self) {
        self.block = 0;
    }

    /// Apply damage: absorbed by block first, remainder to HP.
    ///
    /// Returns the HP actually lost (damage that got through block).
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }

        let blocked = self.block.min(amount);
        self.block -= blocked;
        let remaining = amount - blocked;

        let hp_lost = self.current_hp.min(remaining).max(0);
        self.current_hp -= hp_lost;
        hp_lost
    }

    /// Heal HP, capped at `max_hp`. Negative amounts are ignored.
    pub fn heal(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
    }

    /// Raw stack count for a status, 0 if absent.
    #[must_use]
    pub fn status(&self, status_id: &str) -> i32 {
        self.status_effects.get(status_id).copied().unwrap_or(0)
    }
}

/// The player character: an entity plus energy, gold, and the
/// strength/dexterity convenience mirrors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub entity: Entity,
    pub energy: i32,
    pub max_energy: i32,
    pub gold: i32,
}

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>, max_hp: i32, max_energy: i32) -> Self {
        Self {
            entity: Entity::new(name, max_hp),
            energy: 0,
            max_energy,
            gold: 0,
        }
    }

    /// Current strength, mirrored from the status map.
    #[must_use]
    pub fn strength(&self) -> i32 {
        self.entity.status("strength")
    }

    /// Current dexterity, mirrored from the status map.
    #[must_use]
    pub fn dexterity(&self) -> i32 {
        self.entity.status("dexterity")
    }
}

/// What an enemy has locked in for the upcoming round, shown to the
/// player before they act.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyIntent {
    /// `"attack"`, `"defend"`, `"attack_defend"`, `"buff"`, `"debuff"`,
    /// or `"unknown"`.
    pub kind: String,
    /// Per-hit damage, `None` if not attacking.
    pub damage: Option<i32>,
    /// Number of hits (multi-attacks).
    pub hits: i32,
    /// Block the enemy will gain, `None` if none.
    pub block: Option<i32>,
}

/// A single enemy in combat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub entity: Entity,
    /// Ties this instance back to its content definition.
    pub enemy_id: String,
    /// Locked-in intent for the upcoming round, set by move selection.
    pub intent: Option<EnemyIntent>,
    /// Id of the selected move, consumed by the enemy phase.
    pub current_move: Option<String>,
}

impl Enemy {
    #[must_use]
    pub fn new(enemy_id: impl Into<String>, name: impl Into<String>, max_hp: i32) -> Self {
        Self {
            entity: Entity::new(name, max_hp),
            enemy_id: enemy_id.into(),
            intent: None,
            current_move: None,
        }
    }

    /// Current strength, mirrored from the status map.
    #[must_use]
    pub fn strength(&self) -> i32 {
        self.entity.status("strength")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_damage_block_first() {
        let mut e = Entity::new("dummy", 20);
        e.apply_block(5);

        let hp_lost = e.take_damage(8);
        assert_eq!(hp_lost, 3);
        assert_eq!(e.block, 0);
        assert_eq!(e.current_hp, 17);
    }

    #[test]
    fn test_take_damage_fully_blocked() {
        let mut e = Entity::new("dummy", 20);
        e.apply_block(10);

        assert_eq!(e.take_damage(4), 0);
        assert_eq!(e.block, 6);
        assert_eq!(e.current_hp, 20);
    }

    #[test]
    fn test_take_damage_clamps_at_zero_hp() {
        let mut e = Entity::new("dummy", 5);
        assert_eq!(e.take_damage(100), 5);
        assert_eq!(e.current_hp, 0);
        assert!(e.is_dead());
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut e = Entity::new("dummy", 20);
        e.take_damage(10);
        e.heal(100);
        assert_eq!(e.current_hp, 20);

        e.heal(-5);
        assert_eq!(e.current_hp, 20);
    }

    #[test]
    fn test_lose_block_floors_at_zero() {
        let mut e = Entity::new("dummy", 20);
        e.apply_block(3);
        e.lose_block(10);
        assert_eq!(e.block, 0);
    }

    #[test]
    fn test_player_mirrors_status_map() {
        let mut p = Player::new("Ironclad", 80, 3);
        p.entity.status_effects.insert("strength".into(), 4);
        p.entity.status_effects.insert("dexterity".into(), -2);

        assert_eq!(p.strength(), 4);
        assert_eq!(p.dexterity(), -2);
    }
}
