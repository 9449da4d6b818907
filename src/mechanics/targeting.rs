//! Target resolution - symbolic target specifiers to enemy indices.
//!
//! `self` and `none` resolve to an empty list; the caller applies the
//! effect to the acting entity directly. Numeric specifiers (written by
//! the dispatchers when rewriting `attacker` placeholders) resolve to
//! that enemy index if it is still alive.

use smallvec::SmallVec;

use crate::core::{BattleState, Side};

/// Resolved enemy indices. Encounters rarely have more than 4 enemies.
pub type Targets = SmallVec<[usize; 4]>;

/// Resolve a symbolic target specifier to zero or more enemy indices.
pub fn resolve_targets(
    battle: &mut BattleState,
    _source: Side,
    target_spec: &str,
    chosen_target: Option<usize>,
) -> Targets {
    let spec = target_spec.trim().to_ascii_lowercase();

    match spec.as_str() {
        "enemy" | "default" => {
            if let Some(idx) = chosen_target {
                if idx < battle.enemies.len() && !battle.enemies[idx].entity.is_dead() {
                    return Targets::from_slice(&[idx]);
                }
            }
            battle
                .living_enemy_indices()
                .first()
                .map(|&idx| Targets::from_slice(&[idx]))
                .unwrap_or_default()
        }

        "all_enemies" => battle.living_enemy_indices().into_iter().collect(),

        "random" | "random_enemy" => {
            let living = battle.living_enemy_indices();
            match battle.rng.choice(&living) {
                Some(&idx) => Targets::from_slice(&[idx]),
                None => Targets::new(),
            }
        }

        "self" | "none" => Targets::new(),

        other => {
            // Numeric index written by attacker-placeholder rewriting.
            if let Ok(idx) = other.parse::<usize>() {
                if idx < battle.enemies.len() && !battle.enemies[idx].entity.is_dead() {
                    return Targets::from_slice(&[idx]);
                }
            }
            Targets::new()
        }
    }
}
