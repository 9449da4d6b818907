//! Status-effect lifecycle: apply, remove, decay, query.
//!
//! Built-in statuses come in two families:
//! - decaying (`vulnerable`, `weak`, `frail`) lose 1 stack at end of
//!   turn and are removed at 0;
//! - permanent (`strength`, `dexterity`) never decay and may be stored
//!   negative (a strength-down debuff is still "present").
//!
//! Everything else is a custom status defined in content, decaying by
//! its definition's `decay_per_turn` and removed once stacks fall to or
//! below its `min_stacks` floor. The built-ins have no scripted
//! behavior; their effect is inline in the damage/block pipelines.

use crate::content::ContentRegistry;
use crate::core::Entity;

/// Built-in statuses that lose 1 stack at end of turn.
pub const BUILTIN_DECAY_STATUSES: [&str; 3] = ["vulnerable", "weak", "frail"];

/// Built-in statuses that never decay and may go negative.
pub const BUILTIN_PERMANENT_STATUSES: [&str; 2] = ["strength", "dexterity"];

#[must_use]
pub fn is_builtin_decay(status_id: &str) -> bool {
    BUILTIN_DECAY_STATUSES.contains(&status_id)
}

#[must_use]
pub fn is_builtin_permanent(status_id: &str) -> bool {
    BUILTIN_PERMANENT_STATUSES.contains(&status_id)
}

/// True for every status with no scripted behavior of its own.
#[must_use]
pub fn is_builtin_passive(status_id: &str) -> bool {
    is_builtin_decay(status_id) || is_builtin_permanent(status_id)
}

/// Add a signed stack delta to a status on an entity.
///
/// Non-permanent statuses whose total falls to 0 or below are removed
/// entirely; the permanent built-ins stay in the map even when negative.
pub fn apply_status(entity: &mut Entity, status_id: &str, stacks: i32) {
    let total = entity.status(status_id) + stacks;
    if total <= 0 && !is_builtin_permanent(status_id) {
        entity.status_effects.remove(status_id);
    } else {
        entity.status_effects.insert(status_id.to_string(), total);
    }
}

/// Completely remove a status from an entity.
pub fn remove_status(entity: &mut Entity, status_id: &str) {
    entity.status_effects.remove(status_id);
}

/// Whether the entity currently "has" the status.
///
/// Permanent built-ins count as present even at negative stacks.
#[must_use]
pub fn has_status(entity: &Entity, status_id: &str) -> bool {
    match entity.status_effects.get(status_id) {
        None => false,
        Some(_) if is_builtin_permanent(status_id) => true,
        Some(&stacks) => stacks > 0,
    }
}

/// Current stack count, 0 if absent.
#[must_use]
pub fn status_stacks(entity: &Entity, status_id: &str) -> i32 {
    entity.status(status_id)
}

/// End-of-turn decay pass over every status on an entity.
pub fn decay_statuses(entity: &mut Entity, registry: &ContentRegistry) {
    let ids: Vec<String> = entity.status_effects.keys().cloned().collect();

    for status_id in ids {
        if is_builtin_permanent(&status_id) {
            continue;
        }

        let stacks = entity.status(&status_id);

        if is_builtin_decay(&status_id) {
            let new_stacks = stacks - 1;
            if new_stacks <= 0 {
                entity.status_effects.remove(&status_id);
            } else {
                entity.status_effects.insert(status_id, new_stacks);
            }
            continue;
        }

        if let Some(defn) = registry.status(&status_id) {
            if defn.decay_per_turn > 0 {
                let new_stacks = stacks - defn.decay_per_turn;
                if new_stacks <= defn.min_stacks {
                    entity.status_effects.remove(&status_id);
                } else {
                    entity.status_effects.insert(status_id, new_stacks);
                }
            }
        }
    }
}
