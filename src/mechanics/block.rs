//! Block gain with dexterity and frail modifiers.

use crate::core::Entity;

use super::statuses::{has_status, status_stacks};

/// Effective block for a base amount: `floor(base + dexterity)`, times
/// 0.75 (floored) if the entity is frail, never negative.
#[must_use]
pub fn calculate_block(base: i32, entity: &Entity) -> i32 {
    let mut block = base + status_stacks(entity, "dexterity");

    if has_status(entity, "frail") {
        block = (f64::from(block) * 0.75).floor() as i32;
    }

    block.max(0)
}

/// Add modified block to an entity.
pub fn gain_block(entity: &mut Entity, base: i32) {
    let block = calculate_block(base, entity);
    entity.apply_block(block);
}
