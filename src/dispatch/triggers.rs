//! Status-effect trigger dispatch.
//!
//! When a game event occurs, every scripted status on the affected
//! entity that listens for that event fires its action tree. The
//! built-in passives (vulnerable, weak, frail, strength, dexterity)
//! have no scripts; their effect is inline in the damage and block
//! pipelines, so they are skipped here.

use tracing::debug;

use crate::content::{ActionNode, StatusTrigger};
use crate::core::{BattleState, Side};
use crate::interp::ActionInterpreter;
use crate::mechanics::is_builtin_passive;

/// Fire every status on `owner` that listens for `trigger`.
///
/// `attacker` binds the `"attacker"` target placeholder for reactive
/// triggers (thorns-style effects on `OnAttacked`).
pub fn fire_status_triggers(
    interp: &mut ActionInterpreter,
    battle: &mut BattleState,
    owner: Side,
    trigger: StatusTrigger,
    attacker: Option<Side>,
) {
    if battle.is_over {
        return;
    }
    // Dead entities fire nothing except their death triggers.
    if battle.entity(owner).is_dead() && trigger != StatusTrigger::OnDeath {
        return;
    }

    // Sorted for a stable firing order independent of map history.
    let mut status_ids: Vec<String> = battle.entity(owner).status_effects.keys().cloned().collect();
    status_ids.sort();

    for status_id in status_ids {
        if battle.is_over {
            return;
        }
        if is_builtin_passive(&status_id) {
            continue;
        }

        let stacks = battle.entity(owner).status(&status_id);
        if stacks <= 0 {
            continue;
        }

        // A status with no definition is inert, not an error.
        let Some(def) = interp.registry().status(&status_id) else {
            debug!(status = %status_id, "status has no definition, skipping triggers");
            continue;
        };
        let Some(actions) = def.triggers.get(&trigger) else {
            continue;
        };

        let prepared: Vec<ActionNode> = actions
            .iter()
            .filter(|node| attacker.is_some() || node.target.as_deref() != Some("attacker"))
            .map(|node| prepare_node(node, stacks, attacker))
            .collect();

        interp.execute_actions(&prepared, battle, owner, None);
    }
}

/// Rewrite a trigger node for execution: resolve per-stack scaling tags
/// and bind the `"attacker"` placeholder, recursively.
fn prepare_node(node: &ActionNode, stacks: i32, attacker: Option<Side>) -> ActionNode {
    let mut node = node.clone();

    match node.condition.as_deref() {
        Some("per_stack") => {
            node.value = Some(node.value.unwrap_or(1) * stacks);
            node.condition = None;
        }
        Some("per_stack_raw") => {
            node.value = Some(node.value.unwrap_or(1) * stacks);
            node.condition = Some("raw".to_string());
        }
        Some("per_stack_no_strength") => {
            node.value = Some(node.value.unwrap_or(1) * stacks);
            node.condition = Some("no_strength".to_string());
        }
        _ => {}
    }

    rewrite_attacker(&mut node, attacker);

    if let Some(children) = node.children.take() {
        node.children = Some(
            children
                .iter()
                .map(|child| prepare_node(child, stacks, attacker))
                .collect(),
        );
    }

    node
}

/// Replace an `"attacker"` target with the concrete side that caused
/// the event.
pub(crate) fn rewrite_attacker(node: &mut ActionNode, attacker: Option<Side>) {
    if node.target.as_deref() != Some("attacker") {
        return;
    }
    node.target = Some(match attacker {
        Some(Side::Player) => "player".to_string(),
        Some(Side::Enemy(idx)) => idx.to_string(),
        None => "none".to_string(),
    });
}
