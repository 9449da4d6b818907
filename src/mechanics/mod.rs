//! Numeric mechanics pipelines: damage, block, energy, status
//! lifecycle, and target resolution.
//!
//! These are the primitive operations the interpreter composes. They
//! clamp at their boundaries (HP, block, energy never go negative) so
//! invariant violations are prevented here, not handled as errors
//! elsewhere.

pub mod block;
pub mod damage;
pub mod energy;
pub mod statuses;
pub mod targeting;

pub use block::{calculate_block, gain_block};
pub use damage::{calculate_damage, deal_damage};
pub use energy::{gain_energy, lose_energy, reset_energy, spend_energy};
pub use statuses::{
    apply_status, decay_statuses, has_status, is_builtin_passive, remove_status, status_stacks,
};
pub use targeting::{resolve_targets, Targets};
