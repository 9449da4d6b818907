//! Read-only content definitions and the registry lookup surface.
//!
//! Everything here is produced by the external authoring pipeline and
//! consumed read-only by the engine. Serde names preserve the authored
//! JSON vocabulary so records round-trip losslessly.

pub mod actions;
pub mod cards;
pub mod enemies;
pub mod potions;
pub mod registry;
pub mod relics;
pub mod statuses;

pub use actions::{ActionKind, ActionNode};
pub use cards::{
    CardDefinition, CardRarity, CardTarget, CardType, UpgradeDefinition, COST_UNPLAYABLE, COST_X,
};
pub use enemies::{BehaviorPattern, EnemyDefinition, MoveDefinition, MoveKind};
pub use potions::{PotionDefinition, PotionRarity};
pub use registry::{ContentError, ContentRegistry};
pub use relics::{RelicDefinition, RelicTier};
pub use statuses::{StackBehavior, StatusDefinition, StatusTrigger};
