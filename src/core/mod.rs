//! Core state: seeded RNG, combatant entities, and the battle root.

pub mod entity;
pub mod rng;
pub mod state;

pub use entity::{Enemy, EnemyIntent, Entity, Player, Side};
pub use rng::GameRng;
pub use state::{BattleResult, BattleState, CardInstance, CardPiles, DrawPosition};
