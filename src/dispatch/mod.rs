//! Event dispatch: routing game events to status triggers and relics.
//!
//! The combat loop raises events (turn start, card played, attacked,
//! ...); this layer finds the content that listens for them and runs it
//! through the interpreter. Status triggers fire on the entity that
//! owns the status; relics always execute as the player.

pub mod relics;
pub mod triggers;

pub use relics::RelicDispatcher;
pub use triggers::fire_status_triggers;
