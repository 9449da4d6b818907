//! Encounter simulation: enemy AI, the combat loop, telemetry, and the
//! batch driver.

pub mod batch;
pub mod combat;
pub mod enemy_ai;
pub mod telemetry;

pub use batch::{BatchRunner, EncounterConfig};
pub use combat::{CombatSimulator, MAX_TURNS};
pub use enemy_ai::{EnemyAi, MoveOutcome};
pub use telemetry::{summarize, BatchSummary, BattleTelemetry, RunTelemetry};
