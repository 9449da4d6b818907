//! # spire-sim
//!
//! A headless, deterministic simulator of turn-based deck-building
//! combat, built to run thousands of seeded encounters per second for
//! statistical balance analysis of procedurally authored content.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Every run is a pure function of its seed and
//!    configuration. RNG sub-streams are forked by name so subsystems
//!    never perturb each other.
//!
//! 2. **Content Is Data**: Cards, statuses, relics, potions, and enemy
//!    moves all describe behavior as JSON-shaped action-node trees; the
//!    engine interprets, it never hardcodes card logic.
//!
//! 3. **Bad Content Never Panics**: Malformed nodes are logged and
//!    skipped, impossible requests are no-ops, numeric invariants are
//!    clamped at the mechanics boundary.
//!
//! ## Modules
//!
//! - `core`: Seeded RNG, entities, battle state, card piles
//! - `content`: Definition types, registry, JSON loading
//! - `mechanics`: Damage, block, energy, status lifecycle, targeting
//! - `interp`: The recursive action-node interpreter
//! - `dispatch`: Status-trigger and relic dispatch
//! - `agents`: Pluggable player policies (random, heuristic)
//! - `sim`: Enemy AI, combat loop, telemetry, batch driver

pub mod agents;
pub mod content;
pub mod core;
pub mod dispatch;
pub mod interp;
pub mod mechanics;
pub mod sim;

// Re-export commonly used types
pub use crate::core::{
    BattleResult, BattleState, CardInstance, CardPiles, DrawPosition, Enemy, EnemyIntent, Entity,
    GameRng, Player, Side,
};

pub use crate::content::{
    ActionKind, ActionNode, BehaviorPattern, CardDefinition, CardRarity, CardTarget, CardType,
    ContentError, ContentRegistry, EnemyDefinition, MoveDefinition, MoveKind, PotionDefinition,
    PotionRarity, RelicDefinition, RelicTier, StackBehavior, StatusDefinition, StatusTrigger,
    UpgradeDefinition, COST_UNPLAYABLE, COST_X,
};

pub use crate::interp::ActionInterpreter;

pub use crate::dispatch::{fire_status_triggers, RelicDispatcher};

pub use crate::agents::{
    build_agent, AgentKind, HeuristicAgent, PlayAgent, PlayChoice, PotionChoice, RandomAgent,
    RestAction,
};

pub use crate::sim::{
    summarize, BatchRunner, BatchSummary, BattleTelemetry, CombatSimulator, EncounterConfig,
    RunTelemetry, MAX_TURNS,
};
