//! Skirmish - Character Control Core and Headless Arena
//!
//! A per-character control core for real-time battles: smooth facing,
//! destination-driven auto-movement and a fixed-cadence auto-attack loop,
//! gated by life, stun, immobilization and action restriction. The headless
//! arena runs teams of these characters against each other.
//!
//! This library exposes the core modules for testing and reuse.

pub mod character;
pub mod cli;
pub mod combat;
pub mod headless;
pub mod status;

// Re-export commonly used types
pub use character::{
    AttackExecutor, AttackOrder, AttackRequest, BattleObject, CadenceStep, Character,
    CharacterAi, MoveDestination, MoveStyle, StatusProvider, TargetingState,
};
pub use combat::log::{CombatLog, CombatLogEventType};
pub use headless::{HeadlessMatchConfig, MatchResult};
pub use status::{CharacterStatus, Condition, ConditionKind};
