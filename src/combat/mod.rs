//! Combat system
//!
//! Runs arena characters on top of the character control core:
//! - AI decisions and mode handling
//! - Conditions, stuns and action locks
//! - Locomotion toward move points
//! - Auto-attack resolution, damage and deaths
//! - Combat logging

use bevy::prelude::*;

pub mod ai;
pub mod components;
pub mod events;
pub mod log;
pub mod systems;

use components::{ArenaBounds, GameRng};
use events::*;
use systems::*;

/// System set labels for combat system ordering.
///
/// Use these to order systems that read or write combatants, e.g. the
/// headless match-end check runs after `CombatResolution`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSystemPhase {
    /// Phase 1: match clock, AI decisions, condition and stun timers
    Decisions,
    /// Phase 2: locomotion, facing and auto-attack cadence
    CombatAndMovement,
    /// Phase 3: attack resolution, damage, deaths
    CombatResolution,
}

/// Plugin for the combat system
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Combat events
            .add_event::<DamageEvent>()
            .add_event::<CombatantDeathEvent>()
            // Resources
            .init_resource::<log::CombatLog>()
            .init_resource::<GameRng>()
            .init_resource::<ArenaBounds>()
            .configure_sets(
                Update,
                (
                    CombatSystemPhase::Decisions,
                    CombatSystemPhase::CombatAndMovement,
                    CombatSystemPhase::CombatResolution,
                )
                    .chain(),
            )
            // Systems
            .add_systems(
                Update,
                (advance_match_clock, run_ai_decisions, update_status_timers)
                    .chain()
                    .in_set(CombatSystemPhase::Decisions),
            )
            .add_systems(
                Update,
                (move_characters, tick_characters)
                    .chain()
                    .in_set(CombatSystemPhase::CombatAndMovement),
            )
            .add_systems(
                Update,
                (resolve_attacks, apply_damage, handle_deaths)
                    .chain()
                    .in_set(CombatSystemPhase::CombatResolution),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_are_distinct() {
        assert_ne!(
            CombatSystemPhase::Decisions,
            CombatSystemPhase::CombatAndMovement
        );
        assert_ne!(
            CombatSystemPhase::CombatAndMovement,
            CombatSystemPhase::CombatResolution
        );
    }
}
