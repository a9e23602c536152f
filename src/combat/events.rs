//! Combat events
//!
//! Defines the events passed between attack resolution, damage application
//! and death handling.

use bevy::prelude::*;

/// Event fired when a resolved attack deals damage
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    /// Entity dealing the damage
    pub source: Entity,
    /// Entity receiving the damage
    pub target: Entity,
    /// Final damage amount
    pub amount: f32,
    /// Name of the attack slot that caused the damage
    pub attack_name: String,
    /// Whether this was a critical hit
    pub is_critical: bool,
}

/// Event fired when a combatant dies
#[derive(Event, Debug, Clone, Copy)]
pub struct CombatantDeathEvent {
    /// Entity that died
    pub victim: Entity,
    /// Entity that dealt the killing blow
    pub killer: Option<Entity>,
}
