//! Collaborator Interfaces
//!
//! The character control core reads stats from a [`StatusProvider`], tracks
//! its target in a [`TargetingState`], hands fired attacks to an
//! [`AttackExecutor`] and forwards mode requests to a [`CharacterAi`].
//! All of them are injected when the character is built.

use bevy::math::Vec2;
use bevy::prelude::Entity;

use super::attack_order::AttackStyle;

/// Source of movement and attack stats, including live modifiers.
pub trait StatusProvider {
    fn base_move_speed(&self) -> f32;

    /// Signed additive modifier to move speed.
    fn move_speed_fluctuation(&self) -> f32;

    fn base_auto_attack_delay(&self) -> f32;

    /// Signed modifier subtracted from the attack delay.
    fn auto_attack_delay_fluctuation(&self) -> f32;

    /// Whether a condition currently pins the character in place.
    fn is_immobile(&self) -> bool;

    /// Switch condition processing on or off. Providers without conditions
    /// can ignore this.
    fn set_conditions_enabled(&mut self, _enabled: bool) {}
}

/// A fired auto-attack, handed to the executor as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRequest {
    pub slot_index: usize,
    pub target: Entity,
}

/// Performs the actual attack effect. Fire-and-forget: failures stay inside
/// the executor.
pub trait AttackExecutor {
    fn execute(&mut self, request: AttackRequest);
}

/// Anything that can be walked to: a position and a body size.
pub trait BattleObject {
    fn entity(&self) -> Entity;
    fn position(&self) -> Vec2;
    fn object_size(&self) -> f32;
}

/// Plain snapshot of another battle participant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectSnapshot {
    pub entity: Entity,
    pub position: Vec2,
    pub size: f32,
}

impl BattleObject for ObjectSnapshot {
    fn entity(&self) -> Entity {
        self.entity
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn object_size(&self) -> f32 {
        self.size
    }
}

/// Which entity is currently targeted, if any.
///
/// Cleared from outside (target died, despawned, deselected) between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetingState {
    target: Option<Entity>,
}

impl TargetingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_target(&self) -> Option<Entity> {
        self.target
    }

    pub fn set_current_target(&mut self, target: Entity) {
        self.target = Some(target);
    }

    pub fn clear(&mut self) {
        self.target = None;
    }

    pub fn is_targeting(&self, entity: Entity) -> bool {
        self.target == Some(entity)
    }
}

/// Where a move-mode request should lead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveDestination {
    Point(Vec2),
    Target(Entity),
}

/// What the AI learns about its owner when the owner is set up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnerProfile {
    pub position: Vec2,
    pub size: f32,
    pub attack_style: AttackStyle,
    pub attack_slot_count: usize,
}

/// Decision layer that owns mode changes.
///
/// The character forwards mode requests here and never drives the AI's own
/// decision loop; the AI calls back into the character's public commands
/// from that loop.
pub trait CharacterAi {
    fn setup(&mut self, owner: &OwnerProfile);
    fn set_stay_mode(&mut self);
    fn set_move_mode(&mut self, destination: MoveDestination);
    fn set_beware_mode(&mut self, search_time: f32);
    fn set_aiming_mode(&mut self, target: Entity);
}

/// Placeholder AI type for characters built without a decision layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAi;

impl CharacterAi for NoAi {
    fn setup(&mut self, _owner: &OwnerProfile) {}
    fn set_stay_mode(&mut self) {}
    fn set_move_mode(&mut self, _destination: MoveDestination) {}
    fn set_beware_mode(&mut self, _search_time: f32) {}
    fn set_aiming_mode(&mut self, _target: Entity) {}
}
