//! Combat Components
//!
//! ECS-side wrappers around the character control core: the [`Combatant`]
//! component, the queueing attack executor and the seeded RNG.

use bevy::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use super::ai::ArenaAi;
use super::log::CombatantId;
use crate::character::{AttackExecutor, AttackRequest, BattleObject, Character};
use crate::status::CharacterStatus;

/// The character type used by arena combatants.
pub type ArenaCharacter = Character<CharacterStatus, AttackQueue, ArenaAi>;

/// Attack executor that defers fired attacks to the resolution system.
#[derive(Debug, Default, Clone)]
pub struct AttackQueue {
    pending: Vec<AttackRequest>,
}

impl AttackExecutor for AttackQueue {
    fn execute(&mut self, request: AttackRequest) {
        self.pending.push(request);
    }
}

impl AttackQueue {
    pub fn drain(&mut self) -> Vec<AttackRequest> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Seeded random number generator for deterministic match simulation.
///
/// When a seed is provided (e.g., via headless config), the same seed will
/// always produce the same match outcome. Without a seed, uses system entropy.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Square play area centred on the origin. Locomotion never leaves it.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ArenaBounds {
    pub half_extent: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            half_extent: f32::INFINITY,
        }
    }
}

impl ArenaBounds {
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        position.clamp(Vec2::splat(-self.half_extent), Vec2::splat(self.half_extent))
    }
}

/// One arena participant.
#[derive(Component)]
pub struct Combatant {
    /// Log identifier, e.g. "Team 1 Gunner #1"
    pub id: CombatantId,
    /// Team identifier (1 or 2)
    pub team: u8,
    /// Archetype name from the archetype definitions
    pub archetype: String,
    pub max_health: f32,
    /// Combatant dies when this reaches 0
    pub current_health: f32,
    /// World position, owned by the locomotion step
    pub position: Vec2,
    /// Movement and auto-attack control
    pub character: ArenaCharacter,
    /// Seconds of special damage (stun) left
    pub special_damage_remaining: f32,
    /// Seconds of action restriction left
    pub restrict_remaining: f32,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub attacks_fired: u32,
    /// Bumped by the character's move-end notification
    pub move_ends: Arc<AtomicU32>,
}

impl Combatant {
    pub fn new(
        id: CombatantId,
        team: u8,
        archetype: impl Into<String>,
        max_health: f32,
        position: Vec2,
        mut character: ArenaCharacter,
    ) -> Self {
        let move_ends = Arc::new(AtomicU32::new(0));
        let counter = move_ends.clone();
        character.on_move_end(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        character.sync_position(position);

        Self {
            id,
            team,
            archetype: archetype.into(),
            max_health,
            current_health: max_health,
            position,
            character,
            special_damage_remaining: 0.0,
            restrict_remaining: 0.0,
            damage_dealt: 0.0,
            damage_taken: 0.0,
            attacks_fired: 0,
            move_ends,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0.0
    }

    pub fn move_end_count(&self) -> u32 {
        self.move_ends.load(Ordering::Relaxed)
    }

    /// Gap between body edges.
    pub fn edge_distance_to(&self, other: &impl BattleObject) -> f32 {
        (self.position.distance(other.position()) - self.character.size() - other.object_size())
            .max(0.0)
    }
}
