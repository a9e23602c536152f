//! Arena AI
//!
//! [`ArenaAi`] is the decision layer attached to every arena character.
//!
//! ## Architecture
//!
//! The AI works in two halves:
//! 1. **Mode requests**: the character forwards `set_*_mode` calls through
//!    [`CharacterAi`]; the AI only records the requested [`AiMode`].
//! 2. **Decision loop**: [`decide`] runs from the combat systems every frame,
//!    thinks every [`AI_THINK_INTERVAL`] seconds, and drives the character
//!    through its public commands (move, stop, play/stop auto-attack).
//!
//! Aiming re-issues `set_move_target` on every think while out of reach, so a
//! fleeing target is followed even though each move captures a fixed point.

use bevy::prelude::*;

use super::components::ArenaCharacter;
use crate::character::{BattleObject, CharacterAi, MoveDestination, OwnerProfile};

/// Seconds between AI decisions
pub const AI_THINK_INTERVAL: f32 = 0.2;

/// Search time used when an aimed target is lost or a move ends
pub const DEFAULT_BEWARE_SECS: f32 = 10.0;

/// Per-frame snapshot of a single combatant, used for AI decision making.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatantInfo {
    pub entity: Entity,
    pub team: u8,
    pub position: Vec2,
    pub size: f32,
    pub is_alive: bool,
}

impl BattleObject for CombatantInfo {
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

/// What the AI is currently trying to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiMode {
    /// Hold position
    Stay,
    /// Walk somewhere; `issued` once the move command went out
    Move {
        destination: MoveDestination,
        issued: bool,
    },
    /// Look for the nearest enemy for `remaining` seconds
    Beware { remaining: f32 },
    /// Close in on and auto-attack `target`
    Aiming(Entity),
}

#[derive(Debug, Clone)]
pub struct ArenaAi {
    mode: AiMode,
    think_timer: f32,
    since_last_think: f32,
    beware_secs: f32,
    home: Vec2,
}

impl Default for ArenaAi {
    fn default() -> Self {
        Self::new(DEFAULT_BEWARE_SECS)
    }
}

impl ArenaAi {
    pub fn new(beware_secs: f32) -> Self {
        Self {
            mode: AiMode::Stay,
            think_timer: 0.0,
            since_last_think: 0.0,
            beware_secs,
            home: Vec2::ZERO,
        }
    }

    pub fn mode(&self) -> AiMode {
        self.mode
    }

    /// Position recorded at setup
    pub fn home(&self) -> Vec2 {
        self.home
    }

    /// Advance the think timer. Returns the seconds since the previous
    /// decision when it is time to think again.
    fn ready_to_think(&mut self, dt: f32) -> Option<f32> {
        self.since_last_think += dt;
        self.think_timer -= dt;
        if self.think_timer > 0.0 {
            return None;
        }

        self.think_timer = AI_THINK_INTERVAL;
        Some(std::mem::take(&mut self.since_last_think))
    }
}

impl CharacterAi for ArenaAi {
    fn setup(&mut self, owner: &OwnerProfile) {
        self.home = owner.position;
        self.mode = AiMode::Stay;
        self.think_timer = 0.0;
        self.since_last_think = 0.0;
    }

    fn set_stay_mode(&mut self) {
        self.mode = AiMode::Stay;
    }

    fn set_move_mode(&mut self, destination: MoveDestination) {
        self.mode = AiMode::Move {
            destination,
            issued: false,
        };
    }

    fn set_beware_mode(&mut self, search_time: f32) {
        self.mode = AiMode::Beware {
            remaining: search_time,
        };
    }

    fn set_aiming_mode(&mut self, target: Entity) {
        self.mode = AiMode::Aiming(target);
    }
}

fn find_alive(world: &[CombatantInfo], entity: Entity) -> Option<CombatantInfo> {
    world
        .iter()
        .find(|info| info.entity == entity && info.is_alive)
        .copied()
}

fn nearest_enemy(world: &[CombatantInfo], team: u8, from: Vec2) -> Option<CombatantInfo> {
    world
        .iter()
        .filter(|info| info.team != team && info.is_alive)
        .min_by(|a, b| {
            a.position
                .distance_squared(from)
                .total_cmp(&b.position.distance_squared(from))
        })
        .copied()
}

/// Strongest attack slot whose range covers `gap`.
fn best_slot_for_gap(character: &ArenaCharacter, gap: f32) -> Option<usize> {
    character
        .attack_orders()
        .iter()
        .enumerate()
        .filter(|(_, order)| order.reaches(gap))
        .max_by(|(_, a), (_, b)| a.power.total_cmp(&b.power))
        .map(|(index, _)| index)
}

fn mark_move_issued(character: &mut ArenaCharacter) {
    if let Some(ai) = character.ai_mut() {
        if let AiMode::Move { issued, .. } = &mut ai.mode {
            *issued = true;
        }
    }
}

/// Run the AI decision loop for one character.
///
/// `world` holds a snapshot of every combatant, including this one.
pub fn decide(character: &mut ArenaCharacter, team: u8, world: &[CombatantInfo], dt: f32) {
    if !character.is_alive() {
        return;
    }
    let Some(ai) = character.ai_mut() else {
        return;
    };
    let Some(elapsed) = ai.ready_to_think(dt) else {
        return;
    };
    let mode = ai.mode;
    let beware_secs = ai.beware_secs;

    match mode {
        AiMode::Stay => {
            if character.is_auto_moving() {
                character.stop_moving();
            }
        }
        AiMode::Move {
            destination: MoveDestination::Point(point),
            issued,
        } => {
            if !issued {
                character.set_move_point(point);
                mark_move_issued(character);
            } else if !character.is_auto_moving() {
                character.set_beware_mode(beware_secs);
            }
        }
        AiMode::Move {
            destination: MoveDestination::Target(entity),
            issued,
        } => match find_alive(world, entity) {
            Some(target) if !issued || character.is_auto_moving() => {
                character.set_move_target(Some(&target));
                mark_move_issued(character);
            }
            _ => character.set_beware_mode(beware_secs),
        },
        AiMode::Beware { remaining } => {
            let remaining = remaining - elapsed;
            match nearest_enemy(world, team, character.position()) {
                Some(enemy) => {
                    debug!("AI spotted {:?}, switching to aiming", enemy.entity);
                    character.set_aiming_mode(enemy.entity);
                }
                None if remaining <= 0.0 => character.set_stay_mode(),
                None => character.set_beware_mode(remaining),
            }
        }
        AiMode::Aiming(entity) => {
            let Some(target) = find_alive(world, entity) else {
                character.stop_auto_attack();
                character.set_beware_mode(beware_secs);
                return;
            };

            let gap = (character.position().distance(target.position)
                - character.size()
                - target.size)
                .max(0.0);

            match best_slot_for_gap(character, gap) {
                Some(slot) => {
                    if character.is_auto_moving() {
                        character.stop_moving();
                    }
                    if let Some(targeting) = character.targeting_mut() {
                        targeting.set_current_target(target.entity);
                    }
                    character.set_target_facing(target.position - character.position());
                    if !character.is_auto_attacking() || character.current_attack_slot() != slot {
                        character.play_auto_attack_slot(slot);
                    }
                }
                None => {
                    if character.is_auto_attacking() {
                        character.stop_auto_attack();
                    }
                    character.set_move_target(Some(&target));
                }
            }
        }
    }
}
