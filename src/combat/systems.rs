//! Combat systems
//!
//! ECS systems that drive arena characters each frame. They run chained in
//! this order:
//!
//! 1. `advance_match_clock`
//! 2. `run_ai_decisions` - AI reads a snapshot and issues commands
//! 3. `update_status_timers` - conditions, stun and action locks
//! 4. `move_characters` - locomotion and arrival detection
//! 5. `tick_characters` - facing and auto-attack cadence
//! 6. `resolve_attacks` - range check, damage roll, on-hit effects
//! 7. `apply_damage` - health and stats
//! 8. `handle_deaths` - gate the dead, clear stale targeting

use bevy::prelude::*;
use std::collections::HashMap;

use super::ai::{self, CombatantInfo};
use super::components::{ArenaBounds, Combatant, GameRng};
use super::events::{CombatantDeathEvent, DamageEvent};
use super::log::{CombatLog, CombatLogEventType};
use crate::character::constants::MOVE_SPEED_COEFFICIENT;
use crate::character::{AttackOrder, CadenceStep, OnHitEffect};
use crate::status::Condition;

/// Chance for an attack to crit
pub const CRIT_CHANCE: f32 = 0.1;

/// Damage multiplier on a critical hit
pub const CRIT_DAMAGE_MULTIPLIER: f32 = 1.5;

/// Damage roll spread around an attack's power (±10%)
pub const DAMAGE_VARIANCE: f32 = 0.1;

fn snapshot(combatants: &Query<(Entity, &mut Combatant)>) -> Vec<CombatantInfo> {
    combatants
        .iter()
        .map(|(entity, combatant)| CombatantInfo {
            entity,
            team: combatant.team,
            position: combatant.position,
            size: combatant.character.size(),
            is_alive: combatant.is_alive(),
        })
        .collect()
}

pub fn advance_match_clock(time: Res<Time>, mut combat_log: ResMut<CombatLog>) {
    combat_log.match_time += time.delta_secs();
}

pub fn run_ai_decisions(time: Res<Time>, mut combatants: Query<(Entity, &mut Combatant)>) {
    let dt = time.delta_secs();
    let world = snapshot(&combatants);

    for (_, mut combatant) in combatants.iter_mut() {
        let team = combatant.team;
        ai::decide(&mut combatant.character, team, &world, dt);
    }
}

/// Count down conditions, stuns and action locks and mirror them into the
/// character's gate flags.
pub fn update_status_timers(
    time: Res<Time>,
    mut combat_log: ResMut<CombatLog>,
    mut combatants: Query<(Entity, &mut Combatant)>,
) {
    let dt = time.delta_secs();

    for (_, mut combatant) in combatants.iter_mut() {
        if !combatant.is_alive() {
            continue;
        }

        let expired = combatant.character.status_mut().tick(dt);
        for condition in expired {
            let message = format!(
                "{}'s {} ({}) fades",
                combatant.id,
                condition.kind.name(),
                condition.source
            );
            combat_log.log(CombatLogEventType::ConditionExpired, message);
        }

        combatant.special_damage_remaining = (combatant.special_damage_remaining - dt).max(0.0);
        combatant.restrict_remaining = (combatant.restrict_remaining - dt).max(0.0);
        let stunned = combatant.special_damage_remaining > 0.0;
        let restricted = combatant.restrict_remaining > 0.0;
        combatant.character.set_special_damage(stunned);
        combatant.character.set_restrict_action(restricted);
    }
}

/// Walk auto-moving characters toward their move point and stop them once
/// inside the stop distance.
///
/// Movement follows the current facing, so a character turns before it
/// gets going. The step never carries a body past its stop distance.
pub fn move_characters(
    time: Res<Time>,
    bounds: Res<ArenaBounds>,
    mut combat_log: ResMut<CombatLog>,
    mut combatants: Query<(Entity, &mut Combatant)>,
) {
    let dt = time.delta_secs();

    for (_, mut combatant) in combatants.iter_mut() {
        let combatant = &mut *combatant;
        let character = &mut combatant.character;
        if !character.is_auto_moving() || character.is_movement_gated() {
            continue;
        }

        let to_point = character.move_point() - combatant.position;
        let distance = to_point.length();
        if distance <= character.stop_distance() {
            character.stop_moving();
            combat_log.log(
                CombatLogEventType::MoveEnd,
                format!("{} stops moving", combatant.id),
            );
            continue;
        }

        character.set_target_facing(to_point);

        let speed = character.current_speed() * MOVE_SPEED_COEFFICIENT;
        if speed <= 0.0 {
            continue;
        }
        let step = (speed * dt).min(distance - character.stop_distance());
        let heading = character.current_facing().normalize_or_zero();

        combatant.position = bounds.clamp(combatant.position + heading * step);
        character.sync_position(combatant.position);
    }
}

pub fn tick_characters(
    time: Res<Time>,
    mut combat_log: ResMut<CombatLog>,
    mut combatants: Query<(Entity, &mut Combatant)>,
) {
    let dt = time.delta_secs();

    for (_, mut combatant) in combatants.iter_mut() {
        match combatant.character.tick(dt) {
            CadenceStep::Fired(slot) => {
                combatant.attacks_fired += 1;
                let attack = combatant
                    .character
                    .attack_orders()
                    .get(slot)
                    .map(|order| order.name.clone())
                    .unwrap_or_default();
                let message = format!("{} fires {}", combatant.id, attack);
                combat_log.log(CombatLogEventType::AttackFired, message);
            }
            CadenceStep::TargetLost => {
                debug!("{} lost its target", combatant.id);
            }
            _ => {}
        }
    }
}

struct PendingHit {
    attacker: Entity,
    attacker_id: String,
    target: Entity,
    order: AttackOrder,
}

/// Turn queued attack requests into damage events and on-hit effects.
pub fn resolve_attacks(
    mut combat_log: ResMut<CombatLog>,
    mut game_rng: ResMut<GameRng>,
    mut combatants: Query<(Entity, &mut Combatant)>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let world: HashMap<Entity, CombatantInfo> = snapshot(&combatants)
        .into_iter()
        .map(|info| (info.entity, info))
        .collect();
    let names: HashMap<Entity, String> = combatants
        .iter()
        .map(|(entity, combatant)| (entity, combatant.id.clone()))
        .collect();

    let mut hits = Vec::new();

    for (attacker, mut combatant) in combatants.iter_mut() {
        let requests = combatant.character.executor_mut().drain();

        for request in requests {
            let Some(order) = combatant.character.attack_orders().get(request.slot_index).cloned()
            else {
                continue;
            };

            if order.action_lock > 0.0 {
                combatant.restrict_remaining = combatant.restrict_remaining.max(order.action_lock);
                combatant.character.set_restrict_action(true);
            }

            let Some(target) = world.get(&request.target).filter(|t| t.is_alive) else {
                continue;
            };

            let gap = combatant.edge_distance_to(target);
            if !order.reaches(gap) {
                let target_name = names.get(&request.target).cloned().unwrap_or_default();
                combat_log.log(
                    CombatLogEventType::Miss,
                    format!(
                        "{}'s {} misses {} (out of range, {:.1} > {:.1})",
                        combatant.id, order.name, target_name, gap, order.range
                    ),
                );
                continue;
            }

            hits.push(PendingHit {
                attacker,
                attacker_id: combatant.id.clone(),
                target: request.target,
                order,
            });
        }
    }

    for hit in hits {
        let roll = game_rng.random_range(1.0 - DAMAGE_VARIANCE, 1.0 + DAMAGE_VARIANCE);
        let is_critical = game_rng.random_f32() < CRIT_CHANCE;
        let multiplier = if is_critical { CRIT_DAMAGE_MULTIPLIER } else { 1.0 };
        let amount = (hit.order.power * roll * multiplier).max(0.0);

        damage_events.send(DamageEvent {
            source: hit.attacker,
            target: hit.target,
            amount,
            attack_name: hit.order.name.clone(),
            is_critical,
        });

        let Some(effect) = hit.order.on_hit else {
            continue;
        };
        let Ok((_, mut target)) = combatants.get_mut(hit.target) else {
            continue;
        };

        match effect {
            OnHitEffect::Condition {
                kind,
                magnitude,
                duration,
            } => {
                target.character.status_mut().apply(Condition::timed(
                    kind,
                    magnitude,
                    duration,
                    hit.order.name.clone(),
                ));
                let message = format!(
                    "{} is afflicted by {}'s {} ({}, {:.1}s)",
                    target.id,
                    hit.attacker_id,
                    hit.order.name,
                    kind.name(),
                    duration
                );
                combat_log.log_condition(
                    target.id.clone(),
                    hit.order.name.clone(),
                    kind.name().to_string(),
                    duration,
                    message,
                );
            }
            OnHitEffect::Stun { duration } => {
                target.special_damage_remaining = target.special_damage_remaining.max(duration);
                target.character.set_special_damage(true);
                let message = format!(
                    "{} is stunned by {}'s {} ({:.1}s)",
                    target.id, hit.attacker_id, hit.order.name, duration
                );
                combat_log.log_condition(
                    target.id.clone(),
                    hit.order.name.clone(),
                    "Stun".to_string(),
                    duration,
                    message,
                );
            }
        }
    }
}

/// Process damage events and apply damage to targets
pub fn apply_damage(
    mut damage_events: EventReader<DamageEvent>,
    mut combat_log: ResMut<CombatLog>,
    mut combatants: Query<(Entity, &mut Combatant)>,
    mut death_events: EventWriter<CombatantDeathEvent>,
) {
    for event in damage_events.read() {
        let Ok((_, mut target)) = combatants.get_mut(event.target) else {
            continue;
        };
        if !target.is_alive() {
            continue;
        }

        let dealt = event.amount.min(target.current_health);
        target.current_health -= dealt;
        target.damage_taken += dealt;
        let target_id = target.id.clone();
        let killed = !target.is_alive();

        let source_id = match combatants.get_mut(event.source) {
            Ok((_, mut source)) => {
                source.damage_dealt += dealt;
                source.id.clone()
            }
            Err(_) => "Unknown".to_string(),
        };

        let crit = if event.is_critical { " (Critical)" } else { "" };
        let message = format!(
            "{}'s {} hits {} for {:.0} damage{}",
            source_id, event.attack_name, target_id, dealt, crit
        );
        combat_log.log_damage(
            source_id,
            target_id,
            event.attack_name.clone(),
            dealt,
            killed,
            message,
        );

        if killed {
            death_events.send(CombatantDeathEvent {
                victim: event.target,
                killer: Some(event.source),
            });
        }
    }
}

/// Gate dead characters and clear every targeting state that still points
/// at them, so attackers notice the loss on their next tick.
pub fn handle_deaths(
    mut death_events: EventReader<CombatantDeathEvent>,
    mut combat_log: ResMut<CombatLog>,
    mut combatants: Query<(Entity, &mut Combatant)>,
) {
    for event in death_events.read() {
        let killer_id = event
            .killer
            .and_then(|killer| combatants.get(killer).ok())
            .map(|(_, killer)| killer.id.clone());

        let Ok((_, mut victim)) = combatants.get_mut(event.victim) else {
            continue;
        };
        victim.character.set_alive(false);
        let victim_id = victim.id.clone();

        let message = match &killer_id {
            Some(killer) => format!("{} has been slain by {}", victim_id, killer),
            None => format!("{} has died", victim_id),
        };
        info!("{}", message);
        combat_log.log_death(victim_id, killer_id, message);

        for (_, mut combatant) in combatants.iter_mut() {
            if let Some(targeting) = combatant.character.targeting_mut() {
                if targeting.is_targeting(event.victim) {
                    targeting.clear();
                }
            }
        }
    }
}
