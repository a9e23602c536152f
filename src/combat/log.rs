//! Combat logging
//!
//! Records every attack, hit, condition change, movement stop and death for
//! post-match analysis. Entries carry a readable message plus structured data
//! so results can be aggregated without parsing text.

use bevy::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Identifier used in the log, e.g. "Team 1 Gunner #1"
pub type CombatantId = String;

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatLogEventType {
    /// An auto-attack fired
    AttackFired,
    /// An attack landed and dealt damage
    Damage,
    /// An attack fired but could not reach its target
    Miss,
    /// A condition was applied
    ConditionApplied,
    /// A condition ran out
    ConditionExpired,
    /// Auto-movement ended
    MoveEnd,
    /// Combatant died
    Death,
    /// Match event (start, end, etc.)
    MatchEvent,
}

/// Machine-readable payload attached to an entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StructuredEventData {
    Damage {
        source: CombatantId,
        target: CombatantId,
        attack: String,
        amount: f32,
        is_killing_blow: bool,
    },
    Condition {
        target: CombatantId,
        source: String,
        kind: String,
        duration: f32,
    },
    Death {
        victim: CombatantId,
        killer: Option<CombatantId>,
    },
}

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize)]
pub struct CombatLogEntry {
    /// Timestamp in match time (seconds since match start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
    /// Structured data, when the event has any
    pub data: Option<StructuredEventData>,
}

/// Per-combatant summary written alongside the log
#[derive(Debug, Clone, Serialize)]
pub struct CombatantMetadata {
    pub id: CombatantId,
    pub archetype: String,
    pub max_health: f32,
    pub final_health: f32,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub attacks_fired: u32,
    pub final_position: (f32, f32),
}

/// Match-level summary written alongside the log
#[derive(Debug, Clone, Serialize)]
pub struct MatchMetadata {
    pub winner: Option<u8>,
    pub match_time: f32,
    pub random_seed: Option<u64>,
    pub team1: Vec<CombatantMetadata>,
    pub team2: Vec<CombatantMetadata>,
}

#[derive(Serialize)]
struct SavedMatch<'a> {
    metadata: &'a MatchMetadata,
    combatants: &'a [CombatantId],
    entries: &'a [CombatLogEntry],
}

/// The combat log resource storing all events
#[derive(Resource, Default, Debug, Clone)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current match time
    pub match_time: f32,
    /// Combatants registered at match start
    pub combatants: Vec<CombatantId>,
}

impl CombatLog {
    /// Clear the log for a new match
    pub fn clear(&mut self) {
        self.entries.clear();
        self.combatants.clear();
        self.match_time = 0.0;
    }

    pub fn register_combatant(&mut self, id: CombatantId) {
        self.combatants.push(id);
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.push(event_type, message, None);
    }

    fn push(&mut self, event_type: CombatLogEventType, message: String, data: Option<StructuredEventData>) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
            data,
        });
    }

    pub fn log_damage(
        &mut self,
        source: CombatantId,
        target: CombatantId,
        attack: String,
        amount: f32,
        is_killing_blow: bool,
        message: String,
    ) {
        self.push(
            CombatLogEventType::Damage,
            message,
            Some(StructuredEventData::Damage {
                source,
                target,
                attack,
                amount,
                is_killing_blow,
            }),
        );
    }

    pub fn log_condition(
        &mut self,
        target: CombatantId,
        source: String,
        kind: String,
        duration: f32,
        message: String,
    ) {
        self.push(
            CombatLogEventType::ConditionApplied,
            message,
            Some(StructuredEventData::Condition {
                target,
                source,
                kind,
                duration,
            }),
        );
    }

    pub fn log_death(&mut self, victim: CombatantId, killer: Option<CombatantId>, message: String) {
        self.push(
            CombatLogEventType::Death,
            message,
            Some(StructuredEventData::Death { victim, killer }),
        );
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    fn damage_events(&self) -> impl Iterator<Item = (&str, &str, &str, f32, bool)> {
        self.entries.iter().filter_map(|e| match &e.data {
            Some(StructuredEventData::Damage {
                source,
                target,
                attack,
                amount,
                is_killing_blow,
            }) => Some((
                source.as_str(),
                target.as_str(),
                attack.as_str(),
                *amount,
                *is_killing_blow,
            )),
            _ => None,
        })
    }

    /// Damage dealt by `source`, keyed by attack name
    pub fn damage_by_attack(&self, source: &str) -> HashMap<String, f32> {
        let mut totals = HashMap::new();
        for (from, _, attack, amount, _) in self.damage_events() {
            if from == source {
                *totals.entry(attack.to_string()).or_insert(0.0) += amount;
            }
        }
        totals
    }

    pub fn total_damage_dealt(&self, source: &str) -> f32 {
        self.damage_events()
            .filter(|(from, ..)| *from == source)
            .map(|(_, _, _, amount, _)| amount)
            .sum()
    }

    pub fn total_damage_taken(&self, target: &str) -> f32 {
        self.damage_events()
            .filter(|(_, to, ..)| *to == target)
            .map(|(_, _, _, amount, _)| amount)
            .sum()
    }

    pub fn killing_blows(&self, source: &str) -> usize {
        self.damage_events()
            .filter(|(from, _, _, _, kill)| *from == source && *kill)
            .count()
    }

    /// Registered combatants with no death entry
    pub fn survivors(&self) -> Vec<&CombatantId> {
        let dead: Vec<&str> = self
            .entries
            .iter()
            .filter_map(|e| match &e.data {
                Some(StructuredEventData::Death { victim, .. }) => Some(victim.as_str()),
                _ => None,
            })
            .collect();

        self.combatants
            .iter()
            .filter(|id| !dead.contains(&id.as_str()))
            .collect()
    }

    /// Write the log and metadata as JSON.
    ///
    /// Without an explicit path the file lands in `match_logs/`, named after
    /// the seed (or the wall clock when unseeded). Returns the written path.
    pub fn save_to_file(&self, metadata: &MatchMetadata, path: Option<&str>) -> Result<String, String> {
        let path: PathBuf = match path {
            Some(path) => PathBuf::from(path),
            None => default_log_path(metadata.random_seed),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }

        let saved = SavedMatch {
            metadata,
            combatants: &self.combatants,
            entries: &self.entries,
        };
        let json = serde_json::to_string_pretty(&saved)
            .map_err(|e| format!("Failed to serialize combat log: {}", e))?;

        std::fs::write(&path, json)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

        Ok(path.display().to_string())
    }
}

fn default_log_path(seed: Option<u64>) -> PathBuf {
    let name = match seed {
        Some(seed) => format!("match_seed_{}.json", seed),
        None => {
            let secs = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            format!("match_{}.json", secs)
        }
    };
    Path::new("match_logs").join(name)
}
