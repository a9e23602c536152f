//! Character Status and Conditions
//!
//! [`CharacterStatus`] is the stat provider the arena hands to each
//! character. It combines base stats with timed conditions (buffs and
//! debuffs) that add a signed fluctuation to move speed or attack delay, or
//! pin the character in place.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::character::StatusProvider;

/// What a condition modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    /// Adds magnitude to move speed (negative = slow)
    MoveSpeed,
    /// Subtracts magnitude from the auto-attack delay (positive = faster attacks)
    AttackDelay,
    /// Cannot move, turn or attack - magnitude unused
    Immobilize,
}

impl ConditionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConditionKind::MoveSpeed => "Move Speed",
            ConditionKind::AttackDelay => "Attack Delay",
            ConditionKind::Immobilize => "Immobilize",
        }
    }
}

/// A single active condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub kind: ConditionKind,
    pub magnitude: f32,
    /// Seconds left; `None` lasts until removed
    pub remaining: Option<f32>,
    /// Name of whatever applied it (attack name, "Battle Cry", ...)
    pub source: String,
}

impl Condition {
    pub fn timed(kind: ConditionKind, magnitude: f32, duration: f32, source: impl Into<String>) -> Self {
        Self {
            kind,
            magnitude,
            remaining: Some(duration),
            source: source.into(),
        }
    }

    pub fn permanent(kind: ConditionKind, magnitude: f32, source: impl Into<String>) -> Self {
        Self {
            kind,
            magnitude,
            remaining: None,
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterStatus {
    pub move_speed: f32,
    pub auto_attack_delay: f32,
    conditions: SmallVec<[Condition; 4]>,
    conditions_enabled: bool,
}

impl CharacterStatus {
    /// Conditions start disabled; `Character::setup` switches them on.
    pub fn new(move_speed: f32, auto_attack_delay: f32) -> Self {
        Self {
            move_speed,
            auto_attack_delay,
            conditions: SmallVec::new(),
            conditions_enabled: false,
        }
    }

    /// Apply a condition. One with the same kind and source is refreshed in
    /// place instead of stacking.
    pub fn apply(&mut self, condition: Condition) {
        match self
            .conditions
            .iter_mut()
            .find(|c| c.kind == condition.kind && c.source == condition.source)
        {
            Some(existing) => *existing = condition,
            None => self.conditions.push(condition),
        }
    }

    pub fn remove_kind(&mut self, kind: ConditionKind) {
        self.conditions.retain(|c| c.kind != kind);
    }

    /// Count down timed conditions and return the ones that ran out.
    pub fn tick(&mut self, dt: f32) -> Vec<Condition> {
        let mut expired = Vec::new();

        for condition in self.conditions.iter_mut() {
            if let Some(remaining) = condition.remaining.as_mut() {
                *remaining -= dt;
            }
        }

        self.conditions.retain(|c| {
            let done = matches!(c.remaining, Some(remaining) if remaining <= 0.0);
            if done {
                expired.push(c.clone());
            }
            !done
        });

        expired
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn conditions_enabled(&self) -> bool {
        self.conditions_enabled
    }

    fn fluctuation(&self, kind: ConditionKind) -> f32 {
        if !self.conditions_enabled {
            return 0.0;
        }
        self.conditions
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.magnitude)
            .sum()
    }
}

impl StatusProvider for CharacterStatus {
    fn base_move_speed(&self) -> f32 {
        self.move_speed
    }

    fn move_speed_fluctuation(&self) -> f32 {
        self.fluctuation(ConditionKind::MoveSpeed)
    }

    fn base_auto_attack_delay(&self) -> f32 {
        self.auto_attack_delay
    }

    fn auto_attack_delay_fluctuation(&self) -> f32 {
        self.fluctuation(ConditionKind::AttackDelay)
    }

    fn is_immobile(&self) -> bool {
        self.conditions_enabled
            && self
                .conditions
                .iter()
                .any(|c| c.kind == ConditionKind::Immobilize)
    }

    fn set_conditions_enabled(&mut self, enabled: bool) {
        self.conditions_enabled = enabled;
    }
}
