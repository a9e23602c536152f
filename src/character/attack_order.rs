//! Attack Slot Definitions
//!
//! A character carries an ordered list of [`AttackOrder`]s. Auto-attacking
//! selects one of them by index; the executor decides what the slot does.

use serde::{Deserialize, Serialize};

use crate::status::ConditionKind;

/// Broad fighting style tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttackStyle {
    /// Ranged shooter (the default after setup)
    #[default]
    Gunner,
    /// Close-range melee
    Brawler,
    /// Utility attacks that debuff rather than kill
    Support,
}

impl AttackStyle {
    pub fn name(&self) -> &'static str {
        match self {
            AttackStyle::Gunner => "Gunner",
            AttackStyle::Brawler => "Brawler",
            AttackStyle::Support => "Support",
        }
    }
}

/// Extra effect applied to the target when an attack lands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OnHitEffect {
    /// Apply a timed status condition
    Condition {
        kind: ConditionKind,
        magnitude: f32,
        duration: f32,
    },
    /// Knock the target into special damage (stun) for `duration` seconds
    Stun { duration: f32 },
}

/// One configured attack slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackOrder {
    /// Display name used in the combat log
    pub name: String,
    /// Base damage per hit
    pub power: f32,
    /// Reach measured between body edges
    pub range: f32,
    /// Effect applied on hit
    #[serde(default)]
    pub on_hit: Option<OnHitEffect>,
    /// Seconds the attacker stays action-restricted after firing (0 = none)
    #[serde(default)]
    pub action_lock: f32,
}

impl AttackOrder {
    pub fn new(name: impl Into<String>, power: f32, range: f32) -> Self {
        Self {
            name: name.into(),
            power,
            range,
            on_hit: None,
            action_lock: 0.0,
        }
    }

    /// Whether a target whose edge is `gap` units away can be hit.
    pub fn reaches(&self, gap: f32) -> bool {
        gap <= self.range
    }
}
