//! Auto-Attack Cadence
//!
//! Countdown state machine behind sustained auto-attacking.
//!
//! While armed, each call to [`AttackCadenceController::advance`] counts a
//! positive interval down by `dt` and fires the current slot as soon as the
//! interval is at or below zero, re-arming it from the status delay. At most
//! one attack fires per call, so a very coarse step can fire less often than
//! `1 / delay` would suggest.

use bevy::prelude::Entity;

use super::collaborators::{AttackExecutor, AttackRequest, StatusProvider};

/// Outcome of a single cadence step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CadenceStep {
    /// Auto-attack is not active
    Idle,
    /// Active, but a gating condition suspended this step
    Gated,
    /// The target disappeared and auto-attack was switched off
    TargetLost,
    /// The interval was counted down
    Counting,
    /// The given slot fired and the interval was re-armed
    Fired(usize),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackCadenceController {
    auto_attack: bool,
    slot_index: usize,
    interval: f32,
}

impl AttackCadenceController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm auto-attack on `slot_index`. Indices outside `slot_count` are
    /// ignored. A running countdown is kept.
    pub fn play(&mut self, slot_index: usize, slot_count: usize) -> bool {
        if slot_index >= slot_count {
            return false;
        }

        self.slot_index = slot_index;
        self.auto_attack = true;
        true
    }

    /// Disarm and clear the countdown so the next start fires right away.
    pub fn stop(&mut self) {
        self.auto_attack = false;
        self.interval = 0.0;
    }

    /// Run one step.
    ///
    /// `gated` suspends the step without touching the countdown. A missing
    /// `target` disarms auto-attack without clearing the countdown.
    /// The countdown is decremented first, so the attack fires in the same
    /// call that depletes it rather than on the call after.
    pub fn advance<S, X>(
        &mut self,
        dt: f32,
        gated: bool,
        target: Option<Entity>,
        status: &S,
        executor: &mut X,
    ) -> CadenceStep
    where
        S: StatusProvider + ?Sized,
        X: AttackExecutor + ?Sized,
    {
        if !self.auto_attack {
            return CadenceStep::Idle;
        }
        if gated {
            return CadenceStep::Gated;
        }

        let Some(target) = target else {
            self.auto_attack = false;
            return CadenceStep::TargetLost;
        };

        if self.interval > 0.0 {
            self.interval -= dt;
        }
        if self.interval > 0.0 {
            return CadenceStep::Counting;
        }

        executor.execute(AttackRequest {
            slot_index: self.slot_index,
            target,
        });

        // Base delay minus status modifier; may come out <= 0
        self.interval = status.base_auto_attack_delay() - status.auto_attack_delay_fluctuation();
        CadenceStep::Fired(self.slot_index)
    }

    pub fn is_auto_attacking(&self) -> bool {
        self.auto_attack
    }

    pub fn slot_index(&self) -> usize {
        self.slot_index
    }

    pub fn interval_remaining(&self) -> f32 {
        self.interval
    }
}
