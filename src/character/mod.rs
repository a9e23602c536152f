//! Character Control Core
//!
//! [`Character`] is the per-combatant composition root. It owns a
//! [`MovementController`] and an [`AttackCadenceController`], holds the
//! injected collaborators, and applies the gating rules that suspend both:
//!
//! - dead, special damage (stun) or an immobilizing condition suspend facing
//!   and attack advancement
//! - action restriction (e.g. a skill-cast lock) additionally suspends attacks
//!
//! Gating never clears intent. Once the condition lifts, the held movement
//! and attack state resume on the next tick.
//!
//! ## Tick order
//! [`Character::tick`] advances facing first, then the attack cadence.

pub mod attack_order;
pub mod cadence;
pub mod collaborators;
pub mod constants;
pub mod movement;

use bevy::log::debug;
use bevy::math::Vec2;
use bevy::prelude::Entity;
use smallvec::SmallVec;

pub use attack_order::{AttackOrder, AttackStyle, OnHitEffect};
pub use cadence::{AttackCadenceController, CadenceStep};
pub use collaborators::{
    AttackExecutor, AttackRequest, BattleObject, CharacterAi, MoveDestination, NoAi,
    ObjectSnapshot, OwnerProfile, StatusProvider, TargetingState,
};
pub use movement::{move_towards, MoveEndCallback, MovementController, MoveStyle};

/// Inline capacity for attack slots; archetypes rarely carry more than four.
pub type AttackOrders = SmallVec<[AttackOrder; 4]>;

/// Movement and auto-attack control for one combatant.
pub struct Character<S, X, A = NoAi> {
    position: Vec2,
    size: f32,
    alive: bool,
    special_damage: bool,
    restrict_action: bool,
    attack_style: AttackStyle,
    friend_target: Option<Entity>,
    target_position: Option<Vec2>,
    attack_orders: AttackOrders,
    movement: MovementController,
    cadence: AttackCadenceController,
    status: S,
    executor: X,
    targeting: Option<TargetingState>,
    ai: Option<A>,
}

impl<S, X, A> Character<S, X, A>
where
    S: StatusProvider,
    X: AttackExecutor,
    A: CharacterAi,
{
    /// Build a living character at the origin with no targeting, no AI and
    /// no attack slots.
    pub fn new(status: S, executor: X) -> Self {
        Self {
            position: Vec2::ZERO,
            size: 0.0,
            alive: true,
            special_damage: false,
            restrict_action: false,
            attack_style: AttackStyle::default(),
            friend_target: None,
            target_position: None,
            attack_orders: AttackOrders::new(),
            movement: MovementController::new(),
            cadence: AttackCadenceController::new(),
            status,
            executor,
            targeting: None,
            ai: None,
        }
    }

    /// Attach the targeting state; without it move-to-target is a no-op.
    pub fn with_targeting(mut self, targeting: TargetingState) -> Self {
        self.targeting = Some(targeting);
        self
    }

    /// Attach an AI that receives mode changes and the owner profile.
    pub fn with_ai(mut self, ai: A) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Replace the attack slots.
    pub fn with_attack_orders(mut self, orders: impl IntoIterator<Item = AttackOrder>) -> Self {
        self.attack_orders = orders.into_iter().collect();
        self
    }

    /// Footprint radius, clamped to non-negative.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size.max(0.0);
        self
    }

    pub fn at_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Reset transient state for a fresh spawn and hand the owner profile
    /// to the AI, if one is attached.
    pub fn setup(&mut self) {
        self.status.set_conditions_enabled(true);
        self.movement.reset_facing();
        self.attack_style = AttackStyle::Gunner;

        let profile = self.profile();
        if let Some(ai) = self.ai.as_mut() {
            ai.setup(&profile);
        }
    }

    /// Advance one simulation step of `dt` seconds: facing, then attacks.
    pub fn tick(&mut self, dt: f32) -> CadenceStep {
        self.advance_facing(dt);
        self.advance_auto_attack(dt)
    }

    // ------------------------------------------------------------------
    // Gating
    // ------------------------------------------------------------------

    /// Dead, stunned or immobilized: nothing advances.
    pub fn is_movement_gated(&self) -> bool {
        !self.alive || self.special_damage || self.status.is_immobile()
    }

    /// Movement gating plus action restriction.
    pub fn is_attack_gated(&self) -> bool {
        self.restrict_action || self.is_movement_gated()
    }

    // ------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------

    /// Turn toward the target facing unless settled or gated.
    pub fn advance_facing(&mut self, dt: f32) {
        if self.movement.is_facing_settled() || self.is_movement_gated() {
            return;
        }
        self.movement.advance_facing(dt);
    }

    /// Auto-move to a fixed world point.
    pub fn set_move_point(&mut self, point: Vec2) {
        self.movement.set_move_point(self.position, point);
    }

    /// Auto-move toward another participant and make it the tracked target.
    ///
    /// Silently ignored when `target` is `None` or no targeting state is
    /// attached. The destination is the target's position right now.
    pub fn set_move_target(&mut self, target: Option<&dyn BattleObject>) {
        let (Some(target), Some(targeting)) = (target, self.targeting.as_mut()) else {
            return;
        };

        targeting.set_current_target(target.entity());
        self.movement
            .set_move_target(target.position(), target.object_size() + self.size);
    }

    /// Stop auto-moving. Fires the move-end notification on every call.
    pub fn stop_moving(&mut self) {
        self.movement.stop();
    }

    /// Register a listener for move-end notifications.
    pub fn on_move_end(&mut self, callback: impl FnMut() + Send + Sync + 'static) {
        self.movement.on_move_end(Box::new(callback));
    }

    /// Start turning toward `direction`. Zero vectors are ignored.
    pub fn set_target_facing(&mut self, direction: Vec2) {
        self.movement.set_target_facing(direction);
    }

    /// Base move speed plus status fluctuation. Not clamped: heavy slows can
    /// make it negative.
    pub fn current_speed(&self) -> f32 {
        self.status.base_move_speed() + self.status.move_speed_fluctuation()
    }

    // ------------------------------------------------------------------
    // Auto-attack
    // ------------------------------------------------------------------

    /// Run the attack cadence for one step. Logs when the target is lost.
    pub fn advance_auto_attack(&mut self, dt: f32) -> CadenceStep {
        let gated = self.is_attack_gated();
        let target = self.targeting.as_ref().and_then(|t| t.current_target());
        let step = self
            .cadence
            .advance(dt, gated, target, &self.status, &mut self.executor);

        if step == CadenceStep::TargetLost {
            debug!("auto-attack stopped: target lost");
        }
        step
    }

    /// Resume auto-attacking on the last used slot.
    pub fn play_auto_attack(&mut self) {
        self.play_auto_attack_slot(self.cadence.slot_index());
    }

    /// Start auto-attacking with `slot_index`. Out-of-range indices are
    /// ignored and leave every cadence field untouched.
    pub fn play_auto_attack_slot(&mut self, slot_index: usize) {
        if !self.cadence.play(slot_index, self.attack_orders.len()) {
            debug!(
                "ignored auto-attack slot {} ({} configured)",
                slot_index,
                self.attack_orders.len()
            );
        }
    }

    /// Disarm auto-attack and clear the countdown.
    pub fn stop_auto_attack(&mut self) {
        self.cadence.stop();
    }

    // ------------------------------------------------------------------
    // AI mode delegation
    // ------------------------------------------------------------------

    pub fn set_stay_mode(&mut self) {
        if let Some(ai) = self.ai.as_mut() {
            ai.set_stay_mode();
        }
    }

    pub fn set_move_mode(&mut self, destination: MoveDestination) {
        if let Some(ai) = self.ai.as_mut() {
            ai.set_move_mode(destination);
        }
    }

    /// Let the AI search for enemies for `search_time` seconds.
    pub fn set_beware_mode(&mut self, search_time: f32) {
        if let Some(ai) = self.ai.as_mut() {
            ai.set_beware_mode(search_time);
        }
    }

    /// Switch the AI to aiming at `target`. Auto-attack is stopped first,
    /// even when no AI is attached.
    pub fn set_aiming_mode(&mut self, target: Entity) {
        self.stop_auto_attack();
        if let Some(ai) = self.ai.as_mut() {
            ai.set_aiming_mode(target);
        }
    }

    // ------------------------------------------------------------------
    // State owned elsewhere
    // ------------------------------------------------------------------

    /// Mirror the position owned by the transform/locomotion layer.
    pub fn sync_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    /// Stun flag; suspends facing and attacks while set.
    pub fn set_special_damage(&mut self, special_damage: bool) {
        self.special_damage = special_damage;
    }

    /// Action lock; suspends attacks but not facing.
    pub fn set_restrict_action(&mut self, restrict_action: bool) {
        self.restrict_action = restrict_action;
    }

    pub fn set_attack_style(&mut self, style: AttackStyle) {
        self.attack_style = style;
    }

    pub fn set_friend_target(&mut self, friend: Option<Entity>) {
        self.friend_target = friend;
    }

    pub fn set_target_position(&mut self, position: Option<Vec2>) {
        self.target_position = position;
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Snapshot handed to the AI on setup.
    pub fn profile(&self) -> OwnerProfile {
        OwnerProfile {
            position: self.position,
            size: self.size,
            attack_style: self.attack_style,
            attack_slot_count: self.attack_orders.len(),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_special_damage(&self) -> bool {
        self.special_damage
    }

    pub fn is_restrict_action(&self) -> bool {
        self.restrict_action
    }

    pub fn attack_style(&self) -> AttackStyle {
        self.attack_style
    }

    pub fn friend_target(&self) -> Option<Entity> {
        self.friend_target
    }

    pub fn target_position(&self) -> Option<Vec2> {
        self.target_position
    }

    pub fn is_auto_moving(&self) -> bool {
        self.movement.is_auto_moving()
    }

    pub fn is_auto_attacking(&self) -> bool {
        self.cadence.is_auto_attacking()
    }

    pub fn current_move_style(&self) -> MoveStyle {
        self.movement.move_style()
    }

    pub fn current_facing(&self) -> Vec2 {
        self.movement.current_facing()
    }

    pub fn target_facing(&self) -> Vec2 {
        self.movement.target_facing()
    }

    pub fn is_facing_settled(&self) -> bool {
        self.movement.is_facing_settled()
    }

    /// True while the facing is still turning.
    pub fn is_updating_facing(&self) -> bool {
        !self.is_facing_settled()
    }

    pub fn move_point(&self) -> Vec2 {
        self.movement.move_point()
    }

    /// Distance from the destination at which auto-movement ends.
    pub fn stop_distance(&self) -> f32 {
        self.movement.stop_distance()
    }

    pub fn current_attack_slot(&self) -> usize {
        self.cadence.slot_index()
    }

    /// The attack at the current slot, or `None` when no slots are configured.
    pub fn current_attack_order(&self) -> Option<&AttackOrder> {
        self.attack_orders.get(self.cadence.slot_index())
    }

    pub fn attack_orders(&self) -> &[AttackOrder] {
        &self.attack_orders
    }

    /// Seconds left before the next attack; zero or less fires on the next step.
    pub fn attack_interval_remaining(&self) -> f32 {
        self.cadence.interval_remaining()
    }

    /// The tracked enemy, if targeting is attached and one is set.
    pub fn current_target(&self) -> Option<Entity> {
        self.targeting.as_ref().and_then(|t| t.current_target())
    }

    // ------------------------------------------------------------------
    // Collaborator access
    // ------------------------------------------------------------------

    pub fn status(&self) -> &S {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut S {
        &mut self.status
    }

    pub fn executor(&self) -> &X {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut X {
        &mut self.executor
    }

    pub fn targeting(&self) -> Option<&TargetingState> {
        self.targeting.as_ref()
    }

    pub fn targeting_mut(&mut self) -> Option<&mut TargetingState> {
        self.targeting.as_mut()
    }

    pub fn ai(&self) -> Option<&A> {
        self.ai.as_ref()
    }

    pub fn ai_mut(&mut self) -> Option<&mut A> {
        self.ai.as_mut()
    }
}
