//! Movement Controller
//!
//! Owns a character's facing, move destination and stop distance.
//!
//! The controller only records movement intent and turns the facing each
//! step. Moving the body and noticing arrival belong to whoever owns the
//! position (the arena's locomotion step), which calls [`MovementController::stop`]
//! when the stop distance is reached.

use bevy::math::Vec2;
use std::fmt;

use super::constants::{DEFAULT_AUTO_MOVE_STOP_DISTANCE, DEFAULT_FACING, UPDATE_ANGLE_SPEED};

/// Notification fired synchronously every time movement is stopped.
pub type MoveEndCallback = Box<dyn FnMut() + Send + Sync>;

/// How the current auto-move destination was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveStyle {
    /// Walk to a fixed world point.
    #[default]
    ToPoint,
    /// Walk toward another character until touching its edge.
    ToTargetEntity,
}

/// Move `current` toward `target` by at most `max_delta`, landing exactly on
/// `target` once it is within reach.
///
/// A negative `max_delta` is treated as zero.
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let max_delta = max_delta.max(0.0);
    let delta = target - current;
    let distance = delta.length();

    if distance <= max_delta || distance == 0.0 {
        return target;
    }

    current + delta / distance * max_delta
}

pub struct MovementController {
    current_facing: Vec2,
    target_facing: Vec2,
    move_point: Vec2,
    move_style: MoveStyle,
    auto_move: bool,
    stop_distance: f32,
    on_move_end: Option<MoveEndCallback>,
}

impl Default for MovementController {
    fn default() -> Self {
        Self {
            current_facing: DEFAULT_FACING,
            target_facing: DEFAULT_FACING,
            move_point: Vec2::ZERO,
            move_style: MoveStyle::ToPoint,
            auto_move: false,
            stop_distance: DEFAULT_AUTO_MOVE_STOP_DISTANCE,
            on_move_end: None,
        }
    }
}

impl fmt::Debug for MovementController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovementController")
            .field("current_facing", &self.current_facing)
            .field("target_facing", &self.target_facing)
            .field("move_point", &self.move_point)
            .field("move_style", &self.move_style)
            .field("auto_move", &self.auto_move)
            .field("stop_distance", &self.stop_distance)
            .field("has_move_end_callback", &self.on_move_end.is_some())
            .finish()
    }
}

impl MovementController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snap both facings back to the canonical direction.
    pub fn reset_facing(&mut self) {
        self.current_facing = DEFAULT_FACING;
        self.target_facing = DEFAULT_FACING;
    }

    /// Start moving toward a fixed point.
    ///
    /// The target facing is aimed from `origin` at `point`; when the two
    /// coincide the previous facing is kept.
    pub fn set_move_point(&mut self, origin: Vec2, point: Vec2) {
        self.move_point = point;
        self.set_target_facing(point - origin);
        self.stop_distance = DEFAULT_AUTO_MOVE_STOP_DISTANCE;
        self.move_style = MoveStyle::ToPoint;
        self.auto_move = true;
    }

    /// Start moving toward another character's position as sampled now.
    ///
    /// Arrival is reached when the gap closes to the sum of both sizes. The
    /// destination is not re-sampled; callers that want homing re-issue this.
    pub fn set_move_target(&mut self, target_position: Vec2, stop_distance: f32) {
        self.move_point = target_position;
        self.stop_distance = stop_distance.max(0.0);
        self.move_style = MoveStyle::ToTargetEntity;
        self.auto_move = true;
    }

    /// Aim the target facing along `direction`. Zero or non-finite directions
    /// are ignored.
    pub fn set_target_facing(&mut self, direction: Vec2) {
        if let Some(facing) = direction.try_normalize() {
            self.target_facing = facing;
        }
    }

    /// Turn the current facing toward the target facing for `dt` seconds.
    pub fn advance_facing(&mut self, dt: f32) {
        if self.is_facing_settled() {
            return;
        }

        self.current_facing = move_towards(
            self.current_facing,
            self.target_facing,
            UPDATE_ANGLE_SPEED * dt,
        );
    }

    /// Stop auto-moving and fire the move-end notification.
    ///
    /// The notification fires on every call, including when already stopped.
    pub fn stop(&mut self) {
        self.auto_move = false;

        if let Some(callback) = self.on_move_end.as_mut() {
            callback();
        }
    }

    /// Register the move-end notification, replacing any previous one.
    pub fn on_move_end(&mut self, callback: MoveEndCallback) {
        self.on_move_end = Some(callback);
    }

    pub fn clear_move_end(&mut self) {
        self.on_move_end = None;
    }

    pub fn current_facing(&self) -> Vec2 {
        self.current_facing
    }

    pub fn target_facing(&self) -> Vec2 {
        self.target_facing
    }

    pub fn is_facing_settled(&self) -> bool {
        self.current_facing == self.target_facing
    }

    pub fn move_point(&self) -> Vec2 {
        self.move_point
    }

    pub fn move_style(&self) -> MoveStyle {
        self.move_style
    }

    pub fn is_auto_moving(&self) -> bool {
        self.auto_move
    }

    pub fn stop_distance(&self) -> f32 {
        self.stop_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_move_towards_snaps_when_within_reach() {
        let result = move_towards(Vec2::new(0.0, 0.9), Vec2::Y, 0.5);
        assert_eq!(result, Vec2::Y);
    }

    #[test]
    fn test_move_towards_moves_by_max_delta() {
        let result = move_towards(Vec2::ZERO, Vec2::new(2.0, 0.0), 0.5);
        assert!((result - Vec2::new(0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_move_towards_negative_delta_stays_put() {
        let start = Vec2::new(1.0, 0.0);
        assert_eq!(move_towards(start, Vec2::Y, -1.0), start);
    }

    #[test]
    fn test_facing_never_overshoots() {
        let mut movement = MovementController::new();
        movement.set_move_point(Vec2::ZERO, Vec2::new(-3.0, 0.0));
        let target = movement.target_facing();
        assert_eq!(target, Vec2::NEG_X);

        let mut previous_gap = (movement.current_facing() - target).length();
        for _ in 0..200 {
            movement.advance_facing(0.013);
            let gap = (movement.current_facing() - target).length();
            assert!(gap <= previous_gap, "facing moved away from target");
            previous_gap = gap;
        }

        assert!(movement.is_facing_settled());
        assert_eq!(movement.current_facing(), target);
    }

    #[test]
    fn test_facing_settles_in_one_large_step() {
        let mut movement = MovementController::new();
        movement.set_target_facing(Vec2::new(0.0, -4.0));
        movement.advance_facing(10.0);
        assert_eq!(movement.current_facing(), Vec2::NEG_Y);
    }

    #[test]
    fn test_zero_direction_keeps_facing() {
        let mut movement = MovementController::new();
        movement.set_target_facing(Vec2::X);
        movement.set_move_point(Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0));

        assert_eq!(movement.target_facing(), Vec2::X);
        assert!(movement.is_auto_moving());
        assert_eq!(movement.move_style(), MoveStyle::ToPoint);
        assert_eq!(movement.stop_distance(), DEFAULT_AUTO_MOVE_STOP_DISTANCE);
    }

    #[test]
    fn test_non_finite_direction_keeps_facing() {
        let mut movement = MovementController::new();
        movement.set_target_facing(Vec2::new(f32::NAN, 1.0));
        assert_eq!(movement.target_facing(), DEFAULT_FACING);
    }

    #[test]
    fn test_move_target_sets_style_and_distance() {
        let mut movement = MovementController::new();
        movement.set_move_target(Vec2::new(5.0, 1.0), 1.5);

        assert_eq!(movement.move_style(), MoveStyle::ToTargetEntity);
        assert_eq!(movement.stop_distance(), 1.5);
        assert_eq!(movement.move_point(), Vec2::new(5.0, 1.0));
        assert!(movement.is_auto_moving());
        // Facing is left for the locomotion step to steer
        assert_eq!(movement.target_facing(), DEFAULT_FACING);
    }

    #[test]
    fn test_move_point_resets_stop_distance() {
        let mut movement = MovementController::new();
        movement.set_move_target(Vec2::new(5.0, 1.0), 2.0);
        movement.set_move_point(Vec2::ZERO, Vec2::new(1.0, 0.0));
        assert_eq!(movement.stop_distance(), DEFAULT_AUTO_MOVE_STOP_DISTANCE);
        assert_eq!(movement.move_style(), MoveStyle::ToPoint);
    }

    #[test]
    fn test_stop_fires_notification_every_call() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let mut movement = MovementController::new();
        movement.on_move_end(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        movement.set_move_point(Vec2::ZERO, Vec2::X);
        movement.stop();
        movement.stop();

        assert!(!movement.is_auto_moving());
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_reset_facing() {
        let mut movement = MovementController::new();
        movement.set_target_facing(Vec2::X);
        movement.advance_facing(1.0);
        movement.reset_facing();
        assert_eq!(movement.current_facing(), DEFAULT_FACING);
        assert!(movement.is_facing_settled());
    }
}
