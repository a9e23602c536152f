//! Character Control Constants
//!
//! Tuning values shared by the movement and attack controllers.

use bevy::math::Vec2;

// ============================================================================
// Facing
// ============================================================================

/// Rate at which the current facing moves toward the target facing, in
/// vector-length units per second.
///
/// Facing vectors are unit length, so a full reversal (distance 2.0) settles
/// in 0.4 seconds.
pub const UPDATE_ANGLE_SPEED: f32 = 5.0;

/// Canonical facing applied by `Character::setup`.
pub const DEFAULT_FACING: Vec2 = Vec2::Y;

// ============================================================================
// Movement
// ============================================================================

/// Stop distance used when moving toward a plain point.
pub const DEFAULT_AUTO_MOVE_STOP_DISTANCE: f32 = 0.01;

/// Scale from the "move speed" stat to world units per second.
/// A move speed of 300 walks 3 units per second.
pub const MOVE_SPEED_COEFFICIENT: f32 = 0.01;
