//! Arcade vehicle controller.
//!
//! The controller keeps two scalars of its own (signed speed and steering
//! angle) and each tick writes velocity and orientation directly into the
//! rigid body. Nothing is applied as a force: motion is always aligned with
//! the facing direction, the body is re-leveled every tick, and vertical
//! motion is clamped so the car neither launches nor sinks.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::{
    body::{BodyState, heading_from_yaw, level_rotation},
    error::{Error, Result},
};

// ============================================================================
// Tuning
// ============================================================================

/// Handling and body parameters for the car.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Top forward speed (m/s). 13.89 m/s is 50 km/h.
    pub max_speed: f32,
    /// Throttle and reverse acceleration (m/s²).
    pub acceleration: f32,
    /// Deceleration while braking (m/s²).
    pub brake_force: f32,
    /// Steering rate at full lock (rad/s).
    pub turn_speed: f32,
    /// Coasting deceleration with no throttle (m/s²).
    pub friction: f32,
    /// Reverse top speed as a fraction of `max_speed`.
    pub reverse_factor: f32,
    /// Below this absolute speed steering is disabled.
    pub steering_dead_zone: f32,
    /// Turn rate multiplier when nearly stopped.
    pub low_speed_turn_factor: f32,
    /// Turn rate multiplier at top speed.
    pub high_speed_turn_factor: f32,
    /// Body height considered "on the ground".
    pub ground_level: f32,
    /// Height above `ground_level` still treated as grounded.
    pub ground_tolerance: f32,
    /// Forced sink rate when the body is above the ground band (m/s).
    pub descent_speed: f32,
    /// Vertical offset from body center down to the visual origin.
    pub visual_offset: f32,
    /// Body mass (kg).
    pub mass: f32,
    /// Collider half-extents (x = half width, y = half height, z = half length).
    pub half_extents: Vec3,
    /// Engine-side linear damping.
    pub linear_damping: f32,
    /// Engine-side angular damping.
    pub angular_damping: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_speed: 13.89,
            acceleration: 12.0,
            brake_force: 20.0,
            turn_speed: 1.8,
            friction: 4.0,
            reverse_factor: 0.5,
            steering_dead_zone: 0.1,
            low_speed_turn_factor: 0.8,
            high_speed_turn_factor: 0.4,
            ground_level: 1.0,
            ground_tolerance: 0.1,
            descent_speed: 5.0,
            visual_offset: 0.5,
            mass: 1000.0,
            half_extents: Vec3::new(1.0, 0.5, 2.0),
            linear_damping: 0.3,
            angular_damping: 0.5,
        }
    }
}

impl VehicleTuning {
    /// Top reverse speed (m/s, positive).
    pub fn max_reverse_speed(&self) -> f32 {
        self.max_speed * self.reverse_factor
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_speed", self.max_speed),
            ("acceleration", self.acceleration),
            ("brake_force", self.brake_force),
            ("turn_speed", self.turn_speed),
            ("friction", self.friction),
            ("descent_speed", self.descent_speed),
            ("mass", self.mass),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidTuning {
                    field,
                    detail: format!("must be positive and finite, got {value}"),
                });
            }
        }

        if !(self.reverse_factor > 0.0 && self.reverse_factor <= 1.0) {
            return Err(Error::InvalidTuning {
                field: "reverse_factor",
                detail: format!("must be in (0, 1], got {}", self.reverse_factor),
            });
        }

        if !(self.steering_dead_zone >= 0.0 && self.steering_dead_zone < self.max_speed) {
            return Err(Error::InvalidTuning {
                field: "steering_dead_zone",
                detail: format!(
                    "must be in [0, max_speed), got {}",
                    self.steering_dead_zone
                ),
            });
        }

        if self.high_speed_turn_factor > self.low_speed_turn_factor
            || self.high_speed_turn_factor < 0.0
        {
            return Err(Error::InvalidTuning {
                field: "high_speed_turn_factor",
                detail: format!(
                    "must be in [0, {}], got {}",
                    self.low_speed_turn_factor, self.high_speed_turn_factor
                ),
            });
        }

        if self.half_extents.min_element() <= 0.0 {
            return Err(Error::InvalidTuning {
                field: "half_extents",
                detail: format!("all extents must be positive, got {}", self.half_extents),
            });
        }

        Ok(())
    }
}

// ============================================================================
// Input
// ============================================================================

/// Driver intents sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveInput {
    /// Throttle.
    pub forward: bool,
    /// Reverse.
    pub backward: bool,
    /// Steer left.
    pub left: bool,
    /// Steer right.
    pub right: bool,
    /// Brake.
    pub brake: bool,
}

// ============================================================================
// Controller
// ============================================================================

/// World transform for the car's visual, derived from the body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualTransform {
    /// Visual origin (body center lowered by the visual offset).
    pub translation: Vec3,
    /// Visual orientation (same as the body).
    pub rotation: Quat,
}

/// Drives one rigid body from discrete input.
#[derive(Clone, Debug)]
pub struct VehicleController {
    tuning: VehicleTuning,
    /// Signed speed along the heading (m/s, negative = reversing).
    speed: f32,
    /// Current steering rate (rad/s, positive = turning left).
    steering_angle: f32,
    visual: VisualTransform,
}

impl VehicleController {
    /// Create a controller at rest.
    pub fn new(tuning: VehicleTuning) -> Self {
        Self {
            tuning,
            speed: 0.0,
            steering_angle: 0.0,
            visual: VisualTransform {
                translation: Vec3::ZERO,
                rotation: Quat::IDENTITY,
            },
        }
    }

    /// Tuning in use.
    pub fn tuning(&self) -> &VehicleTuning {
        &self.tuning
    }

    /// Signed speed along the heading (m/s).
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Steering rate applied on the last update (rad/s).
    pub fn steering_angle(&self) -> f32 {
        self.steering_angle
    }

    /// Visual origin in world space.
    pub fn position(&self) -> Vec3 {
        self.visual.translation
    }

    /// Visual transform as of the last sync.
    pub fn visual(&self) -> VisualTransform {
        self.visual
    }

    /// Body state for a car whose visual origin sits at `position`.
    pub fn spawn_body(&mut self, position: Vec3) -> BodyState {
        let body = BodyState::at(position + Vec3::Y * self.tuning.visual_offset);
        self.sync_visual(&body);
        body
    }

    /// Advance one frame.
    ///
    /// Must be called once per frame before the physics step.
    pub fn update(&mut self, body: &mut BodyState, input: &DriveInput, dt: f32) {
        let dt = dt.max(0.0);

        // Continuous control needs continuous simulation.
        if body.sleeping {
            body.sleeping = false;
        }

        // Keep the car planar: rebuild orientation from heading alone.
        let yaw = body.yaw();
        body.rotation = level_rotation(yaw);

        self.integrate_speed(input, dt);
        body.angular_velocity = Vec3::Y * self.steer(input);

        // Motion follows the heading exactly; no lateral slip.
        let direction = heading_from_yaw(yaw) * self.speed;
        body.linear_velocity.x = direction.x;
        body.linear_velocity.z = direction.z;

        self.clamp_to_ground(body);
        self.sync_visual(body);
    }

    /// Move the car to `position` at rest, facing -Z.
    pub fn reset(&mut self, body: &mut BodyState, position: Vec3) {
        *body = BodyState::at(position + Vec3::Y * self.tuning.visual_offset);
        self.speed = 0.0;
        self.steering_angle = 0.0;
        self.sync_visual(body);
    }

    /// Refresh the visual transform from the body.
    pub fn sync_visual(&mut self, body: &BodyState) {
        self.visual = VisualTransform {
            translation: body.position - Vec3::Y * self.tuning.visual_offset,
            rotation: body.rotation,
        };
    }

    fn integrate_speed(&mut self, input: &DriveInput, dt: f32) {
        let t = &self.tuning;

        if input.forward {
            self.speed = (self.speed + t.acceleration * dt).min(t.max_speed);
        } else if input.backward {
            self.speed = (self.speed - t.acceleration * dt).max(-t.max_reverse_speed());
        } else {
            self.speed = decay_toward_zero(self.speed, t.friction * dt);
        }

        if input.brake {
            self.speed = decay_toward_zero(self.speed, t.brake_force * dt);
        }
    }

    /// Update the steering angle and return the yaw rate to apply.
    fn steer(&mut self, input: &DriveInput) -> f32 {
        let t = &self.tuning;

        if self.speed.abs() <= t.steering_dead_zone {
            self.steering_angle = 0.0;
            return 0.0;
        }

        // Flip while reversing so "left" follows the travel direction.
        let direction = if self.speed > 0.0 { 1.0 } else { -1.0 };
        self.steering_angle = 0.0;
        if input.left {
            self.steering_angle = t.turn_speed * direction;
        }
        if input.right {
            self.steering_angle = -t.turn_speed * direction;
        }

        self.steering_angle * self.turn_factor()
    }

    /// Tighter turns at low speed, looser at top speed.
    fn turn_factor(&self) -> f32 {
        let t = &self.tuning;
        let normalized = (self.speed.abs() / t.max_speed).min(1.0);
        t.low_speed_turn_factor - normalized * (t.low_speed_turn_factor - t.high_speed_turn_factor)
    }

    fn clamp_to_ground(&self, body: &mut BodyState) {
        let t = &self.tuning;

        if body.position.y <= t.ground_level + t.ground_tolerance {
            body.linear_velocity.y = 0.0;
            body.position.y = t.ground_level;
        } else {
            body.linear_velocity.y = -t.descent_speed;
        }
    }
}

/// Reduce `value` toward zero by `amount` without crossing it.
fn decay_toward_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else if value < 0.0 {
        (value + amount).min(0.0)
    } else {
        0.0
    }
}
