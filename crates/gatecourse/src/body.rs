//! Rigid body state exchanged with the physics engine.
//!
//! The engine owns the real body. Each tick the host copies the fields the
//! core needs into a [`BodyState`], lets the core correct them, and writes the
//! result back before the simulation steps.

use glam::{Quat, Vec3};

/// Snapshot of a rigid body's kinematic state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    /// Center of mass position in world space.
    pub position: Vec3,
    /// Orientation in world space.
    pub rotation: Quat,
    /// Linear velocity (m/s).
    pub linear_velocity: Vec3,
    /// Angular velocity (rad/s).
    pub angular_velocity: Vec3,
    /// Whether the engine has put the body to sleep.
    pub sleeping: bool,
}

impl Default for BodyState {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

impl BodyState {
    /// A body at rest at `position` with identity orientation.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            sleeping: false,
        }
    }

    /// Heading around +Y in radians.
    ///
    /// Zero faces -Z. Derived from the projected forward axis so that any
    /// accumulated roll or pitch does not leak into the heading.
    pub fn yaw(&self) -> f32 {
        let forward = self.rotation * Vec3::NEG_Z;
        (-forward.x).atan2(-forward.z)
    }

    /// Unit vector the body faces on the ground plane.
    pub fn heading(&self) -> Vec3 {
        heading_from_yaw(self.yaw())
    }
}

/// Orientation with the given heading and no roll or pitch.
pub fn level_rotation(yaw: f32) -> Quat {
    Quat::from_rotation_y(yaw)
}

/// Ground-plane direction for a heading: `(-sin(yaw), 0, -cos(yaw))`.
pub fn heading_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_identity_faces_negative_z() {
        let body = BodyState::default();
        assert!(approx(body.yaw(), 0.0));
        assert!(body.heading().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn test_yaw_round_trips_through_level_rotation() {
        for yaw in [-2.5, -FRAC_PI_2, -0.3, 0.0, 0.7, FRAC_PI_2, 3.0] {
            let body = BodyState {
                rotation: level_rotation(yaw),
                ..BodyState::default()
            };
            assert!(approx(body.yaw(), yaw), "yaw {yaw} read back as {}", body.yaw());
        }
    }

    #[test]
    fn test_yaw_ignores_roll() {
        // A rolled body still reports its heading.
        let rotation = Quat::from_rotation_y(FRAC_PI_4) * Quat::from_rotation_z(0.6);
        let body = BodyState {
            rotation,
            ..BodyState::default()
        };
        assert!(approx(body.yaw(), FRAC_PI_4));
    }

    #[test]
    fn test_heading_matches_rotated_forward() {
        let yaw = 1.1;
        let expected = Quat::from_rotation_y(yaw) * Vec3::NEG_Z;
        assert!(heading_from_yaw(yaw).abs_diff_eq(expected, 1e-6));
    }
}
