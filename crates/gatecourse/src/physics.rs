//! Simulation parameters handed to the rigid-body engine.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// World-level physics configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Fixed integration step (Hz).
    pub fixed_hz: f64,
    /// Upper bound on catch-up steps after a long frame.
    pub max_substeps: u32,
    pub gravity: Vec3,
    /// Contact friction for bodies without their own material.
    pub friction: f32,
    /// Contact restitution for bodies without their own material.
    pub restitution: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            fixed_hz: 60.0,
            max_substeps: 5,
            gravity: Vec3::new(0.0, -9.82, 0.0),
            friction: 0.3,
            restitution: 0.2,
        }
    }
}

impl PhysicsSettings {
    pub fn fixed_step(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fixed_hz)
    }

    /// Longest frame delta the engine will try to simulate.
    ///
    /// Anything beyond this is dropped so one stall cannot trigger more than
    /// `max_substeps` fixed steps.
    pub fn max_frame_delta(&self) -> Duration {
        self.fixed_step() * self.max_substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_step_budget() {
        let settings = PhysicsSettings::default();
        assert_eq!(settings.fixed_step(), Duration::from_secs_f64(1.0 / 60.0));
        assert_eq!(settings.max_frame_delta(), settings.fixed_step() * 5);
        assert!(settings.max_frame_delta() > Duration::from_millis(83));
        assert!(settings.max_frame_delta() < Duration::from_millis(84));
    }
}
