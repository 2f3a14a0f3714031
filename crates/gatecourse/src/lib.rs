//! Simulation core for a gate-to-gate driving game.
//!
//! A car drives a winding course from a start gate to a finish gate while
//! avoiding cones and boxes, each contact costing points. This crate holds the
//! parts with real invariants and tuning, free of any engine or renderer:
//!
//! - [`VehicleController`]: turns a boolean [`DriveInput`] snapshot into
//!   velocity and orientation writes against a rigid body ([`BodyState`]).
//! - [`ObstacleRegistry`]: generation-tagged obstacle bookkeeping used to
//!   resolve collisions back to obstacle ids.
//! - [`ScoreLedger`]: cooldown-gated penalty accumulator.
//! - [`ZoneDetector`] and [`RaceOutcome`]: start/finish containment and the
//!   one-shot win latch.
//!
//! # Design principles
//!
//! - **Engine-agnostic**: the rigid body is read and written through a plain
//!   [`BodyState`] value; the physics engine owns the real body.
//! - **Deterministic corrections**: leveling and ground clamping are explicit
//!   per-tick writes rather than physical constraints.
//! - **Never fails per tick**: unknown bodies, unconfigured zones and repeated
//!   contacts degrade to "nothing happens".
//!
//! # Example
//!
//! ```
//! use gatecourse::{BodyState, DriveInput, VehicleController, VehicleTuning};
//! use glam::Vec3;
//!
//! let mut controller = VehicleController::new(VehicleTuning::default());
//! let mut body = controller.spawn_body(Vec3::new(0.0, 0.5, 35.0));
//!
//! let input = DriveInput { forward: true, ..Default::default() };
//! controller.update(&mut body, &input, 1.0 / 60.0);
//! assert!(controller.speed() > 0.0);
//! ```

pub mod body;
pub mod collision;
pub mod course;
mod error;
pub mod hud;
pub mod obstacle;
pub mod physics;
pub mod score;
pub mod vehicle;
pub mod zone;

pub use body::BodyState;
pub use collision::{ContactOutcome, dispatch_contact};
pub use course::{CourseLayout, ObstaclePlacement, WallSegment};
pub use error::{Error, Result};
pub use hud::{FrameRateSampler, speed_kmh};
pub use obstacle::{Obstacle, ObstacleId, ObstacleKind, ObstacleRegistry, ObstacleShape};
pub use physics::PhysicsSettings;
pub use score::{ScoreLedger, ScoringRules};
pub use vehicle::{DriveInput, VehicleController, VehicleTuning, VisualTransform};
pub use zone::{RaceOutcome, Zone, ZoneDetector, ZoneKind, ZoneStatus};
