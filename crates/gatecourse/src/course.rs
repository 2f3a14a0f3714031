//! Static course layout: track bounds, zones and the obstacle table.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::obstacle::{ObstacleKind, ObstacleShape};

/// Where one obstacle goes in a layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePlacement {
    pub kind: ObstacleKind,
    /// Base of the obstacle on the ground.
    pub position: Vec3,
    pub scale: f32,
}

impl ObstaclePlacement {
    pub fn new(kind: ObstacleKind, position: Vec3) -> Self {
        Self {
            kind,
            position,
            scale: 1.0,
        }
    }

    pub fn shape(&self) -> ObstacleShape {
        ObstacleShape::new(self.kind, self.scale)
    }
}

/// A static boundary wall.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub center: Vec3,
    /// Full extents.
    pub size: Vec3,
}

/// Geometry of one course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseLayout {
    /// Ground extent along X.
    pub track_width: f32,
    /// Ground extent along Z.
    pub track_length: f32,
    pub wall_height: f32,
    pub wall_thickness: f32,
    pub start_center: Vec3,
    pub finish_center: Vec3,
    pub zone_radius: f32,
    /// Visual origin of the car at the start of a run.
    pub vehicle_spawn: Vec3,
}

impl Default for CourseLayout {
    fn default() -> Self {
        Self {
            track_width: 60.0,
            track_length: 80.0,
            wall_height: 1.0,
            wall_thickness: 0.5,
            start_center: Vec3::new(0.0, 0.0, 35.0),
            finish_center: Vec3::new(0.0, 0.0, -35.0),
            zone_radius: 3.0,
            vehicle_spawn: Vec3::new(0.0, 0.5, 35.0),
        }
    }
}

/// Distance from the road center line to the cone barrier.
const ROAD_HALF_WIDTH: f32 = 6.0;

/// Spacing between cones along a straight.
const CONE_SPACING: usize = 2;

impl CourseLayout {
    /// The four boundary walls (north, south, west, east).
    pub fn walls(&self) -> [WallSegment; 4] {
        let half_width = self.track_width / 2.0;
        let half_length = self.track_length / 2.0;
        let y = self.wall_height / 2.0;
        let across = Vec3::new(self.track_width, self.wall_height, self.wall_thickness);
        let along = Vec3::new(self.wall_thickness, self.wall_height, self.track_length);

        [
            WallSegment {
                center: Vec3::new(0.0, y, -half_length),
                size: across,
            },
            WallSegment {
                center: Vec3::new(0.0, y, half_length),
                size: across,
            },
            WallSegment {
                center: Vec3::new(-half_width, y, 0.0),
                size: along,
            },
            WallSegment {
                center: Vec3::new(half_width, y, 0.0),
                size: along,
            },
        ]
    }

    /// The standard cone-lined road with boxes to weave around.
    ///
    /// Order is stable; obstacle ids are indices into this list.
    pub fn standard_obstacles() -> Vec<ObstaclePlacement> {
        let mut out = Vec::new();

        // Opening straight.
        straight(&mut out, 0.0, 15..=33);
        boxes(&mut out, &[(-2.0, 28.0), (2.0, 22.0), (0.0, 17.0)]);

        // Left bend.
        bend(
            &mut out,
            &[(14.0, -1.0), (12.0, -3.0), (10.0, -5.0), (8.0, -7.0), (6.0, -9.0), (4.0, -10.0)],
        );
        boxes(&mut out, &[(-6.0, 9.0)]);

        // Offset straight.
        straight(&mut out, -10.0, -10..=2);
        boxes(&mut out, &[(-12.0, -2.0), (-8.0, -6.0)]);

        // Right bend back to center.
        bend(
            &mut out,
            &[
                (-11.0, -9.0),
                (-12.0, -7.0),
                (-13.0, -5.0),
                (-14.0, -3.0),
                (-15.0, -1.0),
                (-16.0, 0.0),
            ],
        );
        boxes(&mut out, &[(-3.0, -14.0)]);

        // Final straight with a slalom.
        straight(&mut out, 0.0, -33..=-17);
        boxes(&mut out, &[(2.0, -20.0), (-2.0, -24.0), (2.0, -28.0), (0.0, -31.0)]);

        out
    }
}

fn cone_pair(out: &mut Vec<ObstaclePlacement>, center_x: f32, z: f32) {
    out.push(ObstaclePlacement::new(
        ObstacleKind::Cone,
        Vec3::new(center_x - ROAD_HALF_WIDTH, 0.0, z),
    ));
    out.push(ObstaclePlacement::new(
        ObstacleKind::Cone,
        Vec3::new(center_x + ROAD_HALF_WIDTH, 0.0, z),
    ));
}

/// Cone pairs from the far end of `z` toward the near end.
fn straight(out: &mut Vec<ObstaclePlacement>, center_x: f32, z: std::ops::RangeInclusive<i32>) {
    for z in z.rev().step_by(CONE_SPACING) {
        #[allow(clippy::cast_precision_loss)]
        cone_pair(out, center_x, z as f32);
    }
}

/// Cone pairs around a list of `(z, center_x)` road centers.
fn bend(out: &mut Vec<ObstaclePlacement>, points: &[(f32, f32)]) {
    for &(z, center_x) in points {
        cone_pair(out, center_x, z);
    }
}

fn boxes(out: &mut Vec<ObstaclePlacement>, points: &[(f32, f32)]) {
    out.extend(
        points
            .iter()
            .map(|&(x, z)| ObstaclePlacement::new(ObstacleKind::Box, Vec3::new(x, 0.0, z))),
    );
}
