//! Penalty obstacles and their registry.
//!
//! Obstacles are tagged with an [`ObstacleId`] that carries the layout
//! generation. Clearing the registry bumps the generation, so any id or body
//! handle left over from a previous layout no longer resolves and contacts
//! reported against it are ignored.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{body::BodyState, course::ObstaclePlacement};

/// Obstacle type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Light traffic cone.
    Cone,
    /// Heavy crate.
    Box,
}

impl ObstacleKind {
    /// Body mass (kg). Cones are a quarter of a box.
    pub fn mass(self) -> f32 {
        match self {
            ObstacleKind::Cone => 5.0,
            ObstacleKind::Box => 20.0,
        }
    }

    /// Name of the glTF model for this kind.
    pub fn model_name(self) -> &'static str {
        match self {
            ObstacleKind::Cone => "cone",
            ObstacleKind::Box => "box",
        }
    }
}

impl fmt::Display for ObstacleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_name())
    }
}

/// Physical shape of a single obstacle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleShape {
    pub kind: ObstacleKind,
    pub scale: f32,
}

impl ObstacleShape {
    /// Unscaled distance from the body center to its base.
    const HALF_EXTENT: f32 = 0.4;

    pub fn new(kind: ObstacleKind, scale: f32) -> Self {
        Self { kind, scale }
    }

    /// Distance from the body center to its base; also the minimum body height.
    pub fn half_extent(&self) -> f32 {
        Self::HALF_EXTENT * self.scale
    }

    /// Cone base radius.
    pub fn cone_radius(&self) -> f32 {
        0.3 * self.scale
    }

    /// Full height for cones, full edge length for boxes.
    pub fn height(&self) -> f32 {
        2.0 * self.half_extent()
    }

    pub fn mass(&self) -> f32 {
        self.kind.mass()
    }

    /// Body state for an obstacle whose base rests at `base`.
    pub fn spawn_body(&self, base: Vec3) -> BodyState {
        BodyState::at(base + Vec3::Y * self.half_extent())
    }

    /// Keep the body from settling through the ground.
    ///
    /// Returns `true` if the body was corrected.
    pub fn settle(&self, body: &mut BodyState) -> bool {
        let floor = self.half_extent();
        if body.position.y >= floor {
            return false;
        }
        body.position.y = floor;
        if body.linear_velocity.y < 0.0 {
            body.linear_velocity.y = 0.0;
        }
        true
    }

    /// Visual origin for the body: its base, never below the ground.
    pub fn visual_translation(&self, body: &BodyState) -> Vec3 {
        let mut translation = body.position;
        translation.y = (translation.y - self.half_extent()).max(0.0);
        translation
    }
}

/// Identity of one obstacle within one layout generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId {
    pub generation: u32,
    pub index: u32,
}

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.generation, self.index)
    }
}

/// A registered obstacle and the handle of its rigid body.
#[derive(Clone, Debug)]
pub struct Obstacle<B> {
    id: ObstacleId,
    shape: ObstacleShape,
    body: B,
}

impl<B> Obstacle<B> {
    pub fn id(&self) -> ObstacleId {
        self.id
    }

    pub fn kind(&self) -> ObstacleKind {
        self.shape.kind
    }

    pub fn shape(&self) -> &ObstacleShape {
        &self.shape
    }

    /// Handle of the rigid body backing this obstacle.
    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }
}

/// Owns the current obstacle set.
///
/// `B` is whatever handle the host uses for rigid bodies: an ECS entity, an
/// index into an engine's body list, or the body state itself in tests.
#[derive(Clone, Debug)]
pub struct ObstacleRegistry<B> {
    generation: u32,
    obstacles: Vec<Obstacle<B>>,
}

impl<B> Default for ObstacleRegistry<B> {
    fn default() -> Self {
        Self {
            generation: 0,
            obstacles: Vec::new(),
        }
    }
}

impl<B> ObstacleRegistry<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an obstacle and return its id.
    pub fn add(&mut self, shape: ObstacleShape, body: B) -> ObstacleId {
        let id = ObstacleId {
            generation: self.generation,
            index: u32::try_from(self.obstacles.len()).unwrap_or(u32::MAX),
        };
        self.obstacles.push(Obstacle { id, shape, body });
        id
    }

    /// Remove every obstacle and start a new generation.
    ///
    /// The removed obstacles are handed back so the host can destroy their
    /// bodies and visuals.
    pub fn clear(&mut self) -> Vec<Obstacle<B>> {
        self.generation = self.generation.wrapping_add(1);
        std::mem::take(&mut self.obstacles)
    }

    /// Add one obstacle per placement, creating bodies with `spawn`.
    pub fn populate<F>(&mut self, placements: &[ObstaclePlacement], mut spawn: F)
    where
        F: FnMut(ObstacleShape, Vec3) -> B,
    {
        for placement in placements {
            let shape = placement.shape();
            let body = spawn(shape, placement.position);
            self.add(shape, body);
        }
        tracing::debug!(
            generation = self.generation,
            count = self.obstacles.len(),
            "obstacle layout generated"
        );
    }

    /// Clear, then recreate the given layout under a fresh generation.
    pub fn reset<F>(&mut self, placements: &[ObstaclePlacement], spawn: F) -> Vec<Obstacle<B>>
    where
        F: FnMut(ObstacleShape, Vec3) -> B,
    {
        let removed = self.clear();
        self.populate(placements, spawn);
        removed
    }

    pub fn all(&self) -> &[Obstacle<B>] {
        &self.obstacles
    }

    pub fn all_mut(&mut self) -> &mut [Obstacle<B>] {
        &mut self.obstacles
    }

    /// Look up an obstacle by id. Ids from earlier generations miss.
    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle<B>> {
        if id.generation != self.generation {
            return None;
        }
        self.obstacles.get(id.index as usize)
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl<B: PartialEq> ObstacleRegistry<B> {
    /// Resolve a body handle to the obstacle it belongs to.
    pub fn resolve(&self, body: &B) -> Option<(ObstacleId, ObstacleKind)> {
        self.obstacles
            .iter()
            .find(|obstacle| obstacle.body == *body)
            .map(|obstacle| (obstacle.id, obstacle.kind()))
    }
}

impl ObstacleRegistry<BodyState> {
    /// Apply the settle correction to every obstacle body.
    pub fn settle_all(&mut self) {
        for obstacle in &mut self.obstacles {
            obstacle.shape.settle(&mut obstacle.body);
        }
    }
}
