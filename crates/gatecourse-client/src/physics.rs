//! Physics integration using Avian 3D.
//!
//! Configures the fixed-step world from [`PhysicsSettings`] and converts
//! between Avian's body components and the engine-agnostic [`BodyState`]
//! the simulation core operates on.

use avian3d::debug_render::{PhysicsDebugPlugin, PhysicsGizmos};
use avian3d::prelude::*;
use bevy::color::palettes::css::LIME;
use bevy::gizmos::config::{GizmoConfig, GizmoConfigStore};
use bevy::prelude::*;
use gatecourse::{BodyState, PhysicsSettings};

use crate::launch_params::LaunchParams;

/// Plugin for the rigid-body world.
pub struct PhysicsWorldPlugin;

impl Plugin for PhysicsWorldPlugin {
    fn build(&self, app: &mut App) {
        let settings = PhysicsSettings::default();

        app.add_plugins(PhysicsPlugins::default())
            // Add debug rendering plugin (disabled unless requested).
            .add_plugins(PhysicsDebugPlugin)
            .insert_resource(Gravity(settings.gravity))
            .insert_resource(Time::<Fixed>::from_hz(settings.fixed_hz))
            // Cap catch-up after a stall at `max_substeps` fixed steps.
            .insert_resource(Time::<Virtual>::from_max_delta(settings.max_frame_delta()))
            .insert_resource(WorldMaterial::from(&settings))
            .insert_resource(PhysicsConfig(settings))
            .add_systems(Startup, configure_physics_debug_on_startup);
    }
}

/// Physics settings in effect.
#[derive(Resource, Debug, Clone)]
pub struct PhysicsConfig(pub PhysicsSettings);

/// Contact material shared by the static world geometry.
#[derive(Resource, Debug, Clone, Copy)]
pub struct WorldMaterial {
    pub friction: Friction,
    pub restitution: Restitution,
}

impl From<&PhysicsSettings> for WorldMaterial {
    fn from(settings: &PhysicsSettings) -> Self {
        Self {
            friction: Friction::new(settings.friction),
            restitution: Restitution::new(settings.restitution),
        }
    }
}

/// Configure physics debug rendering on startup.
fn configure_physics_debug_on_startup(
    mut config_store: ResMut<GizmoConfigStore>,
    params: Res<LaunchParams>,
) {
    // Configure PhysicsGizmos with a bright collider color.
    let physics_gizmos = PhysicsGizmos {
        collider_color: Some(LIME.into()),
        ..Default::default()
    };

    // Use negative depth_bias to render gizmos on top of geometry.
    let gizmo_config = GizmoConfig {
        enabled: params.physics_debug,
        depth_bias: -1.0,
        ..Default::default()
    };

    config_store.insert(gizmo_config, physics_gizmos);
}

/// Toggle physics debug visualization.
pub fn toggle_physics_debug(config_store: &mut GizmoConfigStore) {
    let (config, _) = config_store.config_mut::<PhysicsGizmos>();
    config.enabled = !config.enabled;
    tracing::info!("Physics debug visualization: {}", config.enabled);
}

// ============================================================================
// Body state bridge
// ============================================================================

/// Read a [`BodyState`] from Avian's body components.
pub fn read_body(
    position: &Position,
    rotation: &Rotation,
    linear_velocity: &LinearVelocity,
    angular_velocity: &AngularVelocity,
    sleeping: bool,
) -> BodyState {
    BodyState {
        position: position.0,
        rotation: rotation.0,
        linear_velocity: linear_velocity.0,
        angular_velocity: angular_velocity.0,
        sleeping,
    }
}

/// Write a [`BodyState`] back into Avian's body components.
pub fn write_body(
    body: &BodyState,
    position: &mut Position,
    rotation: &mut Rotation,
    linear_velocity: &mut LinearVelocity,
    angular_velocity: &mut AngularVelocity,
) {
    position.0 = body.position;
    rotation.0 = body.rotation;
    linear_velocity.0 = body.linear_velocity;
    angular_velocity.0 = body.angular_velocity;
}
