//! Cones and boxes placed along the course.
//!
//! Each obstacle is a dynamic body plus a separate visual entity. The
//! [`Obstacles`] resource maps body entities back to obstacle ids for
//! collision dispatch, and is rebuilt under a new generation on restart.

use avian3d::prelude::*;
use bevy::prelude::*;
use gatecourse::{CourseLayout, ObstacleKind, ObstacleRegistry, ObstacleShape};

use crate::{
    models::{ModelOverlay, Placeholder, placeholder_material},
    physics::{WorldMaterial, read_body, write_body},
};

/// Plugin for course obstacles.
pub struct ObstaclePlugin;

impl Plugin for ObstaclePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Obstacles>()
            .add_systems(Startup, (load_obstacle_assets, spawn_standard_layout).chain())
            .add_systems(
                FixedPostUpdate,
                (settle_obstacles, sync_obstacle_visuals)
                    .chain()
                    .after(PhysicsSystems::Last),
            );
    }
}

/// Current obstacle set, keyed by body entity.
#[derive(Resource, Default)]
pub struct Obstacles(pub ObstacleRegistry<Entity>);

/// An obstacle's rigid body.
#[derive(Component, Debug)]
pub struct ObstacleBody {
    pub shape: ObstacleShape,
    /// Entity carrying the obstacle's visual.
    pub visual: Entity,
}

/// Shared placeholder meshes and materials.
#[derive(Resource)]
pub struct ObstacleAssets {
    cone_mesh: Handle<Mesh>,
    box_mesh: Handle<Mesh>,
    cone_material: Handle<StandardMaterial>,
    box_material: Handle<StandardMaterial>,
}

fn load_obstacle_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Unit-scale shapes; placeholders are scaled per obstacle.
    let unit = ObstacleShape::new(ObstacleKind::Cone, 1.0);
    commands.insert_resource(ObstacleAssets {
        cone_mesh: meshes.add(Cone::new(unit.cone_radius(), unit.height())),
        box_mesh: meshes.add(Cuboid::from_length(unit.height())),
        cone_material: materials.add(placeholder_material(Color::srgb(1.0, 0.4, 0.0))),
        box_material: materials.add(placeholder_material(Color::srgb(0.545, 0.271, 0.075))),
    });
}

fn spawn_standard_layout(
    mut commands: Commands,
    mut obstacles: ResMut<Obstacles>,
    assets: Res<ObstacleAssets>,
    asset_server: Res<AssetServer>,
    material: Res<WorldMaterial>,
) {
    obstacles.0.populate(&CourseLayout::standard_obstacles(), |shape, base| {
        spawn_obstacle(&mut commands, &assets, &asset_server, &material, shape, base)
    });
    tracing::info!(
        "Obstacle layout generated: {} obstacles, generation {}",
        obstacles.0.len(),
        obstacles.0.generation()
    );
}

/// Spawn one obstacle's body and visual; returns the body entity.
pub fn spawn_obstacle(
    commands: &mut Commands,
    assets: &ObstacleAssets,
    asset_server: &AssetServer,
    material: &WorldMaterial,
    shape: ObstacleShape,
    base: Vec3,
) -> Entity {
    let body = shape.spawn_body(base);
    let (mesh, placeholder, collider) = match shape.kind {
        ObstacleKind::Cone => (
            assets.cone_mesh.clone(),
            assets.cone_material.clone(),
            Collider::cone(shape.cone_radius(), shape.height()),
        ),
        ObstacleKind::Box => (
            assets.box_mesh.clone(),
            assets.box_material.clone(),
            Collider::cuboid(shape.height(), shape.height(), shape.height()),
        ),
    };

    let visual = commands
        .spawn((
            Name::new(format!("{} visual", shape.kind)),
            Transform::from_translation(shape.visual_translation(&body)),
            Visibility::default(),
            ModelOverlay::new(
                asset_server,
                format!("models/{}.glb", shape.kind.model_name()),
                Transform::from_scale(Vec3::splat(1.5 * shape.scale)),
            ),
        ))
        .with_child((
            Placeholder,
            Mesh3d(mesh),
            MeshMaterial3d(placeholder),
            Transform::from_xyz(0.0, shape.half_extent(), 0.0)
                .with_scale(Vec3::splat(shape.scale)),
        ))
        .id();

    commands
        .spawn((
            Name::new(shape.kind.to_string()),
            ObstacleBody { shape, visual },
            RigidBody::Dynamic,
            collider,
            Mass(shape.mass()),
            material.friction,
            material.restitution,
            Transform::from_translation(body.position),
        ))
        .id()
}

/// Despawn every obstacle and lay the standard course out again.
pub fn respawn_layout(
    commands: &mut Commands,
    obstacles: &mut Obstacles,
    assets: &ObstacleAssets,
    asset_server: &AssetServer,
    material: &WorldMaterial,
    bodies: &Query<&ObstacleBody>,
) {
    let removed = obstacles
        .0
        .reset(&CourseLayout::standard_obstacles(), |shape, base| {
            spawn_obstacle(commands, assets, asset_server, material, shape, base)
        });

    for obstacle in &removed {
        let entity = *obstacle.body();
        if let Ok(body) = bodies.get(entity) {
            commands.entity(body.visual).despawn();
        }
        commands.entity(entity).despawn();
    }

    tracing::info!(
        "Obstacle layout regenerated: {} obstacles, generation {}",
        obstacles.0.len(),
        obstacles.0.generation()
    );
}

/// Keep obstacles from settling into the ground.
#[allow(clippy::type_complexity)]
fn settle_obstacles(
    mut query: Query<(
        &ObstacleBody,
        &mut Position,
        &mut Rotation,
        &mut LinearVelocity,
        &mut AngularVelocity,
    )>,
) {
    for (obstacle, mut position, mut rotation, mut linear, mut angular) in &mut query {
        let mut body = read_body(&position, &rotation, &linear, &angular, false);
        if obstacle.shape.settle(&mut body) {
            write_body(&body, &mut position, &mut rotation, &mut linear, &mut angular);
        }
    }
}

fn sync_obstacle_visuals(
    bodies: Query<(&ObstacleBody, &Position, &Rotation)>,
    mut visuals: Query<&mut Transform, Without<ObstacleBody>>,
) {
    for (obstacle, position, rotation) in &bodies {
        let Ok(mut transform) = visuals.get_mut(obstacle.visual) else {
            continue;
        };
        let body = read_body(
            position,
            rotation,
            &LinearVelocity::ZERO,
            &AngularVelocity::ZERO,
            false,
        );
        transform.translation = obstacle.shape.visual_translation(&body);
        transform.rotation = rotation.0;
    }
}
