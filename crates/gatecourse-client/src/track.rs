//! Static course geometry: ground, boundary walls, markings and gates.
//!
//! Walls and ground are rigid bodies but not obstacles; hitting them never
//! costs points.

use avian3d::prelude::*;
use bevy::prelude::*;
use gatecourse::{CourseLayout, ZoneKind};

use crate::{
    models::{ModelOverlay, Placeholder, placeholder_material},
    physics::WorldMaterial,
};

/// Thickness of the ground slab below y = 0.
const GROUND_DEPTH: f32 = 1.0;
/// Ground collider extent beyond the track on every side.
const GROUND_MARGIN: f32 = 40.0;

const ASPHALT: Color = Color::srgb(0.333, 0.333, 0.333);
const GRASS: Color = Color::srgb(0.227, 0.549, 0.227);
const WALL: Color = Color::srgb(1.0, 1.0, 0.0);
const MARKING: Color = Color::WHITE;

/// Plugin that builds the course once at startup.
pub struct TrackPlugin;

impl Plugin for TrackPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_track, spawn_gates));
    }
}

/// Course layout in use.
#[derive(Resource, Debug, Clone, Default)]
pub struct Course(pub CourseLayout);

/// Marker for a boundary wall.
#[derive(Component, Debug)]
pub struct Wall;

/// Start or finish gate visual.
#[derive(Component, Debug)]
pub struct Gate(pub ZoneKind);

fn spawn_track(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    course: Res<Course>,
    material: Res<WorldMaterial>,
) {
    let layout = &course.0;

    // Ground slab whose top face is y = 0.
    let ground_size = Vec3::new(
        layout.track_width + 2.0 * GROUND_MARGIN,
        GROUND_DEPTH,
        layout.track_length + 2.0 * GROUND_MARGIN,
    );
    commands.spawn((
        Name::new("Ground"),
        RigidBody::Static,
        Collider::cuboid(ground_size.x, ground_size.y, ground_size.z),
        material.friction,
        material.restitution,
        Transform::from_xyz(0.0, -GROUND_DEPTH / 2.0, 0.0),
    ));

    // Asphalt with grass around it.
    commands.spawn((
        Name::new("Asphalt"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(layout.track_width, layout.track_length))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: ASPHALT,
            perceptual_roughness: 0.9,
            metallic: 0.1,
            ..default()
        })),
        Transform::default(),
    ));
    commands.spawn((
        Name::new("Grass"),
        Mesh3d(meshes.add(
            Plane3d::default()
                .mesh()
                .size(layout.track_width * 2.0, layout.track_length * 2.0),
        )),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: GRASS,
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.01, 0.0),
    ));

    let wall_material = materials.add(StandardMaterial {
        base_color: WALL,
        perceptual_roughness: 0.5,
        ..default()
    });
    for wall in layout.walls() {
        commands.spawn((
            Name::new("Wall"),
            Wall,
            RigidBody::Static,
            Collider::cuboid(wall.size.x, wall.size.y, wall.size.z),
            material.friction,
            material.restitution,
            Mesh3d(meshes.add(Cuboid::from_size(wall.size))),
            MeshMaterial3d(wall_material.clone()),
            Transform::from_translation(wall.center),
        ));
    }

    spawn_road_markings(&mut commands, &mut meshes, &mut materials, layout);
    spawn_lamp_posts(&mut commands, &mut meshes, &mut materials, layout);

    tracing::info!(
        "Track ready: {} x {} m",
        layout.track_width,
        layout.track_length
    );
}

/// Dashed center line plus two solid side lines.
fn spawn_road_markings(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    layout: &CourseLayout,
) {
    const LINE_WIDTH: f32 = 0.3;
    const DASH: f32 = 3.0;
    const GAP: f32 = 2.0;

    let material = materials.add(StandardMaterial {
        base_color: MARKING,
        perceptual_roughness: 0.5,
        ..default()
    });

    let dash_mesh = meshes.add(Plane3d::default().mesh().size(LINE_WIDTH, DASH));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let dashes = (layout.track_length / (DASH + GAP)).floor() as u32;
    for i in 0..dashes {
        #[allow(clippy::cast_precision_loss)]
        let z = -layout.track_length / 2.0 + DASH / 2.0 + i as f32 * (DASH + GAP);
        commands.spawn((
            Mesh3d(dash_mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_xyz(0.0, 0.01, z),
        ));
    }

    let side_mesh = meshes.add(Plane3d::default().mesh().size(LINE_WIDTH, layout.track_length));
    for x in [-layout.track_width / 4.0, layout.track_width / 4.0] {
        commands.spawn((
            Mesh3d(side_mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_xyz(x, 0.01, 0.0),
        ));
    }
}

/// Six street lamps along the long edges.
fn spawn_lamp_posts(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    layout: &CourseLayout,
) {
    let lamp_color = Color::srgb(1.0, 1.0, 0.667);
    let post_mesh = meshes.add(Cylinder::new(0.1, 4.0));
    let bulb_mesh = meshes.add(Sphere::new(0.3));
    let post_material = materials.add(Color::srgb(0.2, 0.2, 0.2));
    let bulb_material = materials.add(StandardMaterial {
        base_color: lamp_color,
        emissive: lamp_color.to_linear() * 0.3,
        ..default()
    });

    let x = layout.track_width / 2.0 - 2.0;
    let z = layout.track_length / 2.0 - 10.0;
    for (px, pz) in [(-x, -z), (-x, 0.0), (-x, z), (x, -z), (x, 0.0), (x, z)] {
        commands
            .spawn((
                Name::new("Lamp post"),
                Mesh3d(post_mesh.clone()),
                MeshMaterial3d(post_material.clone()),
                Transform::from_xyz(px, 2.0, pz),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Mesh3d(bulb_mesh.clone()),
                    MeshMaterial3d(bulb_material.clone()),
                    Transform::from_xyz(0.0, 2.2, 0.0),
                ));
                parent.spawn((
                    PointLight {
                        color: lamp_color,
                        intensity: 40_000.0,
                        range: 15.0,
                        ..default()
                    },
                    Transform::from_xyz(0.0, 2.0, 0.0),
                ));
            });
    }
}

/// Gate colors and model for a zone.
fn gate_style(kind: ZoneKind) -> (Color, &'static str, f32) {
    match kind {
        ZoneKind::Start => (Color::srgb(0.0, 1.0, 0.0), "models/gate.glb", 0.0),
        ZoneKind::Finish => (
            Color::srgb(1.0, 0.0, 0.0),
            "models/gate-finish.glb",
            std::f32::consts::PI,
        ),
    }
}

fn spawn_gates(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    course: Res<Course>,
) {
    let layout = &course.0;
    let post_mesh = meshes.add(Cylinder::new(0.15, 2.5));
    let beam_mesh = meshes.add(Cuboid::new(4.3, 0.3, 0.3));
    let marking_mesh = meshes.add(Plane3d::default().mesh().size(6.0, 4.0));
    let border_mesh = meshes.add(Plane3d::default().mesh().size(0.15, 4.0));
    let border_material = materials.add(MARKING);

    for (kind, center) in [
        (ZoneKind::Start, layout.start_center),
        (ZoneKind::Finish, layout.finish_center),
    ] {
        let (color, model, yaw) = gate_style(kind);
        let placeholder = materials.add(placeholder_material(color));
        let marking = materials.add(StandardMaterial {
            base_color: color.with_alpha(0.3),
            alpha_mode: AlphaMode::Blend,
            double_sided: true,
            cull_mode: None,
            ..default()
        });

        commands
            .spawn((
                Name::new(format!("{kind:?} gate")),
                Gate(kind),
                Transform::from_translation(center).with_rotation(Quat::from_rotation_y(yaw)),
                Visibility::default(),
                ModelOverlay::new(&asset_server, model, Transform::from_scale(Vec3::splat(2.0))),
            ))
            .with_children(|parent| {
                for x in [-2.0, 2.0] {
                    parent.spawn((
                        Placeholder,
                        Mesh3d(post_mesh.clone()),
                        MeshMaterial3d(placeholder.clone()),
                        Transform::from_xyz(x, 1.25, 0.0),
                    ));
                }
                parent.spawn((
                    Placeholder,
                    Mesh3d(beam_mesh.clone()),
                    MeshMaterial3d(placeholder.clone()),
                    Transform::from_xyz(0.0, 2.5, 0.0),
                ));

                parent.spawn((
                    Mesh3d(marking_mesh.clone()),
                    MeshMaterial3d(marking.clone()),
                    Transform::from_xyz(0.0, 0.02, 0.0),
                ));
                for x in [-3.0, 3.0] {
                    parent.spawn((
                        Mesh3d(border_mesh.clone()),
                        MeshMaterial3d(border_material.clone()),
                        Transform::from_xyz(x, 0.03, 0.0),
                    ));
                }
            });
    }
}
