//! The player's car.
//!
//! The car is a dynamic Avian body driven by a [`VehicleController`]. Input
//! is applied in `FixedUpdate`, ahead of the physics step, by copying the body
//! into a [`BodyState`], letting the controller correct it, and writing it
//! back. The visual is a separate entity synced from the body after the step.

use avian3d::prelude::*;
use bevy::prelude::*;
use gatecourse::{VehicleController, VehicleTuning};

use crate::{
    input::CurrentDriveInput,
    launch_params::LaunchParams,
    models::{ModelOverlay, Placeholder, placeholder_material},
    physics::{WorldMaterial, read_body, write_body},
    track::Course,
};

const PLACEHOLDER_COLOR: Color = Color::srgb(0.2, 0.4, 1.0);

/// Plugin for the player's car.
pub struct VehiclePlugin;

impl Plugin for VehiclePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_car)
            .add_systems(FixedUpdate, drive_car)
            .add_systems(
                FixedPostUpdate,
                sync_car_visual
                    .in_set(CarSystems::SyncVisual)
                    .after(PhysicsSystems::Last),
            );
    }
}

/// Ordering for systems that read the car after the physics step.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CarSystems {
    /// Visual transform refreshed from the stepped body.
    SyncVisual,
}

/// The car's rigid body.
#[derive(Component)]
pub struct Car {
    pub controller: VehicleController,
    /// Entity carrying the car's visual.
    pub visual: Entity,
}

/// Marker for the car's visual root.
#[derive(Component)]
pub struct CarVisual;

fn spawn_car(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    params: Res<LaunchParams>,
    course: Res<Course>,
    material: Res<WorldMaterial>,
) {
    let tuning = params.tuning.clone();
    let mut controller = VehicleController::new(tuning.clone());
    let body = controller.spawn_body(course.0.vehicle_spawn);
    let visual = controller.visual();

    // Model faces +Z; the car drives toward -Z.
    let model_transform = Transform::from_xyz(0.0, -0.3, 0.0)
        .with_rotation(Quat::from_rotation_y(std::f32::consts::PI))
        .with_scale(Vec3::splat(1.5));

    let size = tuning.half_extents * 2.0;
    let visual_entity = commands
        .spawn((
            Name::new("Car visual"),
            CarVisual,
            Transform::from_translation(visual.translation).with_rotation(visual.rotation),
            Visibility::default(),
            ModelOverlay::new(&asset_server, params.vehicle_model.clone(), model_transform),
        ))
        .with_child((
            Placeholder,
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(materials.add(placeholder_material(PLACEHOLDER_COLOR))),
            Transform::from_xyz(0.0, tuning.visual_offset, 0.0),
        ))
        .id();

    commands.spawn((
        Name::new("Car"),
        Car {
            controller,
            visual: visual_entity,
        },
        car_body(&tuning, &material),
        Transform::from_translation(body.position).with_rotation(body.rotation),
    ));

    tracing::info!("Car spawned at {}", course.0.vehicle_spawn);
}

/// Rigid-body components for a car with this tuning.
fn car_body(tuning: &VehicleTuning, material: &WorldMaterial) -> impl Bundle {
    let size = tuning.half_extents * 2.0;
    (
        RigidBody::Dynamic,
        Collider::cuboid(size.x, size.y, size.z),
        Mass(tuning.mass),
        LinearDamping(tuning.linear_damping),
        AngularDamping(tuning.angular_damping),
        material.friction,
        material.restitution,
        // Driven every tick; must never fall asleep.
        SleepingDisabled,
        CollisionEventsEnabled,
    )
}

/// Apply the controller to the car body ahead of the physics step.
#[allow(clippy::type_complexity)]
fn drive_car(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    input: Res<CurrentDriveInput>,
    mut query: Query<(
        Entity,
        &mut Car,
        &mut Position,
        &mut Rotation,
        &mut LinearVelocity,
        &mut AngularVelocity,
        Has<Sleeping>,
    )>,
) {
    let dt = time.delta_secs();

    for (entity, mut car, mut position, mut rotation, mut linear, mut angular, sleeping) in
        &mut query
    {
        let mut body = read_body(&position, &rotation, &linear, &angular, sleeping);
        car.controller.update(&mut body, &input.0, dt);
        write_body(&body, &mut position, &mut rotation, &mut linear, &mut angular);

        if sleeping && !body.sleeping {
            commands.entity(entity).remove::<Sleeping>();
        }
    }
}

/// Refresh the car visual from the stepped body.
fn sync_car_visual(
    mut cars: Query<(&mut Car, &Position, &Rotation)>,
    mut visuals: Query<&mut Transform, With<CarVisual>>,
) {
    for (mut car, position, rotation) in &mut cars {
        let body = read_body(
            position,
            rotation,
            &LinearVelocity::ZERO,
            &AngularVelocity::ZERO,
            false,
        );
        car.controller.sync_visual(&body);

        let Ok(mut transform) = visuals.get_mut(car.visual) else {
            continue;
        };
        let visual = car.controller.visual();
        transform.translation = visual.translation;
        transform.rotation = visual.rotation;
    }
}

/// Put the car back at `spawn`, at rest and facing down the course.
pub fn reset_car(
    car: &mut Car,
    position: &mut Position,
    rotation: &mut Rotation,
    linear: &mut LinearVelocity,
    angular: &mut AngularVelocity,
    spawn: Vec3,
) {
    let mut body = read_body(position, rotation, linear, angular, false);
    car.controller.reset(&mut body, spawn);
    write_body(&body, position, rotation, linear, angular);
}
