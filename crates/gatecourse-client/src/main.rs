//! Gate-to-gate driving game using Bevy.
//!
//! Drive a car from the start gate to the finish gate along a cone-lined
//! road. Every cone or box you hit costs points.

mod camera;
mod input;
mod launch_params;
mod models;
mod obstacles;
mod physics;
mod race;
mod track;
mod ui;
mod vehicle;

use bevy::light::light_consts::lux;
use bevy::prelude::*;
use camera::{ChaseCamera, ChaseCameraPlugin};
use input::InputPlugin;
use models::ModelOverlayPlugin;
use obstacles::ObstaclePlugin;
use physics::PhysicsWorldPlugin;
use race::RacePlugin;
use track::{Course, TrackPlugin};
use ui::HudPlugin;
use vehicle::VehiclePlugin;

/// Sky color behind the course.
const SKY: Color = Color::srgb(0.529, 0.808, 0.922);

/// Plugin for the main application.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Course>()
            .insert_resource(ClearColor(SKY))
            .add_plugins((
                PhysicsWorldPlugin,
                InputPlugin,
                ModelOverlayPlugin,
                TrackPlugin,
                VehiclePlugin,
                ObstaclePlugin,
                RacePlugin,
                ChaseCameraPlugin,
                HudPlugin,
            ))
            .add_systems(Startup, setup_scene);
    }
}

/// Set up the camera and lighting.
fn setup_scene(mut commands: Commands, course: Res<Course>) {
    let chase = ChaseCamera::default();
    let spawn = Transform::from_translation(course.0.vehicle_spawn);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..Default::default()
        }),
        Transform::from_translation(chase.desired_position(&spawn))
            .looking_at(chase.look_target(&spawn), Vec3::Y),
        chase,
    ));

    // Sun, casting shadows over the whole track.
    commands.spawn((
        DirectionalLight {
            color: Color::WHITE,
            illuminance: lux::AMBIENT_DAYLIGHT,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(50.0, 100.0, 50.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Sky fill from the opposite side.
    commands.spawn((
        DirectionalLight {
            color: SKY,
            illuminance: lux::OVERCAST_DAY,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-30.0, 60.0, -40.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    tracing::info!("Scene setup complete - WASD or arrows to drive, Space to brake");
}

fn main() {
    // Initialize tracing for native platforms.
    #[cfg(not(target_family = "wasm"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Initialize tracing for WASM (logs to browser console).
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let params = launch_params::parse();

    let mut app = App::new();

    #[allow(unused_mut)]
    let mut window = Window {
        title: "gatecourse".to_string(),
        resolution: (1280, 720).into(),
        position: WindowPosition::Centered(MonitorSelection::Primary),
        ..Default::default()
    };

    // WASM: Fit canvas to parent element and prevent browser event handling.
    #[cfg(target_family = "wasm")]
    {
        window.fit_canvas_to_parent = true;
        window.prevent_default_event_handling = true;
    }

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(window),
        ..Default::default()
    }));

    app.insert_resource(params).add_plugins(AppPlugin).run();
}
