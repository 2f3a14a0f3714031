//! Scoring, finish detection and restart.
//!
//! Contacts reported by the physics step are routed through
//! [`dispatch_contact`]; zone checks run on the car's post-step position and
//! trigger [`RaceFinished`] exactly once per run.

use avian3d::prelude::*;
use bevy::prelude::*;
use gatecourse::{
    ContactOutcome, RaceOutcome, ScoreLedger, ScoringRules, ZoneDetector, dispatch_contact,
};

use crate::{
    obstacles::{ObstacleAssets, ObstacleBody, Obstacles, respawn_layout},
    physics::WorldMaterial,
    track::Course,
    vehicle::{Car, CarSystems, reset_car},
};

/// Plugin for scoring and the race lifecycle.
pub struct RacePlugin;

impl Plugin for RacePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Score(ScoreLedger::new(ScoringRules::default())))
            .init_resource::<RaceState>()
            .add_message::<RestartRequested>()
            .add_systems(Startup, configure_zones)
            .add_systems(
                FixedPostUpdate,
                (
                    dispatch_collisions.after(PhysicsSystems::Last),
                    check_zones.after(CarSystems::SyncVisual),
                ),
            )
            .add_systems(Update, restart_race)
            .add_observer(on_race_finished);
    }
}

/// Score for the current run.
#[derive(Resource)]
pub struct Score(pub ScoreLedger);

/// Zones and the win latch for the current run.
#[derive(Resource, Default)]
pub struct RaceState {
    pub zones: ZoneDetector,
    pub outcome: RaceOutcome,
}

/// Request to start the run over.
#[derive(Message, Debug, Clone, Copy)]
pub struct RestartRequested;

/// The car reached the finish.
#[derive(Event, Debug, Clone, Copy)]
pub struct RaceFinished {
    pub score: u32,
}

fn configure_zones(course: Res<Course>, mut race: ResMut<RaceState>) -> Result {
    let layout = &course.0;
    race.zones
        .configure(layout.start_center, layout.finish_center, layout.zone_radius)?;
    Ok(())
}

/// Charge penalties for contacts that started this step.
fn dispatch_collisions(
    mut collisions: MessageReader<CollisionStart>,
    cars: Query<Entity, With<Car>>,
    obstacles: Res<Obstacles>,
    mut score: ResMut<Score>,
) {
    let Ok(car) = cars.single() else {
        collisions.clear();
        return;
    };

    let now = web_time::Instant::now();
    for event in collisions.read() {
        let outcome = dispatch_contact(
            &car,
            &event.collider1,
            &event.collider2,
            &obstacles.0,
            &mut score.0,
            now,
        );
        if let ContactOutcome::Applied { id, penalty } = outcome {
            tracing::info!("Hit obstacle {id}: -{penalty}, score {}", score.0.score());
        }
    }
}

/// Latch the win when the car is inside the finish zone.
fn check_zones(
    mut commands: Commands,
    cars: Query<&Car>,
    mut race: ResMut<RaceState>,
    score: Res<Score>,
) {
    let Ok(car) = cars.single() else {
        return;
    };

    let status = race.zones.check(car.controller.position());
    if status.at_finish && race.outcome.record_finish() {
        commands.trigger(RaceFinished {
            score: score.0.score(),
        });
    }
}

fn on_race_finished(event: On<RaceFinished>) {
    tracing::info!("Finish reached with score {}", event.score);
}

/// Start the run over: score, latch, car and obstacles.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
fn restart_race(
    mut commands: Commands,
    mut requests: MessageReader<RestartRequested>,
    mut race: ResMut<RaceState>,
    mut score: ResMut<Score>,
    mut obstacles: ResMut<Obstacles>,
    mut cars: Query<(
        &mut Car,
        &mut Position,
        &mut Rotation,
        &mut LinearVelocity,
        &mut AngularVelocity,
    )>,
    bodies: Query<&ObstacleBody>,
    assets: Res<ObstacleAssets>,
    asset_server: Res<AssetServer>,
    material: Res<WorldMaterial>,
    course: Res<Course>,
) {
    if requests.read().count() == 0 {
        return;
    }

    race.outcome.reset();
    score.0.reset();

    for (mut car, mut position, mut rotation, mut linear, mut angular) in &mut cars {
        reset_car(
            &mut car,
            &mut position,
            &mut rotation,
            &mut linear,
            &mut angular,
            course.0.vehicle_spawn,
        );
    }

    respawn_layout(
        &mut commands,
        &mut obstacles,
        &assets,
        &asset_server,
        &material,
        &bodies,
    );

    tracing::info!("Race restarted");
}
