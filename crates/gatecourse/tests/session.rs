//! Full play-throughs against a kinematic stand-in for the physics engine.

use std::{collections::HashMap, time::Duration};

use gatecourse::{
    BodyState, ContactOutcome, CourseLayout, DriveInput, ObstacleRegistry, RaceOutcome,
    ScoreLedger, VehicleController, VehicleTuning, ZoneDetector, dispatch_contact,
};
use glam::Vec3;
use web_time::Instant;

const DT: f32 = 1.0 / 60.0;

/// Horizontal distance below which the car touches an obstacle.
const CONTACT_RADIUS: f32 = 1.2;

/// Integrates velocity into position and reports car contacts.
#[derive(Default)]
struct KinematicWorld {
    bodies: HashMap<u32, BodyState>,
    next_handle: u32,
}

impl KinematicWorld {
    fn add(&mut self, body: BodyState) -> u32 {
        self.next_handle += 1;
        self.bodies.insert(self.next_handle, body);
        self.next_handle
    }

    fn remove(&mut self, handle: u32) {
        self.bodies.remove(&handle);
    }

    fn body_mut(&mut self, handle: u32) -> &mut BodyState {
        self.bodies.get_mut(&handle).expect("body exists")
    }

    fn step(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            body.position += body.linear_velocity * dt;
        }
    }

    /// Contacts that started this step, as `(a, b)` pairs.
    fn contacts(&self, car: u32, touching: &mut Vec<u32>) -> Vec<(u32, u32)> {
        let car_position = self.bodies[&car].position;
        let mut started = Vec::new();
        let mut now_touching = Vec::new();
        for (&handle, body) in &self.bodies {
            if handle == car {
                continue;
            }
            let offset = body.position - car_position;
            if Vec3::new(offset.x, 0.0, offset.z).length() < CONTACT_RADIUS {
                now_touching.push(handle);
                if !touching.contains(&handle) {
                    started.push((car, handle));
                }
            }
        }
        *touching = now_touching;
        started
    }
}

struct Session {
    layout: CourseLayout,
    world: KinematicWorld,
    car: u32,
    controller: VehicleController,
    obstacles: ObstacleRegistry<u32>,
    ledger: ScoreLedger,
    zones: ZoneDetector,
    outcome: RaceOutcome,
    touching: Vec<u32>,
    clock: Instant,
    finish_calls: u32,
    penalties: Vec<ContactOutcome>,
}

impl Session {
    fn new() -> Self {
        let layout = CourseLayout::default();
        let mut world = KinematicWorld::default();
        let mut controller = VehicleController::new(VehicleTuning::default());
        let car = world.add(controller.spawn_body(layout.vehicle_spawn));

        let mut obstacles = ObstacleRegistry::new();
        obstacles.populate(&CourseLayout::standard_obstacles(), |shape, base| {
            world.add(shape.spawn_body(base))
        });

        let mut zones = ZoneDetector::new();
        zones
            .configure(layout.start_center, layout.finish_center, layout.zone_radius)
            .expect("valid zones");

        Self {
            layout,
            world,
            car,
            controller,
            obstacles,
            ledger: ScoreLedger::default(),
            zones,
            outcome: RaceOutcome::default(),
            touching: Vec::new(),
            clock: Instant::now(),
            finish_calls: 0,
            penalties: Vec::new(),
        }
    }

    /// One frame: control, step, contacts, zones.
    fn frame(&mut self, input: DriveInput) {
        self.controller
            .update(self.world.body_mut(self.car), &input, DT);
        self.world.step(DT);
        self.controller.sync_visual(&self.world.bodies[&self.car]);
        self.clock += Duration::from_secs_f32(DT);

        for (a, b) in self.world.contacts(self.car, &mut self.touching) {
            let outcome =
                dispatch_contact(&self.car, &a, &b, &self.obstacles, &mut self.ledger, self.clock);
            if outcome != ContactOutcome::Ignored {
                self.penalties.push(outcome);
            }
        }

        let status = self.zones.check(self.controller.position());
        if status.at_finish && self.outcome.record_finish() {
            self.finish_calls += 1;
        }
    }

    fn restart(&mut self) {
        self.outcome.reset();
        self.ledger.reset();
        self.controller
            .reset(self.world.body_mut(self.car), self.layout.vehicle_spawn);

        let world = &mut self.world;
        for obstacle in self.obstacles.clear() {
            world.remove(*obstacle.body());
        }
        self.obstacles
            .populate(&CourseLayout::standard_obstacles(), |shape, base| {
                world.add(shape.spawn_body(base))
            });
        self.touching.clear();
        self.penalties.clear();
    }
}

fn throttle() -> DriveInput {
    DriveInput {
        forward: true,
        ..Default::default()
    }
}

fn brake() -> DriveInput {
    DriveInput {
        brake: true,
        ..Default::default()
    }
}

/// Drive straight until the finish latches. Returns the frame count.
fn drive_to_finish(session: &mut Session) -> usize {
    for frame in 0..1200 {
        session.frame(throttle());
        if session.outcome.is_won() {
            return frame;
        }
    }
    panic!(
        "never reached the finish; car at {}",
        session.controller.position()
    );
}

#[test]
fn test_starts_inside_start_zone() {
    let session = Session::new();
    let status = session.zones.check(session.controller.position());
    assert!(status.at_start);
    assert!(!status.at_finish);
    assert_eq!(session.obstacles.len(), 87);
}

#[test]
fn test_finish_fires_exactly_once() {
    let mut session = Session::new();
    let frames = drive_to_finish(&mut session);
    assert!(frames > 60, "finished implausibly fast: {frames} frames");
    assert_eq!(session.finish_calls, 1);

    // Come to a stop inside the finish zone and keep checking.
    for _ in 0..120 {
        session.frame(brake());
    }
    assert!(session.zones.check(session.controller.position()).at_finish);
    assert_eq!(session.controller.speed(), 0.0);
    assert_eq!(session.finish_calls, 1);
}

#[test]
fn test_cutting_straight_through_charges_each_obstacle_once() {
    let mut session = Session::new();
    drive_to_finish(&mut session);

    // Along x = 0 the car clips the boxes at z = 17 and z = -31, plus the
    // inner cone of each bend at x = ±1.
    let applied = session
        .penalties
        .iter()
        .filter(|outcome| matches!(outcome, ContactOutcome::Applied { .. }))
        .count();
    assert_eq!(applied, 6);
    assert_eq!(session.ledger.score(), 1000 - 2 * 25 - 4 * 10);
}

#[test]
fn test_car_stays_on_ground_while_driving() {
    let mut session = Session::new();
    let ground = session.controller.tuning().ground_level;
    for frame in 0..300 {
        let input = DriveInput {
            forward: true,
            left: frame % 90 < 30,
            right: frame % 90 >= 60,
            ..Default::default()
        };
        session.frame(input);
        let body = &session.world.bodies[&session.car];
        assert!(body.position.y >= ground - 1e-4);
        assert!(body.linear_velocity.y <= 0.0);
    }
}

#[test]
fn test_restart_resets_everything_and_ignores_old_obstacles() {
    let mut session = Session::new();
    drive_to_finish(&mut session);
    assert!(session.ledger.score() < 1000);
    let old_generation = session.obstacles.generation();
    let old_handle = *session.obstacles.all()[0].body();

    session.restart();

    assert!(!session.outcome.is_won());
    assert_eq!(session.ledger.score(), 1000);
    assert_eq!(session.controller.speed(), 0.0);
    let body = session.world.bodies[&session.car];
    assert_eq!(body.linear_velocity, Vec3::ZERO);
    assert_eq!(body.angular_velocity, Vec3::ZERO);
    assert!(body.yaw().abs() < 1e-6);
    assert!(session.controller.position().abs_diff_eq(session.layout.vehicle_spawn, 1e-6));

    assert_eq!(session.obstacles.len(), 87);
    assert_eq!(session.obstacles.generation(), old_generation + 1);

    // A late contact against a destroyed obstacle body does nothing.
    let outcome = dispatch_contact(
        &session.car,
        &session.car,
        &old_handle,
        &session.obstacles,
        &mut session.ledger,
        session.clock,
    );
    assert_eq!(outcome, ContactOutcome::Ignored);
    assert_eq!(session.ledger.score(), 1000);

    // And the finish can be won again.
    drive_to_finish(&mut session);
    assert_eq!(session.finish_calls, 2);
}
