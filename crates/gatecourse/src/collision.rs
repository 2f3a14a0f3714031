//! Routes vehicle contacts to the score ledger.

use web_time::Instant;

use crate::{
    obstacle::{ObstacleId, ObstacleRegistry},
    score::ScoreLedger,
};

/// What a single contact did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Not a vehicle-obstacle contact, or the obstacle is from an old layout.
    Ignored,
    /// The obstacle is still cooling down.
    Rejected(ObstacleId),
    /// A penalty was charged.
    Applied { id: ObstacleId, penalty: u32 },
}

/// Handle a contact between bodies `a` and `b`.
///
/// Only contacts between `vehicle` and a body in the current obstacle
/// generation are charged. Bodies the registry no longer knows resolve to
/// nothing and are ignored.
pub fn dispatch_contact<B: PartialEq>(
    vehicle: &B,
    a: &B,
    b: &B,
    registry: &ObstacleRegistry<B>,
    ledger: &mut ScoreLedger,
    now: Instant,
) -> ContactOutcome {
    let other = if a == vehicle {
        b
    } else if b == vehicle {
        a
    } else {
        return ContactOutcome::Ignored;
    };

    let Some((id, kind)) = registry.resolve(other) else {
        return ContactOutcome::Ignored;
    };

    if ledger.penalize(id, kind, now) {
        ContactOutcome::Applied {
            id,
            penalty: ledger.rules().penalty(kind),
        }
    } else {
        ContactOutcome::Rejected(id)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Vec3;

    use super::*;
    use crate::{
        course::ObstaclePlacement,
        obstacle::ObstacleKind,
    };

    const VEHICLE: u32 = 0;
    const WALL: u32 = 999;

    fn registry() -> ObstacleRegistry<u32> {
        let placements = [
            ObstaclePlacement::new(ObstacleKind::Cone, Vec3::new(6.0, 0.0, 33.0)),
            ObstaclePlacement::new(ObstacleKind::Box, Vec3::new(-2.0, 0.0, 28.0)),
        ];
        let mut registry = ObstacleRegistry::new();
        let mut next = 0;
        registry.populate(&placements, |_, _| {
            next += 1;
            next
        });
        registry
    }

    #[test]
    fn test_charges_in_either_order() {
        let registry = registry();
        let mut ledger = ScoreLedger::default();
        let now = Instant::now();

        let outcome = dispatch_contact(&VEHICLE, &VEHICLE, &1, &registry, &mut ledger, now);
        assert!(matches!(outcome, ContactOutcome::Applied { penalty: 10, .. }));

        let outcome = dispatch_contact(&VEHICLE, &2, &VEHICLE, &registry, &mut ledger, now);
        assert!(matches!(outcome, ContactOutcome::Applied { penalty: 25, .. }));
        assert_eq!(ledger.score(), 965);
    }

    #[test]
    fn test_ignores_non_vehicle_and_non_obstacle_contacts() {
        let registry = registry();
        let mut ledger = ScoreLedger::default();
        let now = Instant::now();

        // Obstacle against obstacle.
        assert_eq!(
            dispatch_contact(&VEHICLE, &1, &2, &registry, &mut ledger, now),
            ContactOutcome::Ignored
        );
        // Vehicle against a wall.
        assert_eq!(
            dispatch_contact(&VEHICLE, &VEHICLE, &WALL, &registry, &mut ledger, now),
            ContactOutcome::Ignored
        );
        assert_eq!(ledger.score(), 1000);
    }

    #[test]
    fn test_sustained_contact_is_rejected() {
        let registry = registry();
        let mut ledger = ScoreLedger::default();
        let now = Instant::now();

        dispatch_contact(&VEHICLE, &VEHICLE, &1, &registry, &mut ledger, now);
        let outcome = dispatch_contact(
            &VEHICLE,
            &VEHICLE,
            &1,
            &registry,
            &mut ledger,
            now + Duration::from_millis(16),
        );
        assert!(matches!(outcome, ContactOutcome::Rejected(_)));
        assert_eq!(ledger.score(), 990);
    }

    #[test]
    fn test_stale_bodies_are_ignored_after_reset() {
        let mut registry = registry();
        let mut ledger = ScoreLedger::default();

        let placements = [ObstaclePlacement::new(
            ObstacleKind::Cone,
            Vec3::new(6.0, 0.0, 33.0),
        )];
        registry.reset(&placements, |_, _| 100);

        let outcome =
            dispatch_contact(&VEHICLE, &VEHICLE, &1, &registry, &mut ledger, Instant::now());
        assert_eq!(outcome, ContactOutcome::Ignored);
        assert_eq!(ledger.score(), 1000);

        let outcome =
            dispatch_contact(&VEHICLE, &VEHICLE, &100, &registry, &mut ledger, Instant::now());
        assert!(matches!(
            outcome,
            ContactOutcome::Applied {
                id: ObstacleId { generation: 1, index: 0 },
                ..
            }
        ));
    }
}
