//! Start and finish zones, and the one-shot win latch.
//!
//! [`ZoneDetector`] is stateless: it reports containment every time it is
//! asked. Edge-triggering the finish is the job of [`RaceOutcome`].

use glam::Vec3;

use crate::error::{Error, Result};

/// Which zone a [`Zone`] marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneKind {
    Start,
    Finish,
}

/// A spherical region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zone {
    pub center: Vec3,
    pub radius: f32,
    pub kind: ZoneKind,
}

impl Zone {
    /// Whether `position` lies strictly inside the zone.
    pub fn contains(&self, position: Vec3) -> bool {
        self.center.distance(position) < self.radius
    }
}

/// Containment result for one query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZoneStatus {
    pub at_start: bool,
    pub at_finish: bool,
}

/// Tests positions against the start and finish zones.
#[derive(Clone, Debug, Default)]
pub struct ZoneDetector {
    start: Option<Zone>,
    finish: Option<Zone>,
}

impl ZoneDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place both zones.
    pub fn configure(&mut self, start: Vec3, finish: Vec3, radius: f32) -> Result<()> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::InvalidZone {
                detail: format!("radius must be positive and finite, got {radius}"),
            });
        }

        self.start = Some(Zone {
            center: start,
            radius,
            kind: ZoneKind::Start,
        });
        self.finish = Some(Zone {
            center: finish,
            radius,
            kind: ZoneKind::Finish,
        });
        Ok(())
    }

    pub fn zone(&self, kind: ZoneKind) -> Option<&Zone> {
        match kind {
            ZoneKind::Start => self.start.as_ref(),
            ZoneKind::Finish => self.finish.as_ref(),
        }
    }

    /// Report which zones contain `position`. Missing zones contain nothing.
    pub fn check(&self, position: Vec3) -> ZoneStatus {
        let inside = |zone: &Option<Zone>| zone.is_some_and(|zone| zone.contains(position));
        ZoneStatus {
            at_start: inside(&self.start),
            at_finish: inside(&self.finish),
        }
    }
}

/// Win latch for one play-through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RaceOutcome {
    won: bool,
}

impl RaceOutcome {
    /// Latch the win. Returns `true` only the first time.
    pub fn record_finish(&mut self) -> bool {
        !std::mem::replace(&mut self.won, true)
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn reset(&mut self) {
        self.won = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ZoneDetector {
        let mut detector = ZoneDetector::new();
        detector
            .configure(Vec3::new(0.0, 0.0, 35.0), Vec3::new(0.0, 0.0, -35.0), 3.0)
            .expect("valid radius");
        detector
    }

    #[test]
    fn test_boundary_is_excluded() {
        let detector = detector();
        assert!(!detector.check(Vec3::new(3.0, 0.0, -35.0)).at_finish);
        assert!(detector.check(Vec3::new(2.999, 0.0, -35.0)).at_finish);
    }

    #[test]
    fn test_reports_each_zone_independently() {
        let detector = detector();
        assert_eq!(
            detector.check(Vec3::new(0.0, 0.5, 35.0)),
            ZoneStatus {
                at_start: true,
                at_finish: false
            }
        );
        assert_eq!(detector.check(Vec3::ZERO), ZoneStatus::default());
    }

    #[test]
    fn test_reports_inside_on_every_query() {
        let detector = detector();
        let inside = Vec3::new(0.0, 0.5, -34.0);
        for _ in 0..3 {
            assert!(detector.check(inside).at_finish);
        }
    }

    #[test]
    fn test_unconfigured_detector_contains_nothing() {
        let detector = ZoneDetector::new();
        assert_eq!(detector.check(Vec3::ZERO), ZoneStatus::default());
        assert!(detector.zone(ZoneKind::Finish).is_none());
    }

    #[test]
    fn test_configure_rejects_bad_radius() {
        let mut detector = ZoneDetector::new();
        assert!(matches!(
            detector.configure(Vec3::ZERO, Vec3::ONE, 0.0),
            Err(Error::InvalidZone { .. })
        ));
        assert!(detector.configure(Vec3::ZERO, Vec3::ONE, f32::INFINITY).is_err());
        // A failed configure leaves the detector empty.
        assert!(detector.zone(ZoneKind::Start).is_none());
    }

    #[test]
    fn test_outcome_latches_once_until_reset() {
        let mut outcome = RaceOutcome::default();
        assert!(!outcome.is_won());
        assert!(outcome.record_finish());
        assert!(!outcome.record_finish());
        assert!(outcome.is_won());

        outcome.reset();
        assert!(!outcome.is_won());
        assert!(outcome.record_finish());
    }
}
