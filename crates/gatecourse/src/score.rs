//! Cooldown-gated penalty ledger.
//!
//! A sustained contact with one obstacle produces a burst of collision
//! events. The ledger charges each obstacle at most once per cooldown window,
//! measured in wall-clock time so the gate is independent of frame rate.

use std::{collections::HashMap, time::Duration};

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::obstacle::{ObstacleId, ObstacleKind};

/// Score parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Score at the start of every run.
    pub initial_score: u32,
    /// Minimum time between two penalties for the same obstacle.
    pub cooldown: Duration,
    pub cone_penalty: u32,
    pub box_penalty: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            initial_score: 1000,
            cooldown: Duration::from_millis(1000),
            cone_penalty: 10,
            box_penalty: 25,
        }
    }
}

impl ScoringRules {
    /// Points deducted for hitting an obstacle of this kind.
    pub fn penalty(&self, kind: ObstacleKind) -> u32 {
        match kind {
            ObstacleKind::Cone => self.cone_penalty,
            ObstacleKind::Box => self.box_penalty,
        }
    }
}

/// Running score for one play-through.
#[derive(Clone, Debug)]
pub struct ScoreLedger {
    rules: ScoringRules,
    score: u32,
    last_penalty: HashMap<ObstacleId, Instant>,
}

impl Default for ScoreLedger {
    fn default() -> Self {
        Self::new(ScoringRules::default())
    }
}

impl ScoreLedger {
    pub fn new(rules: ScoringRules) -> Self {
        Self {
            score: rules.initial_score,
            rules,
            last_penalty: HashMap::new(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Charge a penalty for hitting `id` at time `now`.
    ///
    /// Returns `false` without touching any state if the same obstacle was
    /// charged less than one cooldown ago.
    pub fn penalize(&mut self, id: ObstacleId, kind: ObstacleKind, now: Instant) -> bool {
        if let Some(&last) = self.last_penalty.get(&id)
            && now.saturating_duration_since(last) < self.rules.cooldown
        {
            tracing::trace!(%id, %kind, "penalty rejected by cooldown");
            return false;
        }

        let penalty = self.rules.penalty(kind);
        self.last_penalty.insert(id, now);
        self.score = self.score.saturating_sub(penalty);
        tracing::debug!(%id, %kind, penalty, score = self.score, "penalty applied");
        true
    }

    /// Restore the initial score and forget every cooldown.
    pub fn reset(&mut self) {
        self.score = self.rules.initial_score;
        self.last_penalty.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: u32) -> ObstacleId {
        ObstacleId {
            generation: 0,
            index,
        }
    }

    #[test]
    fn test_starts_at_initial_score() {
        assert_eq!(ScoreLedger::default().score(), 1000);
    }

    #[test]
    fn test_cooldown_rejects_repeat_within_window() {
        let mut ledger = ScoreLedger::default();
        let t0 = Instant::now();

        assert!(ledger.penalize(id(3), ObstacleKind::Cone, t0));
        assert_eq!(ledger.score(), 990);

        assert!(!ledger.penalize(id(3), ObstacleKind::Cone, t0 + Duration::from_millis(999)));
        assert_eq!(ledger.score(), 990);

        assert!(ledger.penalize(id(3), ObstacleKind::Cone, t0 + Duration::from_millis(1000)));
        assert_eq!(ledger.score(), 980);
    }

    #[test]
    fn test_rejected_penalty_does_not_extend_cooldown() {
        let mut ledger = ScoreLedger::default();
        let t0 = Instant::now();

        assert!(ledger.penalize(id(0), ObstacleKind::Box, t0));
        assert!(!ledger.penalize(id(0), ObstacleKind::Box, t0 + Duration::from_millis(600)));
        // Measured from the applied penalty, not the rejected one.
        assert!(ledger.penalize(id(0), ObstacleKind::Box, t0 + Duration::from_millis(1100)));
        assert_eq!(ledger.score(), 950);
    }

    #[test]
    fn test_cooldown_is_per_obstacle() {
        let mut ledger = ScoreLedger::default();
        let t0 = Instant::now();

        assert!(ledger.penalize(id(1), ObstacleKind::Cone, t0));
        assert!(ledger.penalize(id(2), ObstacleKind::Box, t0));
        assert_eq!(ledger.score(), 965);
    }

    #[test]
    fn test_same_index_in_new_generation_is_a_new_obstacle() {
        let mut ledger = ScoreLedger::default();
        let t0 = Instant::now();
        let fresh = ObstacleId {
            generation: 1,
            index: 0,
        };

        assert!(ledger.penalize(id(0), ObstacleKind::Cone, t0));
        assert!(ledger.penalize(fresh, ObstacleKind::Cone, t0));
    }

    #[test]
    fn test_score_floors_at_zero() {
        let mut ledger = ScoreLedger::new(ScoringRules {
            initial_score: 5,
            ..Default::default()
        });

        assert!(ledger.penalize(id(0), ObstacleKind::Box, Instant::now()));
        assert_eq!(ledger.score(), 0);

        assert!(ledger.penalize(id(1), ObstacleKind::Cone, Instant::now()));
        assert_eq!(ledger.score(), 0);
    }

    #[test]
    fn test_reset_restores_score_and_clears_cooldowns() {
        let mut ledger = ScoreLedger::default();
        let t0 = Instant::now();

        assert!(ledger.penalize(id(0), ObstacleKind::Box, t0));
        ledger.reset();
        assert_eq!(ledger.score(), 1000);

        // Immediately chargeable again.
        assert!(ledger.penalize(id(0), ObstacleKind::Box, t0 + Duration::from_millis(1)));
        assert_eq!(ledger.score(), 975);
    }
}
