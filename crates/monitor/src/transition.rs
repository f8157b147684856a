//! Enter/exit detection across consecutive evaluations.

use crate::evaluate::EvaluationResult;
use serde::{Deserialize, Serialize};
use silentzone_geo::{Zone, ZoneId};

/// How a direct switch between two zones is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchPolicy {
    /// Only `Entered(B)` when moving from A straight into B.
    #[default]
    EnterOnly,

    /// `Exited(A)` followed by `Entered(B)`.
    ExitThenEnter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Entered,
    Exited,
}

/// A change of the active zone.
///
/// `seq` increases by one for every event a detector emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransitionEvent {
    Entered { zone: Zone, seq: u64 },
    Exited { zone: Zone, seq: u64 },
}

impl TransitionEvent {
    pub fn zone(&self) -> &Zone {
        match self {
            TransitionEvent::Entered { zone, .. } | TransitionEvent::Exited { zone, .. } => zone,
        }
    }

    pub fn seq(&self) -> u64 {
        match self {
            TransitionEvent::Entered { seq, .. } | TransitionEvent::Exited { seq, .. } => *seq,
        }
    }

    pub fn kind(&self) -> TransitionKind {
        match self {
            TransitionEvent::Entered { .. } => TransitionKind::Entered,
            TransitionEvent::Exited { .. } => TransitionKind::Exited,
        }
    }
}

/// Turns successive evaluation results into discrete transitions.
///
/// Only the active zone id is compared. The last active zone is kept whole
/// so an exit can be reported with the zone's data even when the registry
/// has changed since.
#[derive(Debug, Clone, Default)]
pub struct TransitionDetector {
    previous: Option<Zone>,
    policy: SwitchPolicy,
    last_seq: u64,
}

impl TransitionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: SwitchPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> SwitchPolicy {
        self.policy
    }

    pub fn previous_active_id(&self) -> Option<ZoneId> {
        self.previous.as_ref().map(|z| z.id)
    }

    /// Sequence number of the most recent event (0 if none yet).
    pub fn last_seq(&self) -> u64 {
        self.last_seq
    }

    /// Compare `result` with the previous evaluation and emit transitions.
    pub fn observe(&mut self, result: &EvaluationResult) -> Vec<TransitionEvent> {
        let current = result.active_zone.as_ref();

        let previous_id = self.previous_active_id();
        let current_id = current.map(|z| z.id);
        if previous_id == current_id {
            return Vec::new();
        }

        let mut events = Vec::new();
        match (self.previous.take(), current) {
            (Some(left), Some(entered)) => {
                if self.policy == SwitchPolicy::ExitThenEnter {
                    events.push(self.exited(left));
                }
                events.push(self.entered(entered.clone()));
            }
            (None, Some(entered)) => events.push(self.entered(entered.clone())),
            (Some(left), None) => events.push(self.exited(left)),
            (None, None) => {}
        }

        self.previous = current.cloned();
        events
    }

    /// Forget the active zone without emitting anything.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Adopt `result` as the previous evaluation without emitting anything.
    pub fn rebaseline(&mut self, result: &EvaluationResult) {
        self.previous = result.active_zone.clone();
    }

    fn entered(&mut self, zone: Zone) -> TransitionEvent {
        self.last_seq += 1;
        TransitionEvent::Entered {
            zone,
            seq: self.last_seq,
        }
    }

    fn exited(&mut self, zone: Zone) -> TransitionEvent {
        self.last_seq += 1;
        TransitionEvent::Exited {
            zone,
            seq: self.last_seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silentzone_geo::{Coordinates, ZoneDraft};

    fn zone(name: &str) -> Zone {
        ZoneDraft::new(name, "Math")
            .center(Coordinates::new(0.0, 0.0))
            .build()
            .unwrap()
    }

    fn active(zone: &Zone) -> EvaluationResult {
        EvaluationResult {
            nearest_zone: Some(zone.clone()),
            nearest_distance: Some(0.0),
            active_zone: Some(zone.clone()),
        }
    }

    fn outside() -> EvaluationResult {
        EvaluationResult::default()
    }

    #[test]
    fn test_enter_then_exit_once() {
        let a = zone("a");
        let mut detector = TransitionDetector::new();

        assert!(detector.observe(&outside()).is_empty());

        let events = detector.observe(&active(&a));
        assert_eq!(events, vec![TransitionEvent::Entered { zone: a.clone(), seq: 1 }]);

        assert!(detector.observe(&active(&a)).is_empty());
        assert!(detector.observe(&active(&a)).is_empty());

        let events = detector.observe(&outside());
        assert_eq!(events, vec![TransitionEvent::Exited { zone: a.clone(), seq: 2 }]);

        assert!(detector.observe(&outside()).is_empty());
    }

    #[test]
    fn test_exit_reports_retained_zone_data() {
        let a = zone("a");
        let mut detector = TransitionDetector::new();
        detector.observe(&active(&a));

        // Result no longer references the zone at all
        let events = detector.observe(&outside());
        assert_eq!(events[0].zone().name, "a");
        assert_eq!(events[0].kind(), TransitionKind::Exited);
    }

    #[test]
    fn test_direct_switch_enter_only() {
        let (a, b) = (zone("a"), zone("b"));
        let mut detector = TransitionDetector::new();
        detector.observe(&active(&a));

        let events = detector.observe(&active(&b));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), TransitionKind::Entered);
        assert_eq!(events[0].zone().id, b.id);
        assert_eq!(detector.previous_active_id(), Some(b.id));
    }

    #[test]
    fn test_direct_switch_exit_then_enter() {
        let (a, b) = (zone("a"), zone("b"));
        let mut detector = TransitionDetector::with_policy(SwitchPolicy::ExitThenEnter);
        detector.observe(&active(&a));

        let events = detector.observe(&active(&b));
        assert_eq!(
            events,
            vec![
                TransitionEvent::Exited { zone: a, seq: 2 },
                TransitionEvent::Entered { zone: b, seq: 3 },
            ]
        );
    }

    #[test]
    fn test_reset_is_silent() {
        let a = zone("a");
        let mut detector = TransitionDetector::new();
        detector.observe(&active(&a));

        detector.reset();
        assert_eq!(detector.previous_active_id(), None);

        // Detection resumes on the very next sample
        let events = detector.observe(&active(&a));
        assert_eq!(events, vec![TransitionEvent::Entered { zone: a, seq: 2 }]);
    }

    #[test]
    fn test_rebaseline_adopts_without_events() {
        let (a, b) = (zone("a"), zone("b"));
        let mut detector = TransitionDetector::new();
        detector.observe(&active(&a));

        detector.reset();
        detector.rebaseline(&active(&b));
        assert_eq!(detector.previous_active_id(), Some(b.id));
        assert_eq!(detector.last_seq(), 1);

        assert!(detector.observe(&active(&b)).is_empty());
        let events = detector.observe(&outside());
        assert_eq!(events, vec![TransitionEvent::Exited { zone: b, seq: 2 }]);
    }

    #[test]
    fn test_reset_then_outside_then_enter() {
        let a = zone("a");
        let mut detector = TransitionDetector::new();
        detector.observe(&active(&a));
        detector.reset();
        detector.rebaseline(&outside());

        assert!(detector.observe(&outside()).is_empty());
        let events = detector.observe(&active(&a));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), TransitionKind::Entered);
    }

    #[test]
    fn test_event_serialization() {
        let event = TransitionEvent::Entered { zone: zone("a"), seq: 7 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "entered");
        assert_eq!(json["seq"], 7);
        assert_eq!(json["zone"]["name"], "a");
    }
}
