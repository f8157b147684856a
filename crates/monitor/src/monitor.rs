//! Owned monitoring state: registry, detector and the last evaluation.

use crate::evaluate::{evaluate, EvaluationResult};
use crate::registry::ZoneRegistry;
use crate::transition::{SwitchPolicy, TransitionDetector, TransitionEvent};
use serde::Serialize;
use silentzone_feed::{FeedEvent, Fix, PositionError};
use silentzone_geo::{Coordinates, Zone, ZoneDraft, ZoneId, ZoneResult};

/// Read-only view for status display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSnapshot {
    pub zones: Vec<Zone>,
    pub position: Option<Coordinates>,
    pub result: EvaluationResult,
    /// Persistent banner while the position feed is failing
    pub banner: Option<String>,
}

/// Drives evaluation and transition detection, one sample at a time.
///
/// All mutation goes through `&mut self`: samples, feed errors and zone
/// management never interleave.
#[derive(Debug, Default)]
pub struct ZoneMonitor {
    registry: ZoneRegistry,
    detector: TransitionDetector,
    last_position: Option<Coordinates>,
    last_result: EvaluationResult,
    position_error: Option<PositionError>,
}

impl ZoneMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: SwitchPolicy) -> Self {
        Self {
            detector: TransitionDetector::with_policy(policy),
            ..Self::default()
        }
    }

    /// Evaluate a new sample. `None` means the position is explicitly
    /// unknown, which clears nearest and active state.
    pub fn on_sample(&mut self, position: Option<Coordinates>) -> Vec<TransitionEvent> {
        self.last_position = position;
        let zones = self.registry.snapshot();
        let result = evaluate(position.as_ref(), &zones);
        self.apply(result)
    }

    /// A successful fix also clears the error banner.
    pub fn on_fix(&mut self, fix: &Fix) -> Vec<TransitionEvent> {
        if let Some(error) = self.position_error.take() {
            tracing::info!(%error, "position feed recovered");
        }
        self.on_sample(Some(fix.coordinates))
    }

    /// Record a feed failure. Last known state is kept as is.
    pub fn on_position_error(&mut self, error: PositionError) {
        tracing::warn!(%error, "position unavailable");
        self.position_error = Some(error);
    }

    pub fn on_feed_event(&mut self, event: FeedEvent) -> Vec<TransitionEvent> {
        match event {
            FeedEvent::Fix(fix) => self.on_fix(&fix),
            FeedEvent::Error(error) => {
                self.on_position_error(error);
                Vec::new()
            }
        }
    }

    /// Re-run evaluation against the last known position, if any.
    pub fn reevaluate(&mut self) -> Vec<TransitionEvent> {
        match self.last_position {
            Some(position) => self.on_sample(Some(position)),
            None => Vec::new(),
        }
    }

    /// Validate and register a zone. A draft without a center takes the
    /// current position.
    pub fn add_zone(&mut self, mut draft: ZoneDraft) -> ZoneResult<Zone> {
        if draft.center.is_none() {
            draft.center = self.last_position;
        }
        let zone = draft.build()?;
        tracing::info!(zone = %zone.id, name = %zone.name, radius = zone.radius, "zone added");
        self.registry.add(zone.clone());
        Ok(zone)
    }

    /// Remove a zone. Removing the active zone resets the detector so no
    /// exit is reported for a zone that no longer exists; whatever still
    /// contains the last position becomes the baseline right away.
    pub fn remove_zone(&mut self, id: ZoneId) -> Option<Zone> {
        let removed = self.registry.remove(id)?;
        let was_active = self.detector.previous_active_id() == Some(id);
        tracing::info!(zone = %id, name = %removed.name, was_active, "zone removed");

        let zones = self.registry.snapshot();
        self.last_result = evaluate(self.last_position.as_ref(), &zones);
        if was_active {
            self.detector.reset();
            self.detector.rebaseline(&self.last_result);
        }
        Some(removed)
    }

    /// Whether `id` is the zone the detector currently considers active.
    pub fn is_active(&self, id: ZoneId) -> bool {
        self.detector.previous_active_id() == Some(id)
    }

    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    pub fn last_result(&self) -> &EvaluationResult {
        &self.last_result
    }

    pub fn last_position(&self) -> Option<Coordinates> {
        self.last_position
    }

    pub fn position_error(&self) -> Option<&PositionError> {
        self.position_error.as_ref()
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            zones: self.registry.iter().cloned().collect(),
            position: self.last_position,
            result: self.last_result.clone(),
            banner: self.position_error.as_ref().map(|e| e.user_message().to_string()),
        }
    }

    fn apply(&mut self, result: EvaluationResult) -> Vec<TransitionEvent> {
        let events = self.detector.observe(&result);
        for event in &events {
            tracing::info!(
                kind = ?event.kind(),
                zone = %event.zone().id,
                name = %event.zone().name,
                seq = event.seq(),
                "zone transition"
            );
        }
        tracing::debug!(
            active = ?result.active_zone.as_ref().map(|z| &z.name),
            nearest_m = ?result.nearest_distance,
            "sample evaluated"
        );
        self.last_result = result;
        events
    }
}
