//! Membership evaluation.
//!
//! Pure function of (position, zone set) - no I/O, no state.

use serde::{Deserialize, Serialize};
use silentzone_geo::{distance, is_inside, Coordinates, Zone};

/// Outcome of evaluating one sample against the zone set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// Closest zone center, horizontally
    pub nearest_zone: Option<Zone>,

    /// Distance to `nearest_zone` in meters
    pub nearest_distance: Option<f64>,

    /// The zone the position is inside of, if any
    pub active_zone: Option<Zone>,
}

impl EvaluationResult {
    pub fn is_inside(&self) -> bool {
        self.active_zone.is_some()
    }

    /// Status line for the distance readout, e.g. "33 meters to exit".
    pub fn distance_label(&self) -> String {
        let target = if self.is_inside() { "exit" } else { "class" };
        match self.nearest_distance {
            Some(d) => format!("{} meters to {}", d.round(), target),
            None => format!("--- meters to {}", target),
        }
    }
}

/// Evaluate `position` against `zones`.
///
/// Ties are resolved by zone order: the earliest zone wins both the nearest
/// slot (strict `<`) and the active slot (first containing zone). An absent
/// position or an empty zone set yields an all-none result.
pub fn evaluate(position: Option<&Coordinates>, zones: &[Zone]) -> EvaluationResult {
    let Some(position) = position else {
        return EvaluationResult::default();
    };

    let mut nearest: Option<(&Zone, f64)> = None;
    let mut active: Option<&Zone> = None;

    for zone in zones {
        let d = distance(position, &zone.coordinates);
        if d.is_finite() && nearest.map_or(true, |(_, best)| d < best) {
            nearest = Some((zone, d));
        }
        if active.is_none() && is_inside(position, zone) {
            active = Some(zone);
        }
    }

    EvaluationResult {
        nearest_zone: nearest.map(|(z, _)| z.clone()),
        nearest_distance: nearest.map(|(_, d)| d),
        active_zone: active.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silentzone_geo::ZoneDraft;

    fn zone(name: &str, lat: f64, lon: f64, radius: f64) -> Zone {
        ZoneDraft::new(name, "Math")
            .center(Coordinates::new(lat, lon))
            .radius(radius)
            .build()
            .unwrap()
    }

    #[test]
    fn test_absent_position_or_zones() {
        let zones = vec![zone("a", 0.0, 0.0, 50.0)];
        assert_eq!(evaluate(None, &zones), EvaluationResult::default());
        assert_eq!(
            evaluate(Some(&Coordinates::new(0.0, 0.0)), &[]),
            EvaluationResult::default()
        );
    }

    #[test]
    fn test_nearest_and_active() {
        let zones = vec![zone("far", 0.0, 0.01, 50.0), zone("near", 0.0, 0.0, 50.0)];
        let result = evaluate(Some(&Coordinates::new(0.0, 0.0003)), &zones);

        assert_eq!(result.nearest_zone.as_ref().unwrap().name, "near");
        assert!((result.nearest_distance.unwrap() - 33.36).abs() < 0.05);
        assert_eq!(result.active_zone.as_ref().unwrap().name, "near");
    }

    #[test]
    fn test_outside_still_reports_nearest() {
        let zones = vec![zone("a", 0.0, 0.0, 50.0)];
        let result = evaluate(Some(&Coordinates::new(0.0, 0.002)), &zones);

        assert!(!result.is_inside());
        assert_eq!(result.nearest_zone.unwrap().name, "a");
        assert!(result.nearest_distance.unwrap() > 200.0);
    }

    #[test]
    fn test_overlap_resolves_to_earliest_zone() {
        let zones = vec![
            zone("first", 0.0, 0.001, 500.0),
            zone("second", 0.0, 0.0, 500.0),
        ];
        let result = evaluate(Some(&Coordinates::new(0.0, 0.0)), &zones);

        assert_eq!(result.active_zone.unwrap().name, "first");
        assert_eq!(result.nearest_zone.unwrap().name, "second");
    }

    #[test]
    fn test_equal_distance_tie_keeps_first() {
        let zones = vec![zone("a", 0.0, 0.0, 10.0), zone("b", 0.0, 0.0, 10.0)];
        let result = evaluate(Some(&Coordinates::new(0.0, 0.002)), &zones);
        assert_eq!(result.nearest_zone.unwrap().name, "a");
    }

    #[test]
    fn test_malformed_zone_never_active() {
        let mut broken = zone("broken", 0.0, 0.0, 50.0);
        broken.radius = -1.0;
        let zones = vec![broken];

        let result = evaluate(Some(&Coordinates::new(0.0, 0.0)), &zones);
        assert!(result.active_zone.is_none());
        assert_eq!(result.nearest_zone.unwrap().name, "broken");
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let zones = vec![zone("a", 0.0, 0.0, 50.0), zone("b", 0.0, 0.0005, 50.0)];
        let here = Coordinates::new(0.0, 0.0002);
        assert_eq!(evaluate(Some(&here), &zones), evaluate(Some(&here), &zones));
    }

    #[test]
    fn test_distance_label() {
        let zones = vec![zone("a", 0.0, 0.0, 50.0)];
        let inside = evaluate(Some(&Coordinates::new(0.0, 0.0003)), &zones);
        assert_eq!(inside.distance_label(), "33 meters to exit");

        let outside = evaluate(Some(&Coordinates::new(0.0, 0.002)), &zones);
        assert_eq!(outside.distance_label(), "222 meters to class");

        assert_eq!(EvaluationResult::default().distance_label(), "--- meters to class");
    }
}
