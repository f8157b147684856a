//! Spherical distance and zone containment.

use crate::coords::Coordinates;
use crate::zone::Zone;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two fixes in meters (haversine).
///
/// Altitude is ignored. The result is exactly symmetric in its arguments and
/// zero when both fixes share latitude and longitude.
pub fn distance(a: &Coordinates, b: &Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    // abs() keeps the terms bit-identical when the arguments are swapped
    let delta_lat = (b.latitude - a.latitude).abs().to_radians();
    let delta_lon = (b.longitude - a.longitude).abs().to_radians();

    let sin_dlat = (delta_lat / 2.0).sin();
    let sin_dlon = (delta_lon / 2.0).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    // Rounding can push h slightly outside [0, 1] for near-identical points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Whether `current` lies inside `zone`.
///
/// The horizontal test always applies. The vertical test applies only when
/// the zone asks for it and both the fix and the zone center carry an
/// altitude; otherwise containment is decided on horizontal grounds alone.
pub fn is_inside(current: &Coordinates, zone: &Zone) -> bool {
    if !zone.is_well_formed() {
        return false;
    }

    let horizontal = distance(current, &zone.coordinates);
    if !horizontal.is_finite() || horizontal > zone.radius {
        return false;
    }

    if zone.has_vertical_bound() {
        if let (Some(here), Some(center)) = (current.altitude, zone.coordinates.altitude) {
            // NaN tolerance or NaN altitude fails the comparison and so the test
            if !((here - center).abs() <= zone.height_tolerance) {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::{Zone, ZoneId};

    fn zone(center: Coordinates, radius: f64) -> Zone {
        Zone {
            id: ZoneId::new(),
            name: "Room".to_string(),
            subject: "Math".to_string(),
            radius,
            coordinates: center,
            use_altitude: false,
            height_tolerance: 4.0,
        }
    }

    fn sample_points() -> Vec<Coordinates> {
        vec![
            Coordinates::new(0.0, 0.0),
            Coordinates::new(0.0, 0.0003),
            Coordinates::new(41.3874, 2.1686),
            Coordinates::new(48.8566, 2.3522),
            Coordinates::new(-33.8688, 151.2093),
            Coordinates::new(89.9999, -179.9999),
            Coordinates::new(-45.0, 179.9999),
        ]
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for p in sample_points() {
            assert_eq!(distance(&p, &p), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let points = sample_points();
        for a in &points {
            for b in &points {
                assert_eq!(distance(a, b), distance(b, a));
            }
        }
    }

    #[test]
    fn test_distance_known_values() {
        // 0.0003 degrees of longitude on the equator
        let d = distance(&Coordinates::new(0.0, 0.0), &Coordinates::new(0.0, 0.0003));
        assert!((d - 33.36).abs() < 0.05, "got {d}");

        let d = distance(&Coordinates::new(0.0, 0.0), &Coordinates::new(0.0, 0.002));
        assert!((d - 222.39).abs() < 0.05, "got {d}");

        // Barcelona to Paris, ~831 km
        let d = distance(
            &Coordinates::new(41.3874, 2.1686),
            &Coordinates::new(48.8566, 2.3522),
        );
        assert!((d - 831_000.0).abs() < 5_000.0, "got {d}");
    }

    #[test]
    fn test_distance_never_nan_for_near_identical_points() {
        let a = Coordinates::new(45.000000000001, 7.0);
        let b = Coordinates::new(45.0, 7.000000000001);
        let d = distance(&a, &b);
        assert!(d.is_finite());
        assert!(d >= 0.0);

        // Antipodes push h towards 1
        let d = distance(&Coordinates::new(0.0, 0.0), &Coordinates::new(0.0, 180.0));
        assert!(d.is_finite());
    }

    #[test]
    fn test_distance_ignores_altitude() {
        let a = Coordinates::new(10.0, 10.0).with_altitude(0.0);
        let b = Coordinates::new(10.0, 10.0).with_altitude(500.0);
        assert_eq!(distance(&a, &b), 0.0);
    }

    #[test]
    fn test_horizontal_containment_matches_distance() {
        let center = Coordinates::new(0.0, 0.0);
        let z = zone(center, 50.0);
        for p in sample_points() {
            assert_eq!(is_inside(&p, &z), distance(&p, &center) <= 50.0);
        }
    }

    #[test]
    fn test_boundary_is_inside() {
        let center = Coordinates::new(0.0, 0.0);
        let edge = Coordinates::new(0.0, 0.0003);
        let z = zone(center, distance(&edge, &center));
        assert!(is_inside(&edge, &z));
    }

    #[test]
    fn test_vertical_tolerance() {
        let center = Coordinates::new(0.0, 0.0).with_altitude(10.0);
        let mut z = zone(center, 50.0);
        z.use_altitude = true;
        z.height_tolerance = 4.0;

        assert!(!is_inside(&Coordinates::new(0.0, 0.0).with_altitude(20.0), &z));
        assert!(is_inside(&Coordinates::new(0.0, 0.0).with_altitude(12.0), &z));
        assert!(is_inside(&Coordinates::new(0.0, 0.0).with_altitude(14.0), &z));
        assert!(is_inside(&Coordinates::new(0.0, 0.0).with_altitude(6.0), &z));
    }

    #[test]
    fn test_vertical_test_skipped_without_altitude() {
        let mut z = zone(Coordinates::new(0.0, 0.0).with_altitude(10.0), 50.0);
        z.use_altitude = true;
        assert!(is_inside(&Coordinates::new(0.0, 0.0), &z));

        let mut z = zone(Coordinates::new(0.0, 0.0), 50.0);
        z.use_altitude = true;
        assert!(is_inside(&Coordinates::new(0.0, 0.0).with_altitude(100.0), &z));
    }

    #[test]
    fn test_vertical_ignored_when_disabled() {
        let z = zone(Coordinates::new(0.0, 0.0).with_altitude(10.0), 50.0);
        assert!(is_inside(&Coordinates::new(0.0, 0.0).with_altitude(100.0), &z));
    }

    #[test]
    fn test_horizontal_rejection_wins_over_altitude() {
        let mut z = zone(Coordinates::new(0.0, 0.0).with_altitude(10.0), 50.0);
        z.use_altitude = true;
        let far = Coordinates::new(0.0, 0.002).with_altitude(10.0);
        assert!(!is_inside(&far, &z));
    }

    #[test]
    fn test_malformed_zone_is_unreachable() {
        let center = Coordinates::new(0.0, 0.0);
        assert!(!is_inside(&center, &zone(center, 0.0)));
        assert!(!is_inside(&center, &zone(center, -5.0)));
        assert!(!is_inside(&center, &zone(center, f64::NAN)));
        assert!(!is_inside(&center, &zone(center, f64::INFINITY)));
        assert!(!is_inside(&Coordinates::new(f64::NAN, 0.0), &zone(center, 50.0)));
    }
}
