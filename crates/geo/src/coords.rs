//! Position fix coordinates.

use serde::{Deserialize, Serialize};

/// A single reported device position.
///
/// Latitude and longitude are in decimal degrees, altitude and its accuracy
/// in meters. Altitude is frequently unavailable indoors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,

    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,

    /// Altitude above the reference ellipsoid, if the device reported one
    #[serde(default)]
    pub altitude: Option<f64>,

    /// Vertical accuracy of `altitude`, if reported
    #[serde(default)]
    pub altitude_accuracy: Option<f64>,
}

impl Coordinates {
    /// Horizontal-only fix.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            altitude_accuracy: None,
        }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn with_altitude_accuracy(mut self, accuracy: f64) -> Self {
        self.altitude_accuracy = Some(accuracy);
        self
    }

    /// Returns true if latitude and longitude are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_bounds() {
        assert!(Coordinates::new(41.39, 2.17).is_valid());
        assert!(Coordinates::new(-90.0, 180.0).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, -180.5).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_deserialize_without_altitude() {
        let json = r#"{"latitude": 1.5, "longitude": -2.25}"#;
        let coords: Coordinates = serde_json::from_str(json).unwrap();
        assert_eq!(coords, Coordinates::new(1.5, -2.25));
    }

    #[test]
    fn test_serialize_camel_case() {
        let coords = Coordinates::new(0.0, 0.0)
            .with_altitude(10.0)
            .with_altitude_accuracy(3.0);
        let json = serde_json::to_string(&coords).unwrap();
        assert!(json.contains("\"altitudeAccuracy\":3.0"));
    }
}
