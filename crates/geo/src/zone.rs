//! Zone definitions and the draft form used to create them.

use crate::coords::Coordinates;
use crate::error::{ZoneError, ZoneResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default zone radius in meters.
pub const DEFAULT_RADIUS_M: f64 = 25.0;

/// Default vertical tolerance in meters (roughly one floor).
pub const DEFAULT_HEIGHT_TOLERANCE_M: f64 = 4.0;

/// Opaque unique zone identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(uuid::Uuid);

impl ZoneId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ZoneId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A circular geofence, optionally bounded in altitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: ZoneId,

    /// Display name (e.g., "Room 204")
    pub name: String,

    /// Subject taught here, used for reminder messages
    pub subject: String,

    /// Radius in meters
    pub radius: f64,

    /// Center, captured from the device position at creation time
    pub coordinates: Coordinates,

    /// Whether the vertical check applies
    pub use_altitude: bool,

    /// Allowed altitude difference in meters when `use_altitude` is set
    pub height_tolerance: f64,
}

impl Zone {
    /// A zone with a non-positive or non-finite radius can never contain a
    /// position.
    pub fn is_well_formed(&self) -> bool {
        self.radius.is_finite() && self.radius > 0.0
    }

    /// Whether the vertical test can run for this zone at all.
    pub fn has_vertical_bound(&self) -> bool {
        self.use_altitude && self.coordinates.altitude.is_some()
    }
}

/// User input for a new zone.
///
/// Mirrors the zone form: name and subject are required, the center is the
/// device position at the time the user presses "add".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDraft {
    pub name: String,
    pub subject: String,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default)]
    pub center: Option<Coordinates>,
    #[serde(default)]
    pub use_altitude: bool,
    #[serde(default = "default_height_tolerance")]
    pub height_tolerance: f64,
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS_M
}

fn default_height_tolerance() -> f64 {
    DEFAULT_HEIGHT_TOLERANCE_M
}

impl ZoneDraft {
    pub fn new(name: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            radius: DEFAULT_RADIUS_M,
            center: None,
            use_altitude: false,
            height_tolerance: DEFAULT_HEIGHT_TOLERANCE_M,
        }
    }

    pub fn radius(mut self, meters: f64) -> Self {
        self.radius = meters;
        self
    }

    pub fn center(mut self, coordinates: Coordinates) -> Self {
        self.center = Some(coordinates);
        self
    }

    /// Enables the strict floor check with the given tolerance.
    pub fn altitude_bounded(mut self, height_tolerance: f64) -> Self {
        self.use_altitude = true;
        self.height_tolerance = height_tolerance;
        self
    }

    /// Validate the draft and mint a zone with a fresh id.
    pub fn build(self) -> ZoneResult<Zone> {
        if self.name.trim().is_empty() {
            return Err(ZoneError::MissingName);
        }
        if self.subject.trim().is_empty() {
            return Err(ZoneError::MissingSubject);
        }
        let Some(coordinates) = self.center else {
            return Err(ZoneError::MissingPosition);
        };
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ZoneError::InvalidRadius(self.radius));
        }
        if !(self.height_tolerance.is_finite() && self.height_tolerance >= 0.0) {
            return Err(ZoneError::InvalidHeightTolerance(self.height_tolerance));
        }

        Ok(Zone {
            id: ZoneId::new(),
            name: self.name,
            subject: self.subject,
            radius: self.radius,
            coordinates,
            use_altitude: self.use_altitude,
            height_tolerance: self.height_tolerance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ZoneDraft {
        ZoneDraft::new("Room 101", "Physics").center(Coordinates::new(0.0, 0.0))
    }

    #[test]
    fn test_build_applies_defaults() {
        let zone = draft().build().unwrap();
        assert_eq!(zone.radius, DEFAULT_RADIUS_M);
        assert_eq!(zone.height_tolerance, DEFAULT_HEIGHT_TOLERANCE_M);
        assert!(!zone.use_altitude);
    }

    #[test]
    fn test_build_mints_unique_ids() {
        let a = draft().build().unwrap();
        let b = draft().build().unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_build_rejects_missing_fields() {
        assert_eq!(
            ZoneDraft::new("  ", "Physics").center(Coordinates::new(0.0, 0.0)).build(),
            Err(ZoneError::MissingName)
        );
        assert_eq!(
            ZoneDraft::new("Room", "").center(Coordinates::new(0.0, 0.0)).build(),
            Err(ZoneError::MissingSubject)
        );
        assert_eq!(
            ZoneDraft::new("Room", "Physics").build(),
            Err(ZoneError::MissingPosition)
        );
    }

    #[test]
    fn test_build_rejects_bad_radius_and_tolerance() {
        assert_eq!(draft().radius(0.0).build(), Err(ZoneError::InvalidRadius(0.0)));
        assert!(matches!(
            draft().radius(f64::NAN).build(),
            Err(ZoneError::InvalidRadius(_))
        ));
        assert_eq!(
            draft().altitude_bounded(-1.0).build(),
            Err(ZoneError::InvalidHeightTolerance(-1.0))
        );
    }

    #[test]
    fn test_vertical_bound_requires_center_altitude() {
        let zone = draft().altitude_bounded(4.0).build().unwrap();
        assert!(!zone.has_vertical_bound());

        let zone = ZoneDraft::new("Room", "Physics")
            .center(Coordinates::new(0.0, 0.0).with_altitude(10.0))
            .altitude_bounded(4.0)
            .build()
            .unwrap();
        assert!(zone.has_vertical_bound());
    }

    #[test]
    fn test_draft_deserialize_defaults() {
        let json = r#"{"name": "Lab", "subject": "Chemistry"}"#;
        let draft: ZoneDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.radius, DEFAULT_RADIUS_M);
        assert!(draft.center.is_none());
    }
}
