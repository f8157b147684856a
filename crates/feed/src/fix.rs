//! Fixes and feed errors as delivered to subscribers.

use serde::{Deserialize, Serialize};
use silentzone_geo::Coordinates;
use thiserror::Error;

/// Banner text shown while the feed is failing.
pub const LOCATION_SERVICES_MESSAGE: &str = "Please enable location services to use this app.";

/// Banner text shown when the platform has no geolocation at all.
pub const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported by your device.";

/// A position sample stamped with the time it was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub coordinates: Coordinates,

    /// Acquisition time in milliseconds since epoch
    pub timestamp_ms: i64,
}

impl Fix {
    /// A fix acquired now.
    pub fn now(coordinates: Coordinates) -> Self {
        Self::at(coordinates, chrono::Utc::now().timestamp_millis())
    }

    pub fn at(coordinates: Coordinates, timestamp_ms: i64) -> Self {
        Self {
            coordinates,
            timestamp_ms,
        }
    }
}

/// Why the feed could not deliver a position.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PositionError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("no position fix within {0}ms")]
    Timeout(u64),

    #[error("geolocation is not supported")]
    Unsupported,
}

impl PositionError {
    /// Text for the persistent, non-fatal banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            PositionError::Unsupported => UNSUPPORTED_MESSAGE,
            _ => LOCATION_SERVICES_MESSAGE,
        }
    }
}

/// A single delivery to a feed subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Fix(Fix),
    Error(PositionError),
}
