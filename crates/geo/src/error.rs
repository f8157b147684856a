//! Error types for zone construction.

use thiserror::Error;

/// Result type for zone operations.
pub type ZoneResult<T> = Result<T, ZoneError>;

/// Reasons a zone draft is rejected before it reaches the registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZoneError {
    /// Zone name is empty.
    #[error("zone name is required")]
    MissingName,

    /// Subject is empty.
    #[error("subject is required")]
    MissingSubject,

    /// No position fix was available to use as the zone center.
    #[error("current position is unknown - wait for a location fix")]
    MissingPosition,

    /// Radius is not a finite positive number of meters.
    #[error("invalid radius {0}m: must be greater than zero")]
    InvalidRadius(f64),

    /// Height tolerance is negative or not finite.
    #[error("invalid height tolerance {0}m: must be zero or more")]
    InvalidHeightTolerance(f64),
}
