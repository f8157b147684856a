//! Geometry and data model for SilentZone.
//!
//! Pure domain logic: no I/O, no clocks, no platform dependencies.
//!
//! - `coords.rs`   - `Coordinates`, a single position fix
//! - `zone.rs`     - `Zone`, `ZoneId` and the `ZoneDraft` input form
//! - `distance.rs` - haversine distance and zone containment
//!
//! # Example
//!
//! ```
//! use silentzone_geo::{distance, is_inside, Coordinates, ZoneDraft};
//!
//! let center = Coordinates::new(0.0, 0.0);
//! let zone = ZoneDraft::new("Room 101", "Physics")
//!     .radius(50.0)
//!     .center(center)
//!     .build()
//!     .unwrap();
//!
//! let here = Coordinates::new(0.0, 0.0003);
//! assert!(distance(&here, &center) < 50.0);
//! assert!(is_inside(&here, &zone));
//! ```

mod coords;
mod distance;
mod error;
mod zone;

pub use coords::Coordinates;
pub use distance::{distance, is_inside, EARTH_RADIUS_M};
pub use error::{ZoneError, ZoneResult};
pub use zone::{Zone, ZoneDraft, ZoneId, DEFAULT_HEIGHT_TOLERANCE_M, DEFAULT_RADIUS_M};
