//! Zone monitoring for SilentZone.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer (pure)                     │
//! │  registry.rs   - ZoneRegistry, copy-on-write zone list      │
//! │  evaluate.rs   - nearest zone + active zone per sample      │
//! │  transition.rs - Entered/Exited detection across samples    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  monitor.rs    - ZoneMonitor: on_sample, add/remove zones   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use silentzone_geo::{Coordinates, ZoneDraft};
//! use silentzone_monitor::{TransitionEvent, ZoneMonitor};
//!
//! let mut monitor = ZoneMonitor::new();
//! let draft = ZoneDraft::new("Room 101", "Physics")
//!     .radius(50.0)
//!     .center(Coordinates::new(0.0, 0.0));
//! monitor.add_zone(draft).unwrap();
//!
//! let events = monitor.on_sample(Some(Coordinates::new(0.0, 0.0)));
//! assert!(matches!(events.as_slice(), [TransitionEvent::Entered { .. }]));
//! ```

mod evaluate;
mod monitor;
mod registry;
mod transition;

pub use evaluate::{evaluate, EvaluationResult};
pub use monitor::{MonitorSnapshot, ZoneMonitor};
pub use registry::ZoneRegistry;
pub use transition::{SwitchPolicy, TransitionDetector, TransitionEvent, TransitionKind};
