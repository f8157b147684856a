//! Shared event contracts for SilentZone.
//!
//! Defines the DTOs published on the event bus by the session. Using shared
//! types keeps producers and consumers agreeing on field names.
//!
//! Also provides the `EventBus` trait for decoupled event emission.

mod bus;

pub use bus::{EmittedEvent, EventBus, EventBusRef, InMemoryEventBus, LogEventBus, NullEventBus};

use serde::{Deserialize, Serialize};
use silentzone_geo::{Zone, ZoneId};

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Event emitted when the device enters or leaves a zone.
///
/// Producers: session (monitor path)
/// Consumers: frontend status view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneTransitionEvent {
    pub zone_id: ZoneId,
    pub name: String,
    pub subject: String,
    /// Transition sequence number.
    pub seq: u64,
    #[serde(default)]
    pub timestamp_ms: i64,
}

impl ZoneTransitionEvent {
    pub fn new(zone: &Zone, seq: u64) -> Self {
        Self {
            zone_id: zone.id,
            name: zone.name.clone(),
            subject: zone.subject.clone(),
            seq,
            timestamp_ms: now_ms(),
        }
    }
}

/// Where a displayed message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSource {
    /// Text-generation collaborator answered.
    Generated,
    /// Static text substituted after a generation failure.
    Fallback,
    /// Zone management status line.
    Status,
}

/// Event emitted when the displayed message changes.
///
/// Producers: notifier message board
/// Consumers: frontend status view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderMessageEvent {
    pub seq: u64,
    pub text: String,
    pub source: MessageSource,
    #[serde(default)]
    pub timestamp_ms: i64,
}

impl ReminderMessageEvent {
    pub fn new(seq: u64, text: impl Into<String>, source: MessageSource) -> Self {
        Self {
            seq,
            text: text.into(),
            source,
            timestamp_ms: now_ms(),
        }
    }
}

/// Event emitted while the position feed is failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionErrorEvent {
    /// Technical reason.
    pub error: String,
    /// Banner text for the user.
    pub message: String,
    #[serde(default)]
    pub timestamp_ms: i64,
}

impl PositionErrorEvent {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp_ms: now_ms(),
        }
    }
}

/// Compact zone description for list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSummary {
    pub id: ZoneId,
    pub name: String,
    pub subject: String,
    pub radius: f64,
    pub use_altitude: bool,
}

impl From<&Zone> for ZoneSummary {
    fn from(zone: &Zone) -> Self {
        Self {
            id: zone.id,
            name: zone.name.clone(),
            subject: zone.subject.clone(),
            radius: zone.radius,
            use_altitude: zone.use_altitude,
        }
    }
}

/// Event emitted after a zone is added or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonesChangedEvent {
    pub zones: Vec<ZoneSummary>,
}

/// Event emitted after every evaluated sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatusEvent {
    pub inside: bool,
    #[serde(default)]
    pub active_zone: Option<String>,
    #[serde(default)]
    pub nearest_zone: Option<String>,
    #[serde(default)]
    pub nearest_distance_m: Option<f64>,
    pub distance_label: String,
}

/// Event names as constants to prevent typos.
pub mod event_names {
    /// Device entered a zone.
    pub const ZONE_ENTERED: &str = "zone:entered";
    /// Device left a zone.
    pub const ZONE_EXITED: &str = "zone:exited";
    /// Zone list changed.
    pub const ZONES_CHANGED: &str = "zones:changed";
    /// Displayed message changed.
    pub const REMINDER_MESSAGE: &str = "reminder:message";
    /// Position feed failing.
    pub const POSITION_ERROR: &str = "position:error";
    /// Position feed delivering again after an error.
    pub const POSITION_RESTORED: &str = "position:restored";
    /// Evaluated status after a sample.
    pub const MONITOR_STATUS: &str = "monitor:status";
}
