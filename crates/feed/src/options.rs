//! Subscription options.

use crate::fix::Fix;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options requested from the location provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedOptions {
    /// Ask the device for its most accurate positioning method
    pub enable_high_accuracy: bool,

    /// Oldest acceptable fix age, relative to subscription start (0 = no cached fixes)
    pub maximum_age_ms: u64,

    /// Maximum wait for a fix before surfacing a timeout error
    pub timeout_ms: u64,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            maximum_age_ms: 0,
            timeout_ms: 5000,
        }
    }
}

impl FeedOptions {
    /// Fix timeout. Zero disables it.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    /// Whether `fix` is fresh enough for a subscription started at
    /// `subscribed_at_ms`.
    pub fn accepts(&self, fix: &Fix, subscribed_at_ms: i64) -> bool {
        let max_age = i64::try_from(self.maximum_age_ms).unwrap_or(i64::MAX);
        fix.timestamp_ms.saturating_add(max_age) >= subscribed_at_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silentzone_geo::Coordinates;

    #[test]
    fn test_defaults() {
        let options = FeedOptions::default();
        assert!(options.enable_high_accuracy);
        assert_eq!(options.maximum_age_ms, 0);
        assert_eq!(options.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let options = FeedOptions {
            timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(options.timeout(), None);
    }

    #[test]
    fn test_rejects_cached_fixes_with_zero_max_age() {
        let options = FeedOptions::default();
        let origin = Coordinates::new(0.0, 0.0);
        assert!(!options.accepts(&Fix::at(origin, 999), 1000));
        assert!(options.accepts(&Fix::at(origin, 1000), 1000));
        assert!(options.accepts(&Fix::at(origin, 1500), 1000));
    }

    #[test]
    fn test_accepts_within_max_age() {
        let options = FeedOptions {
            maximum_age_ms: 300,
            ..Default::default()
        };
        let origin = Coordinates::new(0.0, 0.0);
        assert!(options.accepts(&Fix::at(origin, 700), 1000));
        assert!(!options.accepts(&Fix::at(origin, 699), 1000));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: FeedOptions = serde_json::from_str(r#"{"timeoutMs": 2000}"#).unwrap();
        assert_eq!(options.timeout_ms, 2000);
        assert!(options.enable_high_accuracy);
    }
}
