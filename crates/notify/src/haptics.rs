//! Vibration patterns and haptic output.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Mutex;

/// Named vibration pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VibrationKind {
    #[default]
    None,
    Short,
    Medium,
    Long,
    Pulse,
    Alert,
}

impl VibrationKind {
    pub const ALL: [VibrationKind; 6] = [
        VibrationKind::None,
        VibrationKind::Short,
        VibrationKind::Medium,
        VibrationKind::Long,
        VibrationKind::Pulse,
        VibrationKind::Alert,
    ];

    /// Alternating vibrate/pause durations in milliseconds.
    pub fn pattern(&self) -> &'static [u32] {
        match self {
            VibrationKind::None => &[],
            VibrationKind::Short => &[200],
            VibrationKind::Medium => &[500],
            VibrationKind::Long => &[1000],
            VibrationKind::Pulse => &[200, 100, 200],
            VibrationKind::Alert => &[500, 200, 500, 200, 500],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VibrationKind::None => "No Vibration",
            VibrationKind::Short => "Short Buzz",
            VibrationKind::Medium => "Medium Buzz",
            VibrationKind::Long => "Long Buzz",
            VibrationKind::Pulse => "Pulse (Da-da)",
            VibrationKind::Alert => "High Alert",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            VibrationKind::None => "none",
            VibrationKind::Short => "short",
            VibrationKind::Medium => "medium",
            VibrationKind::Long => "long",
            VibrationKind::Pulse => "pulse",
            VibrationKind::Alert => "alert",
        }
    }
}

impl std::fmt::Display for VibrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for VibrationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VibrationKind::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown vibration pattern '{}'", s))
    }
}

/// Pattern lookup by key. Unknown keys yield an empty pattern.
pub fn pattern_for(key: &str) -> &'static [u32] {
    key.parse::<VibrationKind>()
        .map(|kind| kind.pattern())
        .unwrap_or(&[])
}

/// Device vibration output.
pub trait HapticOutput: Send + Sync {
    /// Play a vibrate/pause pattern. An empty pattern does nothing.
    fn play(&self, pattern: &[u32]);
}

/// Output for devices without a vibration motor.
pub struct NullHaptics;

impl HapticOutput for NullHaptics {
    fn play(&self, _pattern: &[u32]) {}
}

/// Output that logs patterns instead of vibrating.
pub struct LogHaptics;

impl HapticOutput for LogHaptics {
    fn play(&self, pattern: &[u32]) {
        if !pattern.is_empty() {
            tracing::info!(?pattern, "vibrate");
        }
    }
}

/// Output that records every played pattern.
#[derive(Default)]
pub struct RecordingHaptics {
    played: Mutex<Vec<Vec<u32>>>,
}

impl RecordingHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<Vec<u32>> {
        self.played.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl HapticOutput for RecordingHaptics {
    fn play(&self, pattern: &[u32]) {
        if pattern.is_empty() {
            return;
        }
        self.played
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(pattern.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_table() {
        assert_eq!(pattern_for("none"), &[] as &[u32]);
        assert_eq!(pattern_for("short"), &[200]);
        assert_eq!(pattern_for("medium"), &[500]);
        assert_eq!(pattern_for("long"), &[1000]);
        assert_eq!(pattern_for("pulse"), &[200, 100, 200]);
        assert_eq!(pattern_for("alert"), &[500, 200, 500, 200, 500]);
    }

    #[test]
    fn test_unknown_key_is_empty() {
        assert!(pattern_for("earthquake").is_empty());
        assert!(pattern_for("").is_empty());
    }

    #[test]
    fn test_patterns_alternate_and_start_with_vibration() {
        for kind in VibrationKind::ALL {
            let pattern = kind.pattern();
            assert!(pattern.is_empty() || pattern.len() % 2 == 1, "{kind}");
        }
    }

    #[test]
    fn test_parse_and_serde_agree() {
        for kind in VibrationKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.key()));
            assert_eq!(kind.key().parse::<VibrationKind>().unwrap(), kind);
        }
        assert_eq!("PULSE".parse::<VibrationKind>().unwrap(), VibrationKind::Pulse);
    }

    #[test]
    fn test_recording_skips_empty() {
        let haptics = RecordingHaptics::new();
        haptics.play(&[]);
        haptics.play(VibrationKind::Pulse.pattern());
        assert_eq!(haptics.played(), vec![vec![200, 100, 200]]);
    }
}
