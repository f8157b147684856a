//! Scenario files: zones plus a recorded track to replay.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use silentzone_feed::{PositionError, ReplayStep};
use silentzone_geo::{Coordinates, ZoneDraft};
use std::path::Path;
use std::time::Duration;

const DEFAULT_STEP_DELAY_MS: u64 = 1000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub zones: Vec<ZoneDraft>,
    pub track: Vec<TrackPoint>,
}

/// One track entry: either a fix or a feed error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPoint {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub delay_ms: Option<u64>,
    pub error: Option<String>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse scenario {}", path.display()))
    }

    pub fn steps(&self) -> Result<Vec<ReplayStep>> {
        self.track
            .iter()
            .enumerate()
            .map(|(i, point)| point.to_step().with_context(|| format!("track entry {}", i)))
            .collect()
    }
}

impl TrackPoint {
    pub fn to_step(&self) -> Result<ReplayStep> {
        let delay = Duration::from_millis(self.delay_ms.unwrap_or(DEFAULT_STEP_DELAY_MS));

        if let Some(error) = &self.error {
            return Ok(ReplayStep::error(delay, parse_error(error)?));
        }

        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            bail!("needs latitude and longitude, or an error");
        };
        let mut coordinates = Coordinates::new(latitude, longitude);
        if let Some(altitude) = self.altitude {
            coordinates = coordinates.with_altitude(altitude);
        }
        if !coordinates.is_valid() {
            bail!("coordinates out of range: {}, {}", latitude, longitude);
        }
        Ok(ReplayStep::fix(delay, coordinates))
    }
}

fn parse_error(name: &str) -> Result<PositionError> {
    Ok(match name.trim().to_ascii_lowercase().as_str() {
        "permission_denied" | "denied" => PositionError::PermissionDenied,
        "unavailable" => PositionError::Unavailable("replayed".to_string()),
        "unsupported" => PositionError::Unsupported,
        other => bail!("unknown position error: {}", other),
    })
}
