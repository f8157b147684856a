//! User settings.
//!
//! Stored as JSON. A missing file is not an error, it just means defaults.
//! The API key is never written back to disk; it comes from the file or
//! from the environment.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use silentzone_feed::FeedOptions;
use silentzone_monitor::SwitchPolicy;
use silentzone_notify::{
    GeminiGenerator, NotifierSettings, ReminderGenerator, StaticGenerator, VibrationKind,
    DEFAULT_GEMINI_MODEL,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variables checked for an API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReminderSettings {
    pub model: String,
    pub timeout_ms: u64,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout_ms: 8000,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub feed: FeedOptions,
    pub entry_vibration: VibrationKind,
    pub exit_vibration: VibrationKind,
    pub switch_policy: SwitchPolicy,
    pub reminder: ReminderSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed: FeedOptions::default(),
            entry_vibration: VibrationKind::Pulse,
            exit_vibration: VibrationKind::Short,
            switch_policy: SwitchPolicy::default(),
            reminder: ReminderSettings::default(),
        }
    }
}

/// Default settings location.
///
/// - macOS: ~/Library/Application Support/silentzone/settings.json
/// - Linux: ~/.config/silentzone/settings.json
/// - Windows: %APPDATA%/silentzone/settings.json
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join("silentzone").join("settings.json"))
}

impl Settings {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load from the platform config directory.
    pub fn load_default() -> Result<Self, SettingsError> {
        match default_settings_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }

    /// Fill a missing API key from the environment.
    pub fn with_env_key(self) -> Self {
        self.with_key_from(|name| std::env::var(name).ok())
    }

    fn with_key_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.api_key().is_none() {
            self.reminder.api_key = API_KEY_VARS
                .iter()
                .filter_map(|name| lookup(name))
                .map(|key| key.trim().to_string())
                .find(|key| !key.is_empty());
        }
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.reminder
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn notifier_settings(&self) -> NotifierSettings {
        NotifierSettings {
            entry_vibration: self.entry_vibration,
            exit_vibration: self.exit_vibration,
            reminder_timeout_ms: self.reminder.timeout_ms,
        }
    }

    /// The Gemini client when a key is configured, otherwise the
    /// fallback-only generator.
    pub fn build_generator(&self) -> Arc<dyn ReminderGenerator> {
        match self.api_key() {
            Some(key) => {
                tracing::info!(model = %self.reminder.model, "using Gemini for reminders");
                Arc::new(GeminiGenerator::new(key).with_model(self.reminder.model.clone()))
            }
            None => {
                tracing::info!("no API key, reminders use fallback text");
                Arc::new(StaticGenerator)
            }
        }
    }
}
