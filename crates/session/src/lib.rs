//! SilentZone session wiring.
//!
//! A `Session` subscribes to a position provider, feeds every delivery
//! through the `ZoneMonitor`, and hands the resulting transitions to the
//! `Notifier`. Everything observable is published on the event bus.
//!
//! ```no_run
//! use silentzone_session::{Session, SessionParts, Settings};
//! use silentzone_events::LogEventBus;
//! use silentzone_feed::BroadcastProvider;
//! use silentzone_notify::LogHaptics;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load_default()?.with_env_key();
//! let provider = Arc::new(BroadcastProvider::new());
//! let session = Session::new(
//!     &settings,
//!     SessionParts {
//!         provider: provider.clone(),
//!         generator: settings.build_generator(),
//!         haptics: Arc::new(LogHaptics),
//!         bus: Arc::new(LogEventBus),
//!     },
//! )?;
//! session.start()?;
//! # Ok(())
//! # }
//! ```

mod error;
mod session;
mod settings;

pub use error::{SessionError, SessionResult, SettingsError};
pub use session::{added_message, Session, SessionParts, REMOVED_ACTIVE_MESSAGE};
pub use settings::{default_settings_path, ReminderSettings, Settings, API_KEY_VARS};
