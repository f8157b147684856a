//! Transition notifications for SilentZone.
//!
//! On every enter/exit the `Notifier` plays a haptic pattern right away and
//! fetches a short reminder in the background. Fetch failures never escape:
//! they resolve to a static fallback line. Results land on the
//! `MessageBoard`, where a late answer for an older transition cannot
//! overwrite a newer one.

mod board;
mod gemini;
mod haptics;
mod notifier;
mod reminder;

pub use board::{BoardMessage, MessageBoard};
pub use gemini::{GeminiGenerator, DEFAULT_GEMINI_MODEL};
pub use haptics::{
    pattern_for, HapticOutput, LogHaptics, NullHaptics, RecordingHaptics, VibrationKind,
};
pub use notifier::{Notifier, NotifierSettings};
pub use reminder::{
    GenerateError, ReminderGenerator, ReminderMode, StaticGenerator, DEFAULT_SUBJECT,
    ENTER_FALLBACK, EXIT_FALLBACK,
};
