//! Reminder text generation contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use silentzone_monitor::TransitionKind;
use thiserror::Error;

/// Fallback shown when entering and generation fails.
pub const ENTER_FALLBACK: &str = "Class started! Silence your phone.";

/// Fallback shown when leaving and generation fails.
pub const EXIT_FALLBACK: &str = "Class dismissed! Ringer back on.";

/// Subject used when a zone has none.
pub const DEFAULT_SUBJECT: &str = "Class";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMode {
    Enter,
    Exit,
}

impl ReminderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderMode::Enter => "enter",
            ReminderMode::Exit => "exit",
        }
    }

    pub fn fallback(&self) -> &'static str {
        match self {
            ReminderMode::Enter => ENTER_FALLBACK,
            ReminderMode::Exit => EXIT_FALLBACK,
        }
    }

    /// Prompt asking for a one-line reminder.
    pub fn prompt(&self, subject: &str) -> String {
        match self {
            ReminderMode::Enter => format!(
                "You are a helpful assistant for a {} teacher. They just entered the classroom. \
                 Write a very short, witty, one-sentence reminder (max 15 words) telling them to \
                 silence their phone immediately so they don't disrupt the class.",
                subject
            ),
            ReminderMode::Exit => format!(
                "You are a helpful assistant for a {} teacher. They just left the classroom. \
                 Write a very short, cheerful one-sentence message (max 15 words) telling them \
                 it's safe to turn their ringer back on.",
                subject
            ),
        }
    }
}

impl From<TransitionKind> for ReminderMode {
    fn from(kind: TransitionKind) -> Self {
        match kind {
            TransitionKind::Entered => ReminderMode::Enter,
            TransitionKind::Exited => ReminderMode::Exit,
        }
    }
}

impl std::fmt::Display for ReminderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Request(String),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("service returned no text")]
    EmptyResponse,

    #[error("generator is disabled")]
    Disabled,
}

/// External text-generation collaborator.
#[async_trait]
pub trait ReminderGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Produce a short reminder for `subject`. No retries.
    async fn generate(&self, subject: &str, mode: ReminderMode) -> Result<String, GenerateError>;
}

/// Generator for offline use: always defers to the static fallback.
pub struct StaticGenerator;

#[async_trait]
impl ReminderGenerator for StaticGenerator {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn generate(&self, _subject: &str, _mode: ReminderMode) -> Result<String, GenerateError> {
        Err(GenerateError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks() {
        assert_eq!(ReminderMode::Enter.fallback(), "Class started! Silence your phone.");
        assert_eq!(ReminderMode::Exit.fallback(), "Class dismissed! Ringer back on.");
    }

    #[test]
    fn test_prompt_mentions_subject() {
        let prompt = ReminderMode::Enter.prompt("Chemistry");
        assert!(prompt.contains("Chemistry teacher"));
        assert!(prompt.contains("silence their phone"));
        assert!(ReminderMode::Exit.prompt("Art").contains("ringer back on"));
    }

    #[test]
    fn test_mode_from_transition() {
        assert_eq!(ReminderMode::from(TransitionKind::Entered), ReminderMode::Enter);
        assert_eq!(ReminderMode::from(TransitionKind::Exited), ReminderMode::Exit);
    }

    #[tokio::test]
    async fn test_static_generator_always_fails() {
        let result = StaticGenerator.generate("Math", ReminderMode::Enter).await;
        assert_eq!(result, Err(GenerateError::Disabled));
    }
}
