//! Reacts to zone transitions with haptics and a reminder message.

use crate::board::MessageBoard;
use crate::haptics::{HapticOutput, VibrationKind};
use crate::reminder::{ReminderGenerator, ReminderMode, DEFAULT_SUBJECT};
use serde::{Deserialize, Serialize};
use silentzone_events::MessageSource;
use silentzone_monitor::{TransitionEvent, TransitionKind};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Notification preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotifierSettings {
    pub entry_vibration: VibrationKind,
    pub exit_vibration: VibrationKind,
    /// Upper bound on a reminder fetch before falling back
    pub reminder_timeout_ms: u64,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            entry_vibration: VibrationKind::Pulse,
            exit_vibration: VibrationKind::Short,
            reminder_timeout_ms: 8000,
        }
    }
}

impl NotifierSettings {
    pub fn vibration_for(&self, kind: TransitionKind) -> VibrationKind {
        match kind {
            TransitionKind::Entered => self.entry_vibration,
            TransitionKind::Exited => self.exit_vibration,
        }
    }

    pub fn reminder_timeout(&self) -> Duration {
        Duration::from_millis(self.reminder_timeout_ms)
    }
}

/// Haptics now, reminder text later.
///
/// `notify` never blocks: the fetch runs as a detached task on the runtime
/// and only touches the message board when it completes.
pub struct Notifier {
    generator: Arc<dyn ReminderGenerator>,
    haptics: Arc<dyn HapticOutput>,
    board: Arc<MessageBoard>,
    settings: NotifierSettings,
    runtime: Handle,
}

impl Notifier {
    pub fn new(
        generator: Arc<dyn ReminderGenerator>,
        haptics: Arc<dyn HapticOutput>,
        board: Arc<MessageBoard>,
        settings: NotifierSettings,
        runtime: Handle,
    ) -> Self {
        Self {
            generator,
            haptics,
            board,
            settings,
            runtime,
        }
    }

    pub fn settings(&self) -> &NotifierSettings {
        &self.settings
    }

    pub fn board(&self) -> &Arc<MessageBoard> {
        &self.board
    }

    /// Handle one transition. The returned handle resolves once the
    /// message has been posted (or discarded as stale).
    pub fn notify(&self, event: &TransitionEvent) -> JoinHandle<()> {
        let ticket = self.board.reserve();
        self.notify_with_ticket(event, ticket)
    }

    /// Like `notify`, with a board ticket the caller reserved when the
    /// transition was detected.
    pub fn notify_with_ticket(&self, event: &TransitionEvent, ticket: u64) -> JoinHandle<()> {
        let kind = event.kind();
        let pattern = self.settings.vibration_for(kind).pattern();
        if !pattern.is_empty() {
            self.haptics.play(pattern);
        }

        let subject = match event.zone().subject.trim() {
            "" => DEFAULT_SUBJECT.to_string(),
            s => s.to_string(),
        };
        let mode = ReminderMode::from(kind);
        let generator = Arc::clone(&self.generator);
        let board = Arc::clone(&self.board);
        let timeout = self.settings.reminder_timeout();

        tracing::debug!(%mode, %subject, ticket, generator = generator.name(), "requesting reminder");

        self.runtime.spawn(async move {
            let (text, source) =
                match tokio::time::timeout(timeout, generator.generate(&subject, mode)).await {
                    Ok(Ok(text)) => (text, MessageSource::Generated),
                    Ok(Err(e)) => {
                        tracing::warn!(%mode, "reminder generation failed: {}", e);
                        (mode.fallback().to_string(), MessageSource::Fallback)
                    }
                    Err(_) => {
                        tracing::warn!(%mode, timeout_ms = timeout.as_millis() as u64, "reminder generation timed out");
                        (mode.fallback().to_string(), MessageSource::Fallback)
                    }
                };
            board.post(ticket, text, source);
        })
    }
}
