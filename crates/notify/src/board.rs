//! Last-write-wins message display.

use serde::Serialize;
use silentzone_events::{event_names, EventBusRef, MessageSource, ReminderMessageEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// The message currently on display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardMessage {
    pub ticket: u64,
    pub text: String,
    pub source: MessageSource,
}

/// Holds the single displayed message.
///
/// Writers take a ticket when their message is requested, in transition
/// order, and post later. A post whose ticket is older than the displayed
/// one is discarded, so a slow reply for an earlier transition never
/// replaces the reply for a later one.
pub struct MessageBoard {
    next_ticket: AtomicU64,
    current: Mutex<Option<BoardMessage>>,
    bus: EventBusRef,
}

impl MessageBoard {
    pub fn new(bus: EventBusRef) -> Self {
        Self {
            next_ticket: AtomicU64::new(1),
            current: Mutex::new(None),
            bus,
        }
    }

    /// Reserve a slot for a message that will be posted later.
    pub fn reserve(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst)
    }

    /// Post the message for `ticket`. Returns false if it was stale.
    pub fn post(&self, ticket: u64, text: impl Into<String>, source: MessageSource) -> bool {
        let text = text.into();
        {
            let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(shown) = current.as_ref() {
                if shown.ticket > ticket {
                    tracing::debug!(ticket, shown = shown.ticket, "discarding stale message");
                    return false;
                }
            }
            *current = Some(BoardMessage {
                ticket,
                text: text.clone(),
                source,
            });
        }

        let event = ReminderMessageEvent::new(ticket, text, source);
        match serde_json::to_value(&event) {
            Ok(payload) => self.bus.emit(event_names::REMINDER_MESSAGE, payload),
            Err(e) => tracing::warn!("failed to serialize message event: {}", e),
        }
        true
    }

    pub fn current(&self) -> Option<BoardMessage> {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn text(&self) -> Option<String> {
        self.current().map(|m| m.text)
    }
}
