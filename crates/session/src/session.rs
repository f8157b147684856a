//! Session: the single control path from position fixes to notifications.

use crate::error::{SessionError, SessionResult};
use crate::settings::Settings;
use serde::Serialize;
use silentzone_events::{
    event_names, EventBusRef, MessageSource, MonitorStatusEvent, PositionErrorEvent,
    ZoneSummary, ZoneTransitionEvent, ZonesChangedEvent,
};
use silentzone_feed::{
    FeedCallback, FeedError, FeedEvent, FeedOptions, PositionError, PositionProvider,
    SubscriptionHandle,
};
use silentzone_monitor::{MonitorSnapshot, TransitionEvent, ZoneMonitor};
use silentzone_notify::{
    BoardMessage, HapticOutput, MessageBoard, Notifier, ReminderGenerator,
};
use silentzone_geo::{Zone, ZoneDraft, ZoneId};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Status line shown after a zone is added.
pub fn added_message(name: &str) -> String {
    format!("Added class: {}", name)
}

/// Status line shown after the active zone is removed.
pub const REMOVED_ACTIVE_MESSAGE: &str = "Class removed. Monitoring stopped.";

/// Collaborators a session is built from.
pub struct SessionParts {
    pub provider: Arc<dyn PositionProvider>,
    pub generator: Arc<dyn ReminderGenerator>,
    pub haptics: Arc<dyn HapticOutput>,
    pub bus: EventBusRef,
}

/// State shared with the feed callback.
struct Shared {
    monitor: Mutex<ZoneMonitor>,
    notifier: Notifier,
    bus: EventBusRef,
    /// Reminder fetches not yet awaited
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl Shared {
    fn monitor(&self) -> MutexGuard<'_, ZoneMonitor> {
        self.monitor.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Board tickets for `transitions`, in transition order. Taken while
    /// the monitor lock is held so tickets follow `seq`.
    fn reserve_tickets(&self, transitions: &[TransitionEvent]) -> Vec<u64> {
        let board = self.notifier.board();
        transitions.iter().map(|_| board.reserve()).collect()
    }

    fn handle_feed_event(&self, event: FeedEvent) {
        let (transitions, tickets, status, restored) = {
            let mut monitor = self.monitor();
            match event {
                FeedEvent::Fix(fix) => {
                    let had_error = monitor.position_error().is_some();
                    let transitions = monitor.on_fix(&fix);
                    let tickets = self.reserve_tickets(&transitions);
                    let status = status_of(&monitor);
                    (transitions, tickets, status, had_error)
                }
                FeedEvent::Error(error) => {
                    let first = monitor.position_error() != Some(&error);
                    monitor.on_position_error(error.clone());
                    drop(monitor);
                    if first {
                        self.publish_position_error(&error);
                    }
                    return;
                }
            }
        };

        if restored {
            self.emit(event_names::POSITION_RESTORED, &serde_json::json!({}));
        }
        self.emit(event_names::MONITOR_STATUS, &status);
        self.dispatch(&transitions, &tickets);
    }

    fn publish_position_error(&self, error: &PositionError) {
        let event = PositionErrorEvent::new(error.to_string(), error.user_message());
        self.emit(event_names::POSITION_ERROR, &event);
    }

    fn publish_zones(&self, zones: &[Zone]) {
        let event = ZonesChangedEvent {
            zones: zones.iter().map(ZoneSummary::from).collect(),
        };
        self.emit(event_names::ZONES_CHANGED, &event);
    }

    fn dispatch(&self, transitions: &[TransitionEvent], tickets: &[u64]) {
        if transitions.is_empty() {
            return;
        }
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.retain(|handle| !handle.is_finished());
        for (transition, &ticket) in transitions.iter().zip(tickets) {
            let topic = match transition {
                TransitionEvent::Entered { .. } => event_names::ZONE_ENTERED,
                TransitionEvent::Exited { .. } => event_names::ZONE_EXITED,
            };
            self.emit(topic, &ZoneTransitionEvent::new(transition.zone(), transition.seq()));
            pending.push(self.notifier.notify_with_ticket(transition, ticket));
        }
    }

    fn emit<T: Serialize>(&self, topic: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => self.bus.emit(topic, value),
            Err(e) => tracing::warn!(topic, "failed to serialize event: {}", e),
        }
    }
}

fn status_of(monitor: &ZoneMonitor) -> MonitorStatusEvent {
    let result = monitor.last_result();
    MonitorStatusEvent {
        inside: result.is_inside(),
        active_zone: result.active_zone.as_ref().map(|z| z.name.clone()),
        nearest_zone: result.nearest_zone.as_ref().map(|z| z.name.clone()),
        nearest_distance_m: result.nearest_distance,
        distance_label: result.distance_label(),
    }
}

/// Owns one monitoring session.
///
/// ```text
/// PositionProvider ──FeedEvent──► ZoneMonitor ──TransitionEvent──► Notifier
///                                     │                              │
///                                     └──────── EventBus ◄───────────┘
/// ```
///
/// Every feed delivery and every zone edit takes the monitor lock, so
/// evaluations never overlap. Reminder fetches run on the runtime and only
/// touch the message board.
pub struct Session {
    shared: Arc<Shared>,
    board: Arc<MessageBoard>,
    provider: Arc<dyn PositionProvider>,
    feed_options: FeedOptions,
    subscription: Mutex<Option<SubscriptionHandle>>,
}

impl Session {
    /// Build a session. Must be called within a tokio runtime.
    pub fn new(settings: &Settings, parts: SessionParts) -> SessionResult<Self> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let board = Arc::new(MessageBoard::new(parts.bus.clone()));
        let notifier = Notifier::new(
            parts.generator,
            parts.haptics,
            Arc::clone(&board),
            settings.notifier_settings(),
            runtime,
        );

        let shared = Arc::new(Shared {
            monitor: Mutex::new(ZoneMonitor::with_policy(settings.switch_policy)),
            notifier,
            bus: parts.bus,
            pending: Mutex::new(Vec::new()),
        });

        Ok(Self {
            shared,
            board,
            provider: parts.provider,
            feed_options: settings.feed,
            subscription: Mutex::new(None),
        })
    }

    /// Subscribe to the position feed. Calling it twice is a no-op.
    pub fn start(&self) -> SessionResult<()> {
        let mut subscription = self.subscription.lock().unwrap_or_else(|e| e.into_inner());
        if subscription.is_some() {
            return Ok(());
        }

        let shared = Arc::clone(&self.shared);
        let callback: FeedCallback = Arc::new(move |event| shared.handle_feed_event(event));

        match self.provider.subscribe(self.feed_options, callback) {
            Ok(handle) => {
                tracing::info!(%handle, "monitoring started");
                *subscription = Some(handle);
                Ok(())
            }
            Err(e) => {
                if e == FeedError::Unsupported {
                    let error = PositionError::Unsupported;
                    self.shared.monitor().on_position_error(error.clone());
                    self.shared.publish_position_error(&error);
                }
                Err(e.into())
            }
        }
    }

    /// Tear the feed down. In-flight reminders still land on the board.
    pub fn stop(&self) {
        let handle = self
            .subscription
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            self.provider.unsubscribe(handle);
            tracing::info!(%handle, "monitoring stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.subscription
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Register a zone and evaluate it against the last known position.
    pub fn add_zone(&self, draft: ZoneDraft) -> SessionResult<Zone> {
        let (zone, zones, transitions, status_ticket, tickets, status) = {
            let mut monitor = self.shared.monitor();
            let zone = monitor.add_zone(draft)?;
            let transitions = monitor.reevaluate();
            let status_ticket = self.board.reserve();
            let tickets = self.shared.reserve_tickets(&transitions);
            let zones = monitor.registry().snapshot();
            (zone, zones, transitions, status_ticket, tickets, status_of(&monitor))
        };

        self.board
            .post(status_ticket, added_message(&zone.name), MessageSource::Status);
        self.shared.publish_zones(&zones);
        self.shared.emit(event_names::MONITOR_STATUS, &status);
        self.shared.dispatch(&transitions, &tickets);
        Ok(zone)
    }

    /// Register a zone centered on the last known position.
    pub fn add_zone_here(&self, mut draft: ZoneDraft) -> SessionResult<Zone> {
        draft.center = None;
        self.add_zone(draft)
    }

    /// Remove a zone. Unknown ids are ignored.
    pub fn remove_zone(&self, id: ZoneId) -> Option<Zone> {
        let (removed, status_ticket, zones, status) = {
            let mut monitor = self.shared.monitor();
            let was_active = monitor.is_active(id);
            let removed = monitor.remove_zone(id)?;
            let status_ticket = was_active.then(|| self.board.reserve());
            let zones = monitor.registry().snapshot();
            (removed, status_ticket, zones, status_of(&monitor))
        };

        if let Some(ticket) = status_ticket {
            self.board
                .post(ticket, REMOVED_ACTIVE_MESSAGE, MessageSource::Status);
        }
        self.shared.publish_zones(&zones);
        self.shared.emit(event_names::MONITOR_STATUS, &status);
        Some(removed)
    }

    pub fn zones(&self) -> Vec<Zone> {
        self.shared.monitor().registry().iter().cloned().collect()
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        self.shared.monitor().snapshot()
    }

    /// The message currently displayed.
    pub fn message(&self) -> Option<BoardMessage> {
        self.board.current()
    }

    pub fn board(&self) -> &Arc<MessageBoard> {
        &self.board
    }

    /// Wait for every reminder fetch dispatched so far.
    pub async fn flush(&self) {
        let pending: Vec<_> = self
            .shared
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect();
        for handle in pending {
            if let Err(e) = handle.await {
                tracing::warn!("reminder task failed: {}", e);
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}
