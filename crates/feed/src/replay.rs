//! Scripted provider that replays a recorded track.

use crate::error::FeedError;
use crate::fix::{FeedEvent, Fix, PositionError};
use crate::options::FeedOptions;
use crate::provider::{FeedCallback, PositionProvider, SubscriptionHandle, Subscriptions};
use serde::{Deserialize, Serialize};
use silentzone_geo::Coordinates;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// What a replay step delivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayEvent {
    Fix(Coordinates),
    Error(PositionError),
}

/// One step of a replayed track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayStep {
    /// Wait before delivering this step
    pub delay: Duration,
    pub event: ReplayEvent,
}

impl ReplayStep {
    pub fn fix(delay: Duration, coordinates: Coordinates) -> Self {
        Self {
            delay,
            event: ReplayEvent::Fix(coordinates),
        }
    }

    pub fn error(delay: Duration, error: PositionError) -> Self {
        Self {
            delay,
            event: ReplayEvent::Error(error),
        }
    }
}

/// Replays a fixed track once per subscription.
///
/// Fixes are stamped when delivered, so they always pass the max-age check.
/// A step delayed past the fix timeout produces timeout errors first, just
/// like a real device that goes quiet.
pub struct ReplayProvider {
    steps: Arc<[ReplayStep]>,
    subscriptions: Arc<Subscriptions>,
    finished: Arc<Notify>,
}

impl ReplayProvider {
    pub fn new(steps: Vec<ReplayStep>) -> Self {
        Self {
            steps: steps.into(),
            subscriptions: Arc::new(Subscriptions::default()),
            finished: Arc::new(Notify::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of subscriptions still replaying.
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Resolves once a subscription has delivered its whole track.
    pub async fn wait_finished(&self) {
        self.finished.notified().await;
    }
}

impl PositionProvider for ReplayProvider {
    fn subscribe(
        &self,
        options: FeedOptions,
        callback: FeedCallback,
    ) -> Result<SubscriptionHandle, FeedError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| FeedError::NoRuntime)?;
        let (handle, token) = self.subscriptions.register();

        tracing::info!(%handle, steps = self.steps.len(), "replay feed subscribed");

        let steps = Arc::clone(&self.steps);
        let finished = Arc::clone(&self.finished);
        let subscriptions = Arc::clone(&self.subscriptions);
        runtime.spawn(async move {
            let completed = replay(&steps, options, &callback, &token).await;
            subscriptions.finish(handle);
            if completed {
                tracing::info!(%handle, "replay finished");
                finished.notify_one();
            }
        });

        Ok(handle)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        if self.subscriptions.cancel(handle) {
            tracing::info!(%handle, "replay feed unsubscribed");
        }
    }
}

/// Returns false if cancelled before the end of the track.
async fn replay(
    steps: &[ReplayStep],
    options: FeedOptions,
    callback: &FeedCallback,
    token: &CancellationToken,
) -> bool {
    let timeout = options.timeout();

    for step in steps {
        let mut remaining = step.delay;
        if let Some(timeout) = timeout {
            while remaining > timeout {
                if !sleep_or_cancel(timeout, token).await {
                    return false;
                }
                callback(FeedEvent::Error(PositionError::Timeout(options.timeout_ms)));
                remaining -= timeout;
            }
        }
        if !sleep_or_cancel(remaining, token).await {
            return false;
        }

        match &step.event {
            ReplayEvent::Fix(coordinates) => callback(FeedEvent::Fix(Fix::now(*coordinates))),
            ReplayEvent::Error(error) => callback(FeedEvent::Error(error.clone())),
        }
    }

    true
}

async fn sleep_or_cancel(duration: Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        _ = token.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
