//! Channel-backed provider fed by a device adapter.

use crate::error::FeedError;
use crate::fix::{FeedEvent, Fix, PositionError};
use crate::options::FeedOptions;
use crate::provider::{FeedCallback, PositionProvider, SubscriptionHandle, Subscriptions};
use silentzone_geo::Coordinates;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Default number of undelivered events kept per subscriber.
const DEFAULT_CAPACITY: usize = 16;

/// Sending half used by the platform adapter.
#[derive(Clone)]
pub struct FixSender {
    tx: broadcast::Sender<FeedEvent>,
}

impl FixSender {
    /// Push a fix acquired now. Returns false if nobody is subscribed.
    pub fn send(&self, coordinates: Coordinates) -> bool {
        self.send_fix(Fix::now(coordinates))
    }

    /// Push a fix with its own acquisition time.
    pub fn send_fix(&self, fix: Fix) -> bool {
        self.tx.send(FeedEvent::Fix(fix)).is_ok()
    }

    /// Report a provider failure (e.g., permission revoked).
    pub fn fail(&self, error: PositionError) -> bool {
        self.tx.send(FeedEvent::Error(error)).is_ok()
    }
}

/// Provider that fans adapter events out to every subscription.
///
/// A subscriber that falls behind skips to the newest events: only the
/// latest position matters.
pub struct BroadcastProvider {
    tx: broadcast::Sender<FeedEvent>,
    subscriptions: Arc<Subscriptions>,
}

impl Default for BroadcastProvider {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl BroadcastProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            subscriptions: Arc::new(Subscriptions::default()),
        }
    }

    /// Get a sender for the platform adapter.
    pub fn sender(&self) -> FixSender {
        FixSender {
            tx: self.tx.clone(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl PositionProvider for BroadcastProvider {
    fn subscribe(
        &self,
        options: FeedOptions,
        callback: FeedCallback,
    ) -> Result<SubscriptionHandle, FeedError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| FeedError::NoRuntime)?;

        let (handle, token) = self.subscriptions.register();
        let rx = self.tx.subscribe();
        let subscribed_at = chrono::Utc::now().timestamp_millis();

        tracing::info!(
            %handle,
            high_accuracy = options.enable_high_accuracy,
            timeout_ms = options.timeout_ms,
            maximum_age_ms = options.maximum_age_ms,
            "position feed subscribed"
        );

        let subscriptions = Arc::clone(&self.subscriptions);
        runtime.spawn(async move {
            run_subscription(handle, rx, options, subscribed_at, callback, token).await;
            subscriptions.finish(handle);
        });

        Ok(handle)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        if self.subscriptions.cancel(handle) {
            tracing::info!(%handle, "position feed unsubscribed");
        }
    }
}

async fn run_subscription(
    handle: SubscriptionHandle,
    mut rx: broadcast::Receiver<FeedEvent>,
    options: FeedOptions,
    subscribed_at: i64,
    callback: FeedCallback,
    token: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            _ = token.cancelled() => break,
            next = recv_within(&mut rx, options.timeout()) => next,
        };

        match next {
            None => {
                tracing::debug!(%handle, timeout_ms = options.timeout_ms, "no fix within timeout");
                callback(FeedEvent::Error(PositionError::Timeout(options.timeout_ms)));
            }
            Some(Ok(FeedEvent::Fix(fix))) => {
                if options.accepts(&fix, subscribed_at) {
                    callback(FeedEvent::Fix(fix));
                } else {
                    tracing::debug!(%handle, timestamp_ms = fix.timestamp_ms, "dropping cached fix");
                }
            }
            Some(Ok(FeedEvent::Error(error))) => {
                tracing::warn!(%handle, %error, "position provider error");
                callback(FeedEvent::Error(error));
            }
            Some(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                tracing::debug!(%handle, skipped, "position feed lagged, skipping to latest");
            }
            Some(Err(broadcast::error::RecvError::Closed)) => break,
        }
    }

    tracing::debug!(%handle, "position feed task stopped");
}

/// Next event, or `None` once `limit` passes without one.
async fn recv_within(
    rx: &mut broadcast::Receiver<FeedEvent>,
    limit: Option<Duration>,
) -> Option<Result<FeedEvent, broadcast::error::RecvError>> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, rx.recv()).await.ok(),
        None => Some(rx.recv().await),
    }
}
