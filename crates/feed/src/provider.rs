//! Provider trait for device positioning.
//!
//! This abstracts the platform location service, allowing the evaluation
//! path to stay pure and testable.

use crate::error::FeedError;
use crate::fix::FeedEvent;
use crate::options::FeedOptions;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Callback type for feed deliveries.
pub type FeedCallback = Arc<dyn Fn(FeedEvent) + Send + Sync + 'static>;

/// Identifies an active subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Source of position fixes.
pub trait PositionProvider: Send + Sync {
    /// Start delivering fixes and errors to `callback`.
    ///
    /// Deliveries for one subscription never overlap.
    fn subscribe(
        &self,
        options: FeedOptions,
        callback: FeedCallback,
    ) -> Result<SubscriptionHandle, FeedError>;

    /// Stop a subscription. Unknown handles are ignored.
    fn unsubscribe(&self, handle: SubscriptionHandle);
}

/// Cancellation tokens for live subscriptions, shared by the providers.
#[derive(Default)]
pub(crate) struct Subscriptions {
    next_id: AtomicU64,
    tokens: Mutex<HashMap<SubscriptionHandle, CancellationToken>>,
}

impl Subscriptions {
    pub(crate) fn register(&self) -> (SubscriptionHandle, CancellationToken) {
        let handle = SubscriptionHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        let token = CancellationToken::new();
        self.tokens
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(handle, token.clone());
        (handle, token)
    }

    pub(crate) fn cancel(&self, handle: SubscriptionHandle) -> bool {
        let token = self
            .tokens
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&handle);
        match token {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Forget a subscription whose task ended by itself.
    pub(crate) fn finish(&self, handle: SubscriptionHandle) {
        self.tokens
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&handle);
    }

    pub(crate) fn len(&self) -> usize {
        self.tokens.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        let tokens = self.tokens.get_mut().unwrap_or_else(|e| e.into_inner());
        for (_, token) in tokens.drain() {
            token.cancel();
        }
    }
}

/// Provider for platforms without geolocation support.
pub struct UnsupportedProvider;

impl PositionProvider for UnsupportedProvider {
    fn subscribe(
        &self,
        _options: FeedOptions,
        _callback: FeedCallback,
    ) -> Result<SubscriptionHandle, FeedError> {
        Err(FeedError::Unsupported)
    }

    fn unsubscribe(&self, _handle: SubscriptionHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_provider_refuses() {
        let callback: FeedCallback = Arc::new(|_| {});
        let result = UnsupportedProvider.subscribe(FeedOptions::default(), callback);
        assert_eq!(result, Err(FeedError::Unsupported));
    }

    #[test]
    fn test_subscriptions_cancel_once() {
        let subs = Subscriptions::default();
        let (a, token_a) = subs.register();
        let (b, _token_b) = subs.register();
        assert_ne!(a, b);
        assert_eq!(subs.len(), 2);

        assert!(subs.cancel(a));
        assert!(token_a.is_cancelled());
        assert!(!subs.cancel(a));
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn test_finished_subscription_is_forgotten() {
        let subs = Subscriptions::default();
        let (a, token_a) = subs.register();

        subs.finish(a);
        assert_eq!(subs.len(), 0);
        assert!(!token_a.is_cancelled());
        assert!(!subs.cancel(a));
    }
}
