use thiserror::Error;

/// Errors returned when a subscription cannot be established.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("geolocation is not supported on this device")]
    Unsupported,

    #[error("position feed requires a tokio runtime")]
    NoRuntime,
}
