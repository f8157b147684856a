use silentzone_feed::FeedError;
use silentzone_geo::ZoneError;
use std::path::PathBuf;
use thiserror::Error;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("position feed: {0}")]
    Feed(#[from] FeedError),

    #[error("invalid zone: {0}")]
    Zone(#[from] ZoneError),

    #[error("session must be created inside a tokio runtime")]
    NoRuntime,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
