//! Error types shared across the crate.
//!
//! Fetch, authentication and configuration errors are fatal for a run and
//! bubble up to `main`. Batch mutation errors are also `ClientError`s, but the
//! applier logs them and keeps going.

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::Collection;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Spotify answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("token refresh failed: {0}")]
    Refresh(String),

    /// Used by in-memory clients where no HTTP status is involved.
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("state mismatch: {received} != {expected}")]
    StateMismatch { received: String, expected: String },

    #[error("authorization denied by provider: {0}")]
    Provider(String),

    #[error("callback did not carry an authorization code")]
    MissingCode,

    #[error("couldn't get token: {0}")]
    Exchange(#[from] ClientError),

    #[error("cannot bind callback listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("callback listener stopped before login completed")]
    ChannelClosed,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no playlist named '{0}' found")]
    PlaylistNotFound(String),

    #[error("failed to list playlists: {0}")]
    ListPlaylists(#[source] ClientError),

    #[error("{}", describe_fetch_failures(.0))]
    Fetch(Vec<FetchFailure>),

    #[error("batch size must be between 1 and {max}, got {got}")]
    InvalidBatchSize { got: usize, max: usize },
}

/// A paginated fetch that aborted, tagged with the collection it was reading.
#[derive(Debug, Error)]
#[error("fetching {collection} failed: {source}")]
pub struct FetchFailure {
    pub collection: Collection,
    #[source]
    pub source: ClientError,
}

fn describe_fetch_failures(failures: &[FetchFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
