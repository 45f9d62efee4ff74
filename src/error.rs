//! Error types for Shunbun.
//!
//! Each pipeline component has its own error enum so failure kinds stay
//! distinguishable by type; causes chain through `source()`. The crate-level
//! [`ShunbunError`] wraps all of them for callers that drive whole pipelines.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors from a single HTTP fetch.
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("request timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid header value for {name}")]
    InvalidHeader { name: String },
}

impl DownloadError {
    /// Whether this failure was the timeout cancellation firing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DownloadError::Timeout { .. })
    }
}

/// Errors from feed-format detection and parsing.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("unsupported content")]
    UnsupportedContent,

    #[error("RSS parse failed")]
    RssParse(#[source] rss::Error),
}

/// Errors from the crawl pipeline (download + extract).
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("download failed for {url}")]
    Download {
        url: String,
        #[source]
        source: DownloadError,
    },

    #[error("feed responded with status {status}")]
    BadStatus { status: reqwest::StatusCode },

    #[error("extraction failed")]
    Extract(#[from] ExtractError),
}

/// Errors from the local storage layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON encode failed for {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("entity is missing its identifying fields: {0}")]
    MissingKey(String),
}

/// Errors from recording episode media.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("unsupported streaming type {0:?}")]
    UnsupportedStreaming(crate::model::StreamingType),

    #[error("media download failed for {url}")]
    Download {
        url: String,
        #[source]
        source: DownloadError,
    },

    #[error("media responded with status {status}")]
    BadStatus { status: reqwest::StatusCode },

    #[error("media write failed at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("episode has no stream URL")]
    MissingStreamUrl,
}

/// Errors from splitting and transcribing stored media.
#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("external tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("media split failed: {0}")]
    Split(String),

    #[error("transcription API transport error")]
    ApiTransport(#[source] reqwest::Error),

    #[error("transcription API responded with status {status}")]
    ApiStatus { status: reqwest::StatusCode },

    #[error("transcription API returned an invalid body")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-level error type, wrapping every component failure.
#[derive(Error, Debug)]
pub enum ShunbunError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Transcribe(#[from] TranscribeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Shunbun operations.
pub type Result<T, E = ShunbunError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_timeout_is_distinguishable_by_kind() {
        let err = DownloadError::Timeout {
            after: Duration::from_secs(5),
        };
        assert!(err.is_timeout());
    }

    #[test]
    fn test_crawl_error_chains_cause() {
        let err = CrawlError::Download {
            url: "http://example.com/feed".into(),
            source: DownloadError::Timeout {
                after: Duration::from_secs(1),
            },
        };
        let cause = err.source().expect("cause should be attached");
        assert!(cause.to_string().contains("timed out"));
    }
}
