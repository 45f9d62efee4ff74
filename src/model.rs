//! Core data model for Shunbun.
//!
//! Channels, episodes, stored media records, and transcripts. These are the
//! shapes persisted as JSON by the storage layer; relations between them are
//! carried by slugs and enforced by directory placement, not by a database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generate a fresh slug.
///
/// Slugs are UUIDv7 strings: globally unique and time-ordered, so sorting
/// them lexicographically sorts by creation time. They double as directory
/// names in the local store.
pub fn new_slug() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Lifecycle status of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    #[default]
    Active,
    Disabled,
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelStatus::Active => write!(f, "active"),
            ChannelStatus::Disabled => write!(f, "disabled"),
        }
    }
}

/// A podcast-like feed source being tracked.
///
/// Created once (admin action or first-crawl bootstrap) and immutable
/// afterwards except for `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    /// Primary key and top-level directory name.
    pub slug: String,
    /// Human-readable name.
    pub name: String,
    /// Feed URL the crawler fetches.
    pub crawl_url: String,
    /// Optional media base URL, when the feed host differs from the media host.
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub status: ChannelStatus,
}

impl Channel {
    /// Create a channel with a fresh slug.
    pub fn new(name: impl Into<String>, crawl_url: impl Into<String>) -> Self {
        Self {
            slug: new_slug(),
            name: name.into(),
            crawl_url: crawl_url.into(),
            media_url: None,
            status: ChannelStatus::Active,
        }
    }
}

/// How an episode's media is delivered.
///
/// Only `Static` (one-shot download) is implemented; `Live` is a declared
/// extension point that the recorder rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamingType {
    Static,
    Live,
}

/// One item extracted from a channel's feed.
///
/// `slug` is freshly generated on every extraction; identity for
/// deduplication is [`same_episode`], never the slug. Immutable once
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub slug: String,
    /// The source's own identifier (RSS GUID). Empty when the feed has none.
    pub their_id: String,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    /// Media URL from the enclosure. Empty when the item has no enclosure.
    pub stream_url: String,
    pub streaming: StreamingType,
    /// Content type declared by the enclosure, if any.
    #[serde(default)]
    pub expected_content_type: Option<String>,
    /// Duration in seconds, parsed from the feed's itunes duration.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    /// Owning channel.
    pub channel_slug: String,
}

/// Whether two episodes are the same item from the source's point of view.
///
/// A non-empty `their_id` is authoritative. Only when neither side carries
/// one does an exact, non-empty `stream_url` match count. Slugs never
/// participate: they are regenerated on every crawl.
pub fn same_episode(a: &Episode, b: &Episode) -> bool {
    if !a.their_id.is_empty() || !b.their_id.is_empty() {
        return !a.their_id.is_empty() && a.their_id == b.their_id;
    }
    !a.stream_url.is_empty() && a.stream_url == b.stream_url
}

/// Storage backend for a recorded artifact. Local filesystem only, for now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Local,
}

/// One persisted artifact of an episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageRecord {
    pub storage_type: StorageType,
    /// Backend key; for local storage, an absolute filesystem path.
    pub stored_key: String,
    pub stored_at: DateTime<Utc>,
}

/// Record of where an episode's media bytes were persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEpisode {
    pub episode_slug: String,
    pub stored: Vec<StorageRecord>,
}

/// A single transcribed span, with offsets relative to the whole media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// The merged transcription of one stored media artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub lang: String,
    pub segments: Vec<TranscriptSegment>,
}

/// The time-aligned transcription of an episode's stored media.
///
/// Treated as immutable once written; its existence marks the episode as
/// fully processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeTranscript {
    pub slug: String,
    pub episode_slug: String,
    pub transcripts: Vec<Transcript>,
    pub transcribed_at: DateTime<Utc>,
}
