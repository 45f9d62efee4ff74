//! RSS feed handling.
//!
//! The matcher accepts a body whose declared content type maps to the `rss`
//! extension, or one that parses as an RSS document with at least one item.
//! The parser maps every feed item to an [`Episode`], tolerating the partial
//! metadata real-world podcast feeds ship.

use crate::error::ExtractError;
use crate::extract::ExtractorInput;
use crate::media_type;
use crate::model::{new_slug, Channel, Episode, StreamingType};
use chrono::{DateTime, Utc};
use rss::{Channel as RssChannel, Item as RssItem};
use tracing::debug;

/// Whether the input looks like an RSS feed.
pub(crate) fn matches(input: &ExtractorInput<'_>) -> bool {
    if let Some(content_type) = &input.meta.content_type {
        if media_type::extension_for_mime(content_type) == Some("rss") {
            return true;
        }
    }
    match RssChannel::read_from(input.content) {
        Ok(feed) => !feed.items().is_empty(),
        Err(_) => false,
    }
}

/// Parse an RSS body into episodes belonging to `channel`.
pub(crate) fn parse(channel: &Channel, content: &[u8]) -> Result<Vec<Episode>, ExtractError> {
    let feed = RssChannel::read_from(content).map_err(ExtractError::RssParse)?;

    let episodes: Vec<Episode> = feed
        .items()
        .iter()
        .map(|item| map_item(channel, item))
        .collect();

    debug!(
        channel = %channel.slug,
        count = episodes.len(),
        "extracted episodes from RSS feed"
    );

    Ok(episodes)
}

fn map_item(channel: &Channel, item: &RssItem) -> Episode {
    let their_id = item
        .guid()
        .map(|guid| guid.value().to_string())
        .unwrap_or_default();

    let description = item
        .itunes_ext()
        .and_then(|itunes| itunes.summary())
        .or_else(|| item.description())
        .unwrap_or_default()
        .to_string();

    let published_at = item
        .pub_date()
        .and_then(parse_pub_date)
        .unwrap_or_else(Utc::now);

    let (stream_url, expected_content_type) = match item.enclosure() {
        Some(enclosure) => (
            enclosure.url().to_string(),
            Some(enclosure.mime_type().to_string()).filter(|s| !s.is_empty()),
        ),
        None => (String::new(), None),
    };

    let duration = item
        .itunes_ext()
        .and_then(|itunes| itunes.duration())
        .and_then(parse_duration);

    Episode {
        slug: new_slug(),
        their_id,
        title: item.title().unwrap_or_default().to_string(),
        description,
        published_at,
        stream_url,
        streaming: StreamingType::Static,
        expected_content_type,
        duration,
        start_at: None,
        end_at: None,
        channel_slug: channel.slug.clone(),
    }
}

fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// Parse an itunes duration string into total seconds.
///
/// Accepts `H:MM:SS[.frac]`, `MM:SS`, and bare seconds. Malformed input is
/// `None`, never an error.
pub fn parse_duration(raw: &str) -> Option<f64> {
    let parts: Vec<&str> = raw.trim().split(':').collect();

    let mut values = Vec::with_capacity(parts.len());
    for part in &parts {
        let value: f64 = part.parse().ok()?;
        if value < 0.0 {
            return None;
        }
        values.push(value);
    }

    match values.as_slice() {
        [seconds] => Some(*seconds),
        [minutes, seconds] => Some(minutes * 60.0 + seconds),
        [hours, minutes, seconds] => Some(hours * 3600.0 + minutes * 60.0 + seconds),
        _ => None,
    }
}
