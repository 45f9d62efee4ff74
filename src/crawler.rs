//! Channel crawling: download a feed and extract its episodes.

use crate::downloader::{DownloadRequest, Downloaded, Downloader};
use crate::error::CrawlError;
use crate::extract::{self, ExtractorInput, ExtractorMeta};
use crate::model::{Channel, Episode};
use std::time::Duration;
use tracing::{info, instrument};

/// Result of one crawl: the channel together with its extracted episodes,
/// both unmodified. Deduplication happens later, at save time.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub channel: Channel,
    pub episodes: Vec<Episode>,
}

/// Drives download → extract for one channel at a time.
pub struct Crawler<'a> {
    downloader: &'a Downloader,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl<'a> Crawler<'a> {
    pub fn new(downloader: &'a Downloader) -> Self {
        Self {
            downloader,
            user_agent: None,
            timeout: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch the channel's feed and extract episodes from it.
    #[instrument(skip(self, channel), fields(channel = %channel.slug, url = %channel.crawl_url))]
    pub async fn run(&self, channel: &Channel) -> Result<CrawlOutcome, CrawlError> {
        let mut request = DownloadRequest::get(&channel.crawl_url);
        request.user_agent = self.user_agent.clone();
        request.wait_timeout = self.timeout;

        let downloaded =
            self.downloader
                .run(&request)
                .await
                .map_err(|source| CrawlError::Download {
                    url: channel.crawl_url.clone(),
                    source,
                })?;

        let outcome = handle_response(channel, &downloaded)?;
        info!(episodes = outcome.episodes.len(), "crawl finished");
        Ok(outcome)
    }
}

/// Gate on status, then hand the body to the extractor registry.
fn handle_response(channel: &Channel, downloaded: &Downloaded) -> Result<CrawlOutcome, CrawlError> {
    if !downloaded.is_success() {
        return Err(CrawlError::BadStatus {
            status: downloaded.status,
        });
    }

    let input = ExtractorInput {
        channel,
        content: &downloaded.body,
        meta: ExtractorMeta {
            url: Some(downloaded.url.clone()),
            content_type: downloaded.content_type().map(|s| s.to_string()),
        },
    };

    let episodes = extract::extract(&input)?;

    Ok(CrawlOutcome {
        channel: channel.clone(),
        episodes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
    use reqwest::StatusCode;

    fn channel() -> Channel {
        Channel::new("Morning News", "http://podcast.example/feed.xml")
    }

    fn response(status: StatusCode, content_type: Option<&str>, body: &[u8]) -> Downloaded {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_str(ct).unwrap());
        }
        Downloaded {
            url: "http://podcast.example/feed.xml".to_string(),
            status,
            headers,
            body: body.to_vec(),
        }
    }

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel><title>t</title>
    <item>
      <title>a</title><guid>g-1</guid>
      <itunes:duration>0:30</itunes:duration>
      <enclosure url="http://media.example/a.mp3" length="1" type="audio/mpeg"/>
    </item>
    <item>
      <title>b</title><guid>g-2</guid>
      <itunes:duration>1:00</itunes:duration>
      <enclosure url="http://media.example/b.mp3" length="1" type="audio/mpeg"/>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_two_item_feed_yields_two_episodes() {
        let ch = channel();
        let resp = response(
            StatusCode::OK,
            Some("application/rss+xml; charset=utf-8"),
            FEED.as_bytes(),
        );
        let outcome = handle_response(&ch, &resp).unwrap();
        assert_eq!(outcome.episodes.len(), 2);
        for episode in &outcome.episodes {
            assert_eq!(episode.channel_slug, ch.slug);
            assert_eq!(episode.streaming, crate::model::StreamingType::Static);
        }
        assert_eq!(outcome.episodes[0].duration, Some(30.0));
        assert_eq!(outcome.episodes[1].duration, Some(60.0));
    }

    #[test]
    fn test_bad_status_fails_without_extraction() {
        let ch = channel();
        // The body would extract fine; the status gate must fire first.
        let resp = response(
            StatusCode::NOT_FOUND,
            Some("application/rss+xml"),
            FEED.as_bytes(),
        );
        let err = handle_response(&ch, &resp).unwrap_err();
        assert!(matches!(
            err,
            CrawlError::BadStatus { status } if status == StatusCode::NOT_FOUND
        ));
    }

    #[test]
    fn test_unsupported_body_is_an_extract_error() {
        let ch = channel();
        let resp = response(StatusCode::OK, Some("text/html"), b"<html></html>");
        let err = handle_response(&ch, &resp).unwrap_err();
        assert!(matches!(
            err,
            CrawlError::Extract(ExtractError::UnsupportedContent)
        ));
    }
}
