//! Feed extraction for Shunbun.
//!
//! A closed registry of feed formats. Each format pairs a matcher (cheap
//! content sniff) with a parser; [`classify`] runs the matchers in
//! declaration order and the first hit wins, so more specific formats always
//! register ahead of generic fallbacks. RSS is the only shipped format; the
//! enum keeps dispatch exhaustive when more are added.

pub mod rss;

use crate::error::ExtractError;
use crate::model::{Channel, Episode};

/// Request metadata that helps format detection.
#[derive(Debug, Clone, Default)]
pub struct ExtractorMeta {
    /// URL the content was fetched from, if known.
    pub url: Option<String>,
    /// Declared `content-type` of the response, if any.
    pub content_type: Option<String>,
}

/// Input to the extractor registry: the owning channel plus the raw feed body.
#[derive(Debug)]
pub struct ExtractorInput<'a> {
    pub channel: &'a Channel,
    pub content: &'a [u8],
    pub meta: ExtractorMeta,
}

/// The feed formats the registry knows, in match order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Rss,
}

impl FeedFormat {
    /// All formats, in registration order. First match wins.
    pub const ALL: &'static [FeedFormat] = &[FeedFormat::Rss];

    /// Whether this format claims the input.
    pub fn matches(&self, input: &ExtractorInput<'_>) -> bool {
        match self {
            FeedFormat::Rss => self::rss::matches(input),
        }
    }

    /// Parse the input into episodes. Callers should only invoke this for a
    /// format whose matcher claimed the input.
    pub fn parse(&self, input: &ExtractorInput<'_>) -> Result<Vec<Episode>, ExtractError> {
        match self {
            FeedFormat::Rss => self::rss::parse(input.channel, input.content),
        }
    }
}

/// Select the first format whose matcher claims the input.
pub fn classify(input: &ExtractorInput<'_>) -> Option<FeedFormat> {
    FeedFormat::ALL.iter().copied().find(|f| f.matches(input))
}

/// Classify and parse in one step.
pub fn extract(input: &ExtractorInput<'_>) -> Result<Vec<Episode>, ExtractError> {
    let format = classify(input).ok_or(ExtractError::UnsupportedContent)?;
    format.parse(input)
}
