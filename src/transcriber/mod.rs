//! Transcription module for Shunbun.
//!
//! Splits stored media into fixed-length chunks with ffmpeg, posts each
//! chunk to the remote speech-to-text API in order, and merges the per-chunk
//! results into one whole-file transcript. Chunks are transcribed strictly
//! sequentially to bound concurrent load on the remote API.

mod api;
mod split;

pub use api::{ApiTranscription, HttpSpeechApi, SpeechApi};
pub use split::split_media;

use crate::error::TranscribeError;
use crate::model::{new_slug, EpisodeTranscript, StorageRecord, StoredEpisode, Transcript, TranscriptSegment};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Default chunk length, in seconds.
pub const SPLIT_SECONDS: u32 = 30;

/// Produces transcripts from stored episode media.
pub struct Transcriber {
    api: Arc<dyn SpeechApi>,
    split_seconds: u32,
    lang: String,
    temp_root: PathBuf,
}

impl Transcriber {
    /// Create a transcriber that keeps its chunk workspaces under `temp_root`.
    pub fn new(api: Arc<dyn SpeechApi>, temp_root: impl Into<PathBuf>) -> Self {
        Self {
            api,
            split_seconds: SPLIT_SECONDS,
            lang: "ja".to_string(),
            temp_root: temp_root.into(),
        }
    }

    pub fn with_split_seconds(mut self, split_seconds: u32) -> Self {
        self.split_seconds = split_seconds;
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Transcribe every stored artifact of an episode.
    ///
    /// Any chunk failure aborts the whole episode; no partial transcript is
    /// ever returned.
    #[instrument(skip(self, stored), fields(episode = %stored.episode_slug))]
    pub async fn run(&self, stored: &StoredEpisode) -> Result<EpisodeTranscript, TranscribeError> {
        let mut transcripts = Vec::with_capacity(stored.stored.len());
        for record in &stored.stored {
            transcripts.push(self.transcribe_artifact(record).await?);
        }

        Ok(EpisodeTranscript {
            slug: new_slug(),
            episode_slug: stored.episode_slug.clone(),
            transcripts,
            transcribed_at: Utc::now(),
        })
    }

    async fn transcribe_artifact(
        &self,
        record: &StorageRecord,
    ) -> Result<Transcript, TranscribeError> {
        std::fs::create_dir_all(&self.temp_root)?;
        // Uniquely named workspace; removed recursively when dropped, on the
        // success and failure paths alike.
        let workspace = tempfile::Builder::new()
            .prefix("transcribe-")
            .tempdir_in(&self.temp_root)?;

        let source = Path::new(&record.stored_key);
        let chunks = split_media(source, workspace.path(), self.split_seconds).await?;
        info!(chunks = chunks.len(), source = %source.display(), "split media for transcription");

        let mut results = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let outcome = self.transcribe_chunk_file(chunk).await;
            // Chunks are not small; reclaim each one right after its API
            // call, whatever the outcome was.
            if let Err(e) = std::fs::remove_file(chunk) {
                warn!(chunk = %chunk.display(), error = %e, "failed to remove chunk file");
            }
            results.push(outcome?);
        }

        Ok(merge_chunks(&results, self.split_seconds))
    }

    async fn transcribe_chunk_file(
        &self,
        chunk: &Path,
    ) -> Result<ApiTranscription, TranscribeError> {
        let bytes = tokio::fs::read(chunk).await?;
        let filename = chunk
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("chunk.wav");
        self.api.transcribe_chunk(bytes, filename, &self.lang).await
    }
}

/// Merge per-chunk transcriptions into one whole-file transcript.
///
/// Chunk `i` covers `[i * split_seconds, (i + 1) * split_seconds)` of the
/// source, so its segments shift by `i * split_seconds`. Texts concatenate
/// in chunk order with no separator; the language comes from the first chunk.
pub fn merge_chunks(chunks: &[ApiTranscription], split_seconds: u32) -> Transcript {
    let mut text = String::new();
    let mut segments = Vec::new();

    for (index, chunk) in chunks.iter().enumerate() {
        let offset = index as f64 * f64::from(split_seconds);
        text.push_str(&chunk.text);
        for segment in &chunk.segments {
            segments.push(TranscriptSegment {
                text: segment.text.clone(),
                start: segment.start + offset,
                end: segment.end + offset,
            });
        }
    }

    let lang = chunks
        .first()
        .map(|chunk| chunk.lang.clone())
        .unwrap_or_default();

    Transcript {
        text,
        lang,
        segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, lang: &str, segments: &[(f64, f64)]) -> ApiTranscription {
        ApiTranscription {
            text: text.to_string(),
            lang: lang.to_string(),
            segments: segments
                .iter()
                .map(|(start, end)| TranscriptSegment {
                    text: text.to_string(),
                    start: *start,
                    end: *end,
                })
                .collect(),
        }
    }

    #[test]
    fn test_merge_offsets_by_chunk_index() {
        let chunks = [
            chunk("first", "ja", &[(0.0, 10.0)]),
            chunk("second", "ja", &[(0.0, 5.0)]),
        ];
        let merged = merge_chunks(&chunks, 30);

        assert_eq!(merged.segments.len(), 2);
        assert_eq!(merged.segments[0].start, 0.0);
        assert_eq!(merged.segments[0].end, 10.0);
        assert_eq!(merged.segments[1].start, 30.0);
        assert_eq!(merged.segments[1].end, 35.0);
    }

    #[test]
    fn test_merge_concatenates_text_in_order() {
        let chunks = [
            chunk("おはよう", "ja", &[(0.0, 2.0)]),
            chunk("ございます", "ja", &[(0.0, 2.0)]),
        ];
        let merged = merge_chunks(&chunks, 30);
        assert_eq!(merged.text, "おはようございます");
    }

    #[test]
    fn test_merge_takes_lang_from_first_chunk() {
        let chunks = [chunk("a", "ja", &[]), chunk("b", "en", &[])];
        let merged = merge_chunks(&chunks, 30);
        assert_eq!(merged.lang, "ja");
    }

    #[test]
    fn test_merge_of_nothing_is_empty() {
        let merged = merge_chunks(&[], 30);
        assert!(merged.text.is_empty());
        assert!(merged.segments.is_empty());
        assert!(merged.lang.is_empty());
    }

    #[test]
    fn test_later_chunks_keep_shifting() {
        let chunks = [
            chunk("a", "ja", &[(0.0, 10.0)]),
            chunk("b", "ja", &[(0.0, 10.0)]),
            chunk("c", "ja", &[(2.0, 8.0)]),
        ];
        let merged = merge_chunks(&chunks, 15);
        assert_eq!(merged.segments[2].start, 32.0);
        assert_eq!(merged.segments[2].end, 38.0);
    }
}
