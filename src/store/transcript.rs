//! Transcript repository.
//!
//! One `transcript.json` per episode. Its existence doubles as the
//! "already processed" marker the batch driver checks before scheduling
//! record/transcribe work.

use super::{LoadReport, SaveReport, SaveStatus, Store, TRANSCRIPT_FILE};
use crate::error::StoreError;
use crate::model::EpisodeTranscript;
use tracing::warn;

impl Store {
    /// Load one episode's transcript.
    pub fn transcript(
        &self,
        channel_slug: &str,
        episode_slug: &str,
    ) -> Result<Option<EpisodeTranscript>, StoreError> {
        self.read_doc(
            &self
                .episode_dir(channel_slug, episode_slug)
                .join(TRANSCRIPT_FILE),
        )
    }

    /// Whether an episode already has a transcript document on disk.
    pub fn has_transcript(&self, channel_slug: &str, episode_slug: &str) -> bool {
        self.episode_dir(channel_slug, episode_slug)
            .join(TRANSCRIPT_FILE)
            .exists()
    }

    /// Load every transcript of a channel, dropping failures.
    pub fn transcripts(&self, channel_slug: &str) -> Result<Vec<EpisodeTranscript>, StoreError> {
        Ok(self.transcripts_report(channel_slug)?.loaded)
    }

    /// Load every transcript of a channel, keeping failures observable.
    pub fn transcripts_report(
        &self,
        channel_slug: &str,
    ) -> Result<LoadReport<EpisodeTranscript>, StoreError> {
        let mut report = LoadReport::new();
        for episode_slug in self.subdirs(&self.channel_dir(channel_slug))? {
            match self.transcript(channel_slug, &episode_slug) {
                Ok(Some(transcript)) => report.loaded.push(transcript),
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        channel = %channel_slug,
                        episode = %episode_slug,
                        error = %e,
                        "skipping unreadable transcript"
                    );
                    report.failures.push(e);
                }
            }
        }
        Ok(report)
    }

    /// Save transcripts under the given channel.
    pub fn save_transcripts(
        &self,
        channel_slug: &str,
        items: &[EpisodeTranscript],
    ) -> SaveReport<EpisodeTranscript> {
        let mut report = SaveReport::new();

        for item in items {
            let outcome = self.save_one_transcript(channel_slug, item);
            if outcome.is_ok() {
                report.saved.push(item.clone());
            }
            report.results.push(outcome);
        }

        report
    }

    fn save_one_transcript(
        &self,
        channel_slug: &str,
        item: &EpisodeTranscript,
    ) -> Result<SaveStatus, StoreError> {
        if item.episode_slug.is_empty() || channel_slug.is_empty() {
            return Err(StoreError::MissingKey(
                "transcript without episode slug or channel".to_string(),
            ));
        }

        let path = self
            .episode_dir(channel_slug, &item.episode_slug)
            .join(TRANSCRIPT_FILE);
        self.write_doc(&path, item)?;
        Ok(SaveStatus::Written(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{new_slug, Transcript, TranscriptSegment};
    use chrono::Utc;

    fn transcript(episode_slug: &str) -> EpisodeTranscript {
        EpisodeTranscript {
            slug: new_slug(),
            episode_slug: episode_slug.to_string(),
            transcripts: vec![Transcript {
                text: "こんにちは".to_string(),
                lang: "ja".to_string(),
                segments: vec![TranscriptSegment {
                    text: "こんにちは".to_string(),
                    start: 0.0,
                    end: 2.5,
                }],
            }],
            transcribed_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        let item = transcript("ep-1");
        let report = store.save_transcripts("ch-1", std::slice::from_ref(&item));
        assert!(report.all_ok());

        let loaded = store.transcript("ch-1", "ep-1").unwrap().unwrap();
        assert_eq!(loaded.transcripts[0].lang, "ja");
        assert_eq!(loaded.transcripts[0].segments[0].end, 2.5);
    }

    #[test]
    fn test_has_transcript_tracks_existence() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        assert!(!store.has_transcript("ch-1", "ep-1"));
        store.save_transcripts("ch-1", &[transcript("ep-1")]);
        assert!(store.has_transcript("ch-1", "ep-1"));
    }
}
