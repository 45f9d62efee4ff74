//! Episode repository.
//!
//! Saves are deduplicated against what is already on disk: a new episode
//! that is [`same_episode`]-equal to a stored one is skipped and reported as
//! success, so repeated crawls of the same feed never duplicate files.

use super::{LoadReport, SaveReport, SaveStatus, Store, EPISODE_FILE};
use crate::error::StoreError;
use crate::model::{same_episode, Episode};
use std::collections::HashMap;
use tracing::{debug, warn};

impl Store {
    /// Load one episode by channel and episode slug.
    pub fn episode(
        &self,
        channel_slug: &str,
        episode_slug: &str,
    ) -> Result<Option<Episode>, StoreError> {
        self.read_doc(&self.episode_dir(channel_slug, episode_slug).join(EPISODE_FILE))
    }

    /// Load a channel's episodes, dropping children that fail.
    pub fn episodes(&self, channel_slug: &str) -> Result<Vec<Episode>, StoreError> {
        Ok(self.episodes_report(channel_slug)?.loaded)
    }

    /// Load a channel's episodes, keeping per-child failures observable.
    pub fn episodes_report(&self, channel_slug: &str) -> Result<LoadReport<Episode>, StoreError> {
        let mut report = LoadReport::new();
        for episode_slug in self.subdirs(&self.channel_dir(channel_slug))? {
            match self.episode(channel_slug, &episode_slug) {
                Ok(Some(episode)) => report.loaded.push(episode),
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        channel = %channel_slug,
                        episode = %episode_slug,
                        error = %e,
                        "skipping unreadable episode"
                    );
                    report.failures.push(e);
                }
            }
        }
        Ok(report)
    }

    /// Load every episode of every channel.
    pub fn all_episodes(&self) -> Result<Vec<Episode>, StoreError> {
        Ok(self.all_episodes_report()?.loaded)
    }

    /// Load every episode of every channel, keeping failures observable.
    pub fn all_episodes_report(&self) -> Result<LoadReport<Episode>, StoreError> {
        let mut report = LoadReport::new();
        for channel_slug in self.subdirs(self.base())? {
            let mut child = self.episodes_report(&channel_slug)?;
            report.loaded.append(&mut child.loaded);
            report.failures.append(&mut child.failures);
        }
        Ok(report)
    }

    /// Save episodes, skipping any that duplicate an already-stored one.
    pub fn save_episodes(&self, episodes: &[Episode]) -> SaveReport<Episode> {
        let mut report = SaveReport::new();
        // Existing episodes per channel, loaded once and kept current as the
        // batch writes, so duplicates inside the batch are also caught.
        let mut known: HashMap<String, Vec<Episode>> = HashMap::new();

        for episode in episodes {
            let outcome = self.save_episode(episode, &mut known);
            if outcome.is_ok() {
                report.saved.push(episode.clone());
            }
            report.results.push(outcome);
        }

        report
    }

    fn save_episode(
        &self,
        episode: &Episode,
        known: &mut HashMap<String, Vec<Episode>>,
    ) -> Result<SaveStatus, StoreError> {
        if episode.slug.is_empty() || episode.channel_slug.is_empty() {
            return Err(StoreError::MissingKey(format!(
                "episode '{}' without slug or channel",
                episode.title
            )));
        }

        let existing = match known.entry(episode.channel_slug.clone()) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(self.episodes(&episode.channel_slug)?)
            }
        };

        if existing.iter().any(|stored| same_episode(stored, episode)) {
            debug!(
                channel = %episode.channel_slug,
                their_id = %episode.their_id,
                "episode already stored, skipping"
            );
            return Ok(SaveStatus::Skipped);
        }

        let path = self
            .episode_dir(&episode.channel_slug, &episode.slug)
            .join(EPISODE_FILE);
        self.write_doc(&path, episode)?;
        existing.push(episode.clone());

        Ok(SaveStatus::Written(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{new_slug, StreamingType};
    use chrono::Utc;

    fn episode(channel_slug: &str, their_id: &str, stream_url: &str) -> Episode {
        Episode {
            slug: new_slug(),
            their_id: their_id.to_string(),
            title: "ep".to_string(),
            description: String::new(),
            published_at: Utc::now(),
            stream_url: stream_url.to_string(),
            streaming: StreamingType::Static,
            expected_content_type: None,
            duration: None,
            start_at: None,
            end_at: None,
            channel_slug: channel_slug.to_string(),
        }
    }

    fn episode_dirs(store: &Store, channel_slug: &str) -> usize {
        store
            .subdirs(&store.channel_dir(channel_slug))
            .unwrap()
            .len()
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let ep = episode("ch-1", "guid-1", "http://media.example/1.mp3");

        let report = store.save_episodes(std::slice::from_ref(&ep));
        assert!(report.all_ok());
        assert_eq!(report.written(), 1);

        let loaded = store.episode("ch-1", &ep.slug).unwrap().unwrap();
        assert_eq!(loaded.their_id, "guid-1");
    }

    #[test]
    fn test_duplicate_guid_saved_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        let first = episode("ch-1", "guid-1", "http://media.example/1.mp3");
        store.save_episodes(std::slice::from_ref(&first));

        // A later crawl produces the same item under a fresh slug.
        let second = episode("ch-1", "guid-1", "http://media.example/1.mp3");
        let report = store.save_episodes(std::slice::from_ref(&second));
        assert!(report.all_ok(), "duplicate save reports success");
        assert_eq!(report.skipped(), 1);
        assert_eq!(episode_dirs(&store, "ch-1"), 1);
    }

    #[test]
    fn test_duplicate_stream_url_without_guid_saved_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        let first = episode("ch-1", "", "http://media.example/1.mp3");
        store.save_episodes(std::slice::from_ref(&first));

        let second = episode("ch-1", "", "http://media.example/1.mp3");
        let report = store.save_episodes(std::slice::from_ref(&second));
        assert_eq!(report.skipped(), 1);
        assert_eq!(episode_dirs(&store, "ch-1"), 1);
    }

    #[test]
    fn test_duplicates_within_one_batch_are_caught() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        let a = episode("ch-1", "guid-1", "http://media.example/1.mp3");
        let b = episode("ch-1", "guid-1", "http://media.example/1.mp3");
        let report = store.save_episodes(&[a, b]);
        assert_eq!(report.written(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(episode_dirs(&store, "ch-1"), 1);
    }

    #[test]
    fn test_distinct_episodes_both_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        let a = episode("ch-1", "guid-1", "http://media.example/1.mp3");
        let b = episode("ch-1", "guid-2", "http://media.example/2.mp3");
        let report = store.save_episodes(&[a, b]);
        assert_eq!(report.written(), 2);
        assert_eq!(store.episodes("ch-1").unwrap().len(), 2);
    }

    #[test]
    fn test_all_episodes_recurses_channels() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        store.save_episodes(&[
            episode("ch-1", "guid-1", "http://media.example/1.mp3"),
            episode("ch-2", "guid-2", "http://media.example/2.mp3"),
        ]);

        assert_eq!(store.all_episodes().unwrap().len(), 2);
    }

    #[test]
    fn test_episodes_of_unknown_channel_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        assert!(store.episodes("missing").unwrap().is_empty());
    }
}
