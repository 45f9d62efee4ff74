//! Stored-media repository.
//!
//! One `stored.json` per episode, recording where the recorder put the
//! media bytes. Re-recording overwrites; there is no dedup rule here.

use super::{LoadReport, SaveReport, SaveStatus, Store, STORED_FILE};
use crate::error::StoreError;
use crate::model::StoredEpisode;
use tracing::warn;

impl Store {
    /// Load the stored-media record of one episode.
    pub fn stored_episode(
        &self,
        channel_slug: &str,
        episode_slug: &str,
    ) -> Result<Option<StoredEpisode>, StoreError> {
        self.read_doc(&self.episode_dir(channel_slug, episode_slug).join(STORED_FILE))
    }

    /// Load every stored-media record of a channel, dropping failures.
    pub fn stored_episodes(&self, channel_slug: &str) -> Result<Vec<StoredEpisode>, StoreError> {
        Ok(self.stored_episodes_report(channel_slug)?.loaded)
    }

    /// Load every stored-media record of a channel, keeping failures observable.
    pub fn stored_episodes_report(
        &self,
        channel_slug: &str,
    ) -> Result<LoadReport<StoredEpisode>, StoreError> {
        let mut report = LoadReport::new();
        for episode_slug in self.subdirs(&self.channel_dir(channel_slug))? {
            match self.stored_episode(channel_slug, &episode_slug) {
                Ok(Some(stored)) => report.loaded.push(stored),
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        channel = %channel_slug,
                        episode = %episode_slug,
                        error = %e,
                        "skipping unreadable stored record"
                    );
                    report.failures.push(e);
                }
            }
        }
        Ok(report)
    }

    /// Save stored-media records under the given channel.
    pub fn save_stored(
        &self,
        channel_slug: &str,
        items: &[StoredEpisode],
    ) -> SaveReport<StoredEpisode> {
        let mut report = SaveReport::new();

        for item in items {
            let outcome = self.save_one_stored(channel_slug, item);
            if outcome.is_ok() {
                report.saved.push(item.clone());
            }
            report.results.push(outcome);
        }

        report
    }

    fn save_one_stored(
        &self,
        channel_slug: &str,
        item: &StoredEpisode,
    ) -> Result<SaveStatus, StoreError> {
        if item.episode_slug.is_empty() || channel_slug.is_empty() {
            return Err(StoreError::MissingKey(
                "stored episode without slug or channel".to_string(),
            ));
        }

        let path = self
            .episode_dir(channel_slug, &item.episode_slug)
            .join(STORED_FILE);
        self.write_doc(&path, item)?;
        Ok(SaveStatus::Written(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StorageRecord, StorageType};
    use chrono::Utc;

    fn stored(episode_slug: &str) -> StoredEpisode {
        StoredEpisode {
            episode_slug: episode_slug.to_string(),
            stored: vec![StorageRecord {
                storage_type: StorageType::Local,
                stored_key: "/data/ch/ep/media/00000.mp3".to_string(),
                stored_at: Utc::now(),
            }],
        }
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        let record = stored("ep-1");
        let report = store.save_stored("ch-1", std::slice::from_ref(&record));
        assert!(report.all_ok());

        let loaded = store.stored_episode("ch-1", "ep-1").unwrap().unwrap();
        assert_eq!(loaded.stored.len(), 1);
        assert_eq!(loaded.stored[0].storage_type, StorageType::Local);
    }

    #[test]
    fn test_rerecording_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        store.save_stored("ch-1", &[stored("ep-1")]);

        let mut updated = stored("ep-1");
        updated.stored[0].stored_key = "/data/ch/ep/media/00000.wav".to_string();
        let report = store.save_stored("ch-1", std::slice::from_ref(&updated));
        assert_eq!(report.written(), 1);

        let loaded = store.stored_episode("ch-1", "ep-1").unwrap().unwrap();
        assert!(loaded.stored[0].stored_key.ends_with("00000.wav"));
    }

    #[test]
    fn test_absent_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        assert!(store.stored_episode("ch-1", "ep-1").unwrap().is_none());
    }
}
