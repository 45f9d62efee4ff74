//! Channel repository.

use super::{LoadReport, SaveReport, SaveStatus, Store, CHANNEL_FILE};
use crate::error::StoreError;
use crate::model::Channel;
use tracing::{debug, warn};

impl Store {
    /// Load one channel by slug.
    pub fn channel(&self, channel_slug: &str) -> Result<Option<Channel>, StoreError> {
        self.read_doc(&self.channel_dir(channel_slug).join(CHANNEL_FILE))
    }

    /// Load every channel, dropping children that fail after logging them.
    pub fn channels(&self) -> Result<Vec<Channel>, StoreError> {
        Ok(self.channels_report()?.loaded)
    }

    /// Load every channel, keeping per-child failures observable.
    pub fn channels_report(&self) -> Result<LoadReport<Channel>, StoreError> {
        let mut report = LoadReport::new();
        for slug in self.subdirs(self.base())? {
            match self.channel(&slug) {
                Ok(Some(channel)) => report.loaded.push(channel),
                Ok(None) => {}
                Err(e) => {
                    warn!(channel = %slug, error = %e, "skipping unreadable channel");
                    report.failures.push(e);
                }
            }
        }
        Ok(report)
    }

    /// Save channels. Without `update`, an existing document short-circuits
    /// to a skip; the check is file existence only, never content.
    pub fn save_channels(&self, channels: &[Channel], update: bool) -> SaveReport<Channel> {
        let mut report = SaveReport::new();

        for channel in channels {
            let outcome = self.save_channel(channel, update);
            if outcome.is_ok() {
                report.saved.push(channel.clone());
            }
            report.results.push(outcome);
        }

        report
    }

    fn save_channel(&self, channel: &Channel, update: bool) -> Result<SaveStatus, StoreError> {
        if channel.slug.is_empty() {
            return Err(StoreError::MissingKey("channel without slug".to_string()));
        }

        let path = self.channel_dir(&channel.slug).join(CHANNEL_FILE);

        if !update && path.exists() {
            debug!(channel = %channel.slug, "channel already saved, skipping");
            return Ok(SaveStatus::Skipped);
        }

        self.write_doc(&path, channel)?;
        Ok(SaveStatus::Written(path))
    }
}
