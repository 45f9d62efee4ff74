//! Pipeline orchestrator for Shunbun.
//!
//! Drives crawl → record → transcribe for whole channel sets. Channels run
//! in fixed-size parallel batches: every pipeline in a batch starts
//! together and the whole group finishes before the next begins, which
//! bounds peak network and ffmpeg load. Within one channel the steps are
//! strictly sequential, and episodes that already have a transcript are
//! skipped, so repeated runs only do new work.

use crate::config::Settings;
use crate::crawler::Crawler;
use crate::downloader::Downloader;
use crate::error::Result;
use crate::model::{Channel, ChannelStatus, Episode};
use crate::recorder::Recorder;
use crate::store::Store;
use crate::transcriber::{HttpSpeechApi, SpeechApi, Transcriber};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// The main orchestrator for the Shunbun pipeline.
pub struct Orchestrator {
    settings: Settings,
    store: Store,
    downloader: Downloader,
    transcriber: Transcriber,
}

impl Orchestrator {
    /// Create an orchestrator with default wiring from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let api: Arc<dyn SpeechApi> =
            Arc::new(HttpSpeechApi::new(&settings.transcriber.api_endpoint)?);
        Self::with_api(settings, api)
    }

    /// Create an orchestrator with a custom transcription API.
    pub fn with_api(settings: Settings, api: Arc<dyn SpeechApi>) -> Result<Self> {
        let store = Store::new(settings.store_dir());
        let downloader = Downloader::new()?;
        let transcriber = Transcriber::new(api, settings.temp_dir())
            .with_split_seconds(settings.transcriber.split_seconds)
            .with_lang(&settings.transcriber.lang);

        std::fs::create_dir_all(settings.store_dir())?;
        std::fs::create_dir_all(settings.temp_dir())?;

        Ok(Self {
            settings,
            store,
            downloader,
            transcriber,
        })
    }

    /// Get the local store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the full pipeline over every active stored channel.
    pub async fn run_all(&self) -> Result<RunSummary> {
        let mut channels = self.store.channels()?;
        channels.retain(|channel| channel.status == ChannelStatus::Active);
        info!(channels = channels.len(), "starting pipeline run");
        Ok(self.run_channels(&channels).await)
    }

    /// Run the full pipeline over the given channels, in batches.
    pub async fn run_channels(&self, channels: &[Channel]) -> RunSummary {
        let batch_size = self.settings.pipeline.batch_size.max(1);
        let mut summaries = Vec::with_capacity(channels.len());

        for batch in channels.chunks(batch_size) {
            let results = join_all(batch.iter().map(|channel| self.run_channel(channel))).await;
            for (channel, result) in batch.iter().zip(results) {
                match result {
                    Ok(summary) => summaries.push(summary),
                    Err(e) => {
                        error!(channel = %channel.slug, error = %e, "channel pipeline failed");
                        summaries.push(ChannelSummary::crawl_failed(channel));
                    }
                }
            }
        }

        RunSummary {
            channels: summaries,
        }
    }

    /// Crawl one channel and process its episodes.
    #[instrument(skip(self, channel), fields(channel = %channel.slug))]
    pub async fn run_channel(&self, channel: &Channel) -> Result<ChannelSummary> {
        let crawler = Crawler::new(&self.downloader)
            .with_user_agent(self.settings.crawler.user_agent.clone())
            .with_timeout(timeout(self.settings.crawler.timeout_seconds));

        let outcome = crawler.run(channel).await?;
        let save = self.store.save_episodes(&outcome.episodes);
        info!(
            extracted = outcome.episodes.len(),
            written = save.written(),
            skipped = save.skipped(),
            "episodes saved"
        );

        // Work from the persisted set: dedup may have mapped freshly crawled
        // items onto episodes stored under earlier slugs.
        let episodes = self.store.episodes(&channel.slug)?;

        let mut summary = ChannelSummary {
            channel_slug: channel.slug.clone(),
            name: channel.name.clone(),
            crawled: true,
            episodes: episodes.len(),
            transcribed: 0,
            skipped: 0,
            failed: 0,
        };

        for episode in &episodes {
            if self.store.has_transcript(&channel.slug, &episode.slug) {
                summary.skipped += 1;
                continue;
            }

            match self.process_episode(channel, episode).await {
                Ok(()) => summary.transcribed += 1,
                Err(e) => {
                    warn!(episode = %episode.slug, error = %e, "episode processing failed");
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Record one episode's media and transcribe it.
    async fn process_episode(&self, channel: &Channel, episode: &Episode) -> Result<()> {
        let recorder = Recorder::new(&self.downloader, &self.store)
            .with_update(self.settings.recorder.update)
            .with_timeout(timeout(self.settings.recorder.timeout_seconds));

        let stored = recorder.run(episode).await?;
        let report = self
            .store
            .save_stored(&channel.slug, std::slice::from_ref(&stored));
        for result in report.results {
            result?;
        }

        let transcript = self.transcriber.run(&stored).await?;
        let report = self
            .store
            .save_transcripts(&channel.slug, std::slice::from_ref(&transcript));
        for result in report.results {
            result?;
        }

        Ok(())
    }
}

fn timeout(seconds: u64) -> Option<Duration> {
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

/// Per-channel outcome of a pipeline run.
#[derive(Debug)]
pub struct ChannelSummary {
    pub channel_slug: String,
    pub name: String,
    /// Whether the crawl itself succeeded.
    pub crawled: bool,
    /// Episodes on disk after the crawl's save.
    pub episodes: usize,
    /// Episodes newly recorded and transcribed this run.
    pub transcribed: usize,
    /// Episodes skipped because a transcript already existed.
    pub skipped: usize,
    /// Episodes that failed to record or transcribe.
    pub failed: usize,
}

impl ChannelSummary {
    fn crawl_failed(channel: &Channel) -> Self {
        Self {
            channel_slug: channel.slug.clone(),
            name: channel.name.clone(),
            crawled: false,
            episodes: 0,
            transcribed: 0,
            skipped: 0,
            failed: 0,
        }
    }
}

/// Outcome of a whole pipeline run.
#[derive(Debug)]
pub struct RunSummary {
    pub channels: Vec<ChannelSummary>,
}

impl RunSummary {
    pub fn transcribed(&self) -> usize {
        self.channels.iter().map(|c| c.transcribed).sum()
    }

    pub fn failed_channels(&self) -> usize {
        self.channels.iter().filter(|c| !c.crawled).count()
    }
}
