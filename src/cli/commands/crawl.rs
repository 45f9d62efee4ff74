//! Crawl command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::crawler::Crawler;
use crate::downloader::Downloader;
use crate::model::Channel;
use crate::store::Store;
use std::time::Duration;

/// Run the crawl command: fetch feeds and save new episodes, without
/// touching media or the transcription API.
pub async fn run_crawl(channel_slug: Option<&str>, settings: Settings) -> anyhow::Result<()> {
    let store = Store::new(settings.store_dir());
    let downloader = Downloader::new()?;

    let channels: Vec<Channel> = match channel_slug {
        Some(slug) => {
            let channel = store
                .channel(slug)?
                .ok_or_else(|| anyhow::anyhow!("no channel with slug '{}'", slug))?;
            vec![channel]
        }
        None => store.channels()?,
    };

    if channels.is_empty() {
        Output::info("No channels to crawl.");
        return Ok(());
    }

    let timeout = settings.crawler.timeout_seconds;
    let crawler = Crawler::new(&downloader)
        .with_user_agent(settings.crawler.user_agent.clone())
        .with_timeout((timeout > 0).then(|| Duration::from_secs(timeout)));

    let pb = Output::progress_bar(channels.len() as u64, "crawling");
    let mut new_episodes = 0;

    for channel in &channels {
        match crawler.run(channel).await {
            Ok(outcome) => {
                let report = store.save_episodes(&outcome.episodes);
                if !report.all_ok() {
                    Output::warning(&format!(
                        "'{}': some episodes failed to save",
                        channel.name
                    ));
                }
                new_episodes += report.written();
            }
            Err(e) => {
                Output::warning(&format!("'{}': crawl failed: {}", channel.name, e));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Output::success(&format!(
        "Crawled {} channel(s), {} new episode(s)",
        channels.len(),
        new_episodes
    ));

    Ok(())
}
