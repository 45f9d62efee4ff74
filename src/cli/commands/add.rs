//! Add command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::model::Channel;
use crate::store::Store;

/// Run the add command: seed a new channel in the store.
pub fn run_add(name: &str, crawl_url: &str, settings: Settings) -> anyhow::Result<()> {
    let url = url::Url::parse(crawl_url)
        .map_err(|e| anyhow::anyhow!("invalid crawl URL '{}': {}", crawl_url, e))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("crawl URL must be http(s), got '{}'", url.scheme());
    }

    let store = Store::new(settings.store_dir());

    // Same feed already tracked? Adding it again would just crawl twice.
    let existing = store.channels()?;
    if let Some(channel) = existing.iter().find(|c| c.crawl_url == crawl_url) {
        Output::warning(&format!(
            "Channel '{}' already tracks this URL ({})",
            channel.name, channel.slug
        ));
        return Ok(());
    }

    let channel = Channel::new(name, crawl_url);
    let report = store.save_channels(std::slice::from_ref(&channel), false);
    for result in report.results {
        result?;
    }

    Output::success(&format!("Added channel '{}'", name));
    Output::kv("slug", &channel.slug);
    Output::kv("crawl url", crawl_url);

    Ok(())
}
