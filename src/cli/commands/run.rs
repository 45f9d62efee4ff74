//! Run command implementation: the full pipeline.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::orchestrator::Orchestrator;

/// Run the pipeline command: crawl, record, and transcribe.
pub async fn run_pipeline(
    channel_slug: Option<&str>,
    update: bool,
    mut settings: Settings,
) -> anyhow::Result<()> {
    preflight::check(preflight::Operation::Run)?;

    settings.recorder.update = update || settings.recorder.update;
    let orchestrator = Orchestrator::new(settings)?;

    let summary = match channel_slug {
        Some(slug) => {
            let channel = orchestrator
                .store()
                .channel(slug)?
                .ok_or_else(|| anyhow::anyhow!("no channel with slug '{}'", slug))?;
            orchestrator.run_channels(std::slice::from_ref(&channel)).await
        }
        None => orchestrator.run_all().await?,
    };

    Output::header("Pipeline Summary");
    println!();
    for channel in &summary.channels {
        if !channel.crawled {
            Output::error(&format!("{}: crawl failed", channel.name));
            continue;
        }
        Output::channel_info(
            &channel.name,
            &channel.channel_slug,
            channel.episodes,
            channel.transcribed + channel.skipped,
        );
        if channel.failed > 0 {
            Output::warning(&format!(
                "{}: {} episode(s) failed",
                channel.name, channel.failed
            ));
        }
    }

    println!();
    Output::kv("Newly transcribed", &summary.transcribed().to_string());
    if summary.failed_channels() > 0 {
        Output::warning(&format!("{} channel(s) failed", summary.failed_channels()));
    }

    Ok(())
}
