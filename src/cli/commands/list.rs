//! List command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::store::Store;

/// Run the list command: show tracked channels and their progress.
pub fn run_list(settings: Settings) -> anyhow::Result<()> {
    let store = Store::new(settings.store_dir());

    let channels = store.channels()?;
    if channels.is_empty() {
        Output::info("No channels tracked yet. Use 'shunbun add <name> <feed-url>' to add one.");
        return Ok(());
    }

    Output::header(&format!("Channels ({})", channels.len()));
    println!();

    let mut total_episodes = 0;
    let mut total_transcribed = 0;

    for channel in &channels {
        let episodes = store.episodes(&channel.slug)?;
        let transcribed = episodes
            .iter()
            .filter(|ep| store.has_transcript(&channel.slug, &ep.slug))
            .count();

        Output::channel_info(&channel.name, &channel.slug, episodes.len(), transcribed);
        total_episodes += episodes.len();
        total_transcribed += transcribed;
    }

    println!();
    Output::kv("Total episodes", &total_episodes.to_string());
    Output::kv("Total transcribed", &total_transcribed.to_string());

    Ok(())
}
