//! Shunbun CLI entry point.

use anyhow::Result;
use clap::Parser;
use shunbun::cli::{commands, Cli, Commands};
use shunbun::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("shunbun={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Add { name, crawl_url } => {
            commands::run_add(name, crawl_url, settings)?;
        }

        Commands::List => {
            commands::run_list(settings)?;
        }

        Commands::Crawl { channel } => {
            commands::run_crawl(channel.as_deref(), settings).await?;
        }

        Commands::Run { channel, update } => {
            commands::run_pipeline(channel.as_deref(), *update, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
