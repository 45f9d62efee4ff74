//! CLI module for Shunbun.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Shunbun - Podcast Crawling and Transcription
///
/// Crawls podcast feeds, archives episode media, and produces time-aligned
/// transcripts through a remote speech-to-text API.
#[derive(Parser, Debug)]
#[command(name = "shunbun")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Shunbun: create directories and a default config
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Add a channel to track
    Add {
        /// Channel name
        name: String,

        /// Feed URL to crawl
        crawl_url: String,
    },

    /// List tracked channels and their progress
    List,

    /// Crawl feeds and save new episodes (no media download)
    Crawl {
        /// Channel slug to crawl; all channels when omitted
        channel: Option<String>,
    },

    /// Run the full pipeline: crawl, record media, transcribe
    Run {
        /// Channel slug to run; all channels when omitted
        #[arg(short = 'C', long)]
        channel: Option<String>,

        /// Re-download media even when it already exists locally
        #[arg(long)]
        update: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
