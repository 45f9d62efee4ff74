//! Shunbun - Podcast Crawling and Transcription
//!
//! A CLI tool that tracks podcast-style feeds end-to-end: it crawls feed
//! URLs, extracts episode metadata, archives episode media on disk, and
//! produces time-aligned transcripts through a remote speech-to-text API.
//! Built for unattended, repeated, idempotent runs across many channels.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `model` - Channels, episodes, stored media, transcripts
//! - `downloader` - One-shot HTTP fetches with timeout cancellation
//! - `extract` - Feed-format detection and parsing (RSS)
//! - `crawler` - Download → extract pipeline per channel
//! - `store` - Directory-keyed JSON persistence
//! - `media_type` - Content sniffing for downloaded media
//! - `recorder` - Idempotent media acquisition
//! - `transcriber` - Media splitting and chunked remote transcription
//! - `orchestrator` - Batched pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use shunbun::config::Settings;
//! use shunbun::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     // Crawl every tracked channel, record new media, transcribe it.
//!     let summary = orchestrator.run_all().await?;
//!     println!("{} episodes transcribed", summary.transcribed());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod crawler;
pub mod downloader;
pub mod error;
pub mod extract;
pub mod media_type;
pub mod model;
pub mod orchestrator;
pub mod recorder;
pub mod store;
pub mod transcriber;

pub use error::{Result, ShunbunError};
