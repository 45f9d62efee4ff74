//! Configuration module for Shunbun.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    CrawlerSettings, GeneralSettings, PipelineSettings, RecorderSettings, Settings,
    TranscriberSettings,
};
