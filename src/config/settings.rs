//! Configuration settings for Shunbun.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub crawler: CrawlerSettings,
    pub recorder: RecorderSettings,
    pub transcriber: TranscriberSettings,
    pub pipeline: PipelineSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data (channels, media, transcripts).
    pub data_dir: String,
    /// Directory for temporary files.
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.shunbun".to_string(),
            temp_dir: "/tmp/shunbun".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Feed crawling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerSettings {
    /// User agent override for feed requests. None keeps the built-in default.
    pub user_agent: Option<String>,
    /// Per-request timeout for feed fetches, in seconds. 0 disables it.
    pub timeout_seconds: u64,
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_seconds: 30,
        }
    }
}

/// Media recording settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderSettings {
    /// Per-request timeout for media downloads, in seconds. 0 disables it.
    pub timeout_seconds: u64,
    /// Re-download media even when the episode directory already has files.
    pub update: bool,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 600,
            update: false,
        }
    }
}

/// Transcription settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriberSettings {
    /// Endpoint of the speech-to-text API.
    pub api_endpoint: String,
    /// Duration of each media chunk sent for transcription, in seconds.
    pub split_seconds: u32,
    /// Language hint passed with every chunk.
    pub lang: String,
}

impl Default for TranscriberSettings {
    fn default() -> Self {
        Self {
            api_endpoint: "http://localhost:9000/transcribe".to_string(),
            split_seconds: crate::transcriber::SPLIT_SECONDS,
            lang: "ja".to_string(),
        }
    }
}

/// Batch pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Number of channel pipelines run in parallel per batch.
    pub batch_size: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { batch_size: 5 }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ShunbunError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shunbun")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }

    /// Root directory of the local store.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir().join("store")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let settings = Settings::default();
        assert_eq!(settings.pipeline.batch_size, 5);
        assert_eq!(settings.transcriber.split_seconds, 30);
        assert_eq!(settings.transcriber.lang, "ja");
        assert!(!settings.recorder.update);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [transcriber]
            api_endpoint = "http://stt.internal:9000/transcribe"
            "#,
        )
        .unwrap();
        assert_eq!(
            settings.transcriber.api_endpoint,
            "http://stt.internal:9000/transcribe"
        );
        assert_eq!(settings.transcriber.split_seconds, 30);
        assert_eq!(settings.pipeline.batch_size, 5);
    }
}
