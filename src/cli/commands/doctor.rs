//! Doctor command implementation.

use crate::cli::{preflight, Output};
use crate::config::Settings;

/// Run the doctor command: report on tooling and configuration.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Shunbun Doctor");
    println!();

    match preflight::check_tool("ffmpeg") {
        Ok(()) => Output::success("ffmpeg found"),
        Err(e) => Output::error(&format!("ffmpeg: {}", e)),
    }

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::success(&format!("Config file: {}", config_path.display()));
    } else {
        Output::warning(&format!(
            "No config file at {} (using defaults)",
            config_path.display()
        ));
    }

    let data_dir = settings.data_dir();
    if data_dir.exists() {
        Output::success(&format!("Data directory: {}", data_dir.display()));
    } else {
        Output::warning(&format!(
            "Data directory missing: {} (run 'shunbun init')",
            data_dir.display()
        ));
    }

    println!();
    Output::kv("transcription endpoint", &settings.transcriber.api_endpoint);
    Output::kv(
        "split seconds",
        &settings.transcriber.split_seconds.to_string(),
    );
    Output::kv("language hint", &settings.transcriber.lang);
    Output::kv("batch size", &settings.pipeline.batch_size.to_string());

    Ok(())
}
