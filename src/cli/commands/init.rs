//! Init command implementation.

use crate::cli::Output;
use crate::config::Settings;

/// Run the init command: create directories and a default config file.
pub fn run_init(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Shunbun Setup");

    let data_dir = settings.data_dir();
    let temp_dir = settings.temp_dir();
    let store_dir = settings.store_dir();

    for dir in [&data_dir, &temp_dir, &store_dir] {
        if dir.exists() {
            Output::info(&format!("Directory exists: {}", dir.display()));
        } else {
            std::fs::create_dir_all(dir)?;
            Output::success(&format!("Created directory: {}", dir.display()));
        }
    }

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        Output::info(&format!("Config file exists: {}", config_path.display()));
    } else {
        settings.save_to(&config_path)?;
        Output::success(&format!("Created config file: {}", config_path.display()));
    }

    println!();
    Output::info("Next steps:");
    Output::kv("add a channel", "shunbun add <name> <feed-url>");
    Output::kv("check tooling", "shunbun doctor");
    Output::kv("run the pipeline", "shunbun run");

    Ok(())
}
