//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let rendered = toml::to_string_pretty(&settings)?;
            println!("{}", rendered);
        }
        ConfigAction::Path => {
            Output::kv(
                "config path",
                &Settings::default_config_path().display().to_string(),
            );
        }
    }
    Ok(())
}
