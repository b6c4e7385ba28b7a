//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::Path;

/// Run the config command against the config file at `config_path`.
pub fn run_config(action: &ConfigAction, settings: Settings, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let mut shown = settings;
            if shown.openai.api_key.is_some() {
                shown.openai.api_key = Some("<redacted>".to_string());
            }
            let toml_str = toml::to_string_pretty(&shown)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Edit => {
            if ensure_config_file(&settings, config_path)? {
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(config_path)
                .status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Write `settings` to `config_path` unless a file is already there.
///
/// Returns whether a file was created.
fn ensure_config_file(settings: &Settings, config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }
    settings.save_to(config_path)?;
    Ok(true)
}
