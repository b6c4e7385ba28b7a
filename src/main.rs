//! vidtalk CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vidtalk::cli::{commands, Cli, Commands};
use vidtalk::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config_path = Settings::resolve_config_path(cli.config.as_deref());
    let mut settings = Settings::load_from(Some(&config_path))?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("vidtalk={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let command = cli.command.unwrap_or(Commands::Chat {
        url: None,
        model: None,
    });

    // Config commands see the file as written, without the CLI/env key folded in
    if !matches!(command, Commands::Config { .. }) {
        if let Some(key) = cli.api_key.filter(|k| !k.trim().is_empty()) {
            settings.openai.api_key = Some(key);
        }
    }

    match &command {
        Commands::Chat { url, model } => {
            std::fs::create_dir_all(settings.temp_dir())?;
            commands::run_chat(url.clone(), model.clone(), settings).await?;
        }

        Commands::Fetch { url, output } => {
            std::fs::create_dir_all(settings.temp_dir())?;
            commands::run_fetch(url, output.clone(), settings).await?;
        }

        Commands::Ask {
            url,
            question,
            model,
        } => {
            std::fs::create_dir_all(settings.temp_dir())?;
            commands::run_ask(url, question, model.clone(), settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings, &config_path)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, &config_path)?;
        }
    }

    Ok(())
}
