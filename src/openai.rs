//! OpenAI client configuration.

use crate::config::Settings;
use crate::error::{Result, VidtalkError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Shared client type for chat and transcription calls.
pub type OpenAIClient = Client<OpenAIConfig>;

/// Create an OpenAI client from settings.
///
/// Fails when no API key can be resolved from the config file or the
/// environment.
pub fn create_client(settings: &Settings) -> Result<OpenAIClient> {
    let api_key = settings.api_key().ok_or_else(|| {
        VidtalkError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )
    })?;

    create_client_with_timeout(
        &api_key,
        Duration::from_secs(settings.openai.timeout_seconds),
    )
}

/// Create an OpenAI client with an explicit key and timeout.
pub fn create_client_with_timeout(api_key: &str, timeout: Duration) -> Result<OpenAIClient> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    Ok(Client::with_config(OpenAIConfig::new().with_api_key(api_key))
        .with_http_client(http_client))
}
