//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, VidtalkError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Chatting needs the API key and yt-dlp.
    Chat,
    /// Extracting content needs yt-dlp, and the API key for the audio fallback.
    Fetch,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Chat | Operation::Fetch => {
            check_api_key(settings)?;
            check_tool("yt-dlp")?;
        }
    }
    Ok(())
}

/// Check if an OpenAI API key can be resolved.
fn check_api_key(settings: &Settings) -> Result<()> {
    match settings.api_key() {
        Some(_) => Ok(()),
        None => Err(VidtalkError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    // ffmpeg/ffprobe use -version (single dash), others use --version
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(VidtalkError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(VidtalkError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(VidtalkError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_api_key_passes() {
        let mut settings = Settings::default();
        settings.openai.api_key = Some("sk-test".to_string());
        assert!(check_api_key(&settings).is_ok());
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let err = check_tool("vidtalk-definitely-not-installed").unwrap_err();
        assert!(matches!(err, VidtalkError::ToolNotFound(_)));
    }
}
