//! Configuration settings for vidtalk.

use super::prompts::ChatPrompts;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub openai: OpenAISettings,
    pub chat: ChatSettings,
    pub transcript: TranscriptSettings,
    pub transcription: TranscriptionSettings,
    pub prompts: ChatPrompts,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Root directory for scratch files (audio downloads, subtitles).
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir()
                .join("vidtalk")
                .to_string_lossy()
                .into_owned(),
            log_level: "warn".to_string(),
        }
    }
}

/// OpenAI API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    /// API key. Falls back to `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout_seconds: 300,
        }
    }
}

/// Chat model selector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum ChatModel {
    #[default]
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
}

impl ChatModel {
    /// All selectable models, in display order.
    pub const ALL: [ChatModel; 2] = [ChatModel::Gpt35Turbo, ChatModel::Gpt4oMini];

    /// Model identifier sent to the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatModel::Gpt35Turbo => "gpt-3.5-turbo",
            ChatModel::Gpt4oMini => "gpt-4o-mini",
        }
    }
}

impl std::str::FromStr for ChatModel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gpt-3.5-turbo" | "gpt-3.5" | "gpt35" => Ok(ChatModel::Gpt35Turbo),
            "gpt-4o-mini" | "4o-mini" => Ok(ChatModel::Gpt4oMini),
            _ => Err(format!(
                "Unknown model: {} (expected one of: {})",
                s,
                ChatModel::ALL.map(|m| m.as_str()).join(", ")
            )),
        }
    }
}

impl std::fmt::Display for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chat completion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Model used when none is selected on the command line.
    pub model: ChatModel,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: ChatModel::default(),
            temperature: 0.7,
        }
    }
}

/// Caption (fast path) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Subtitle languages passed to yt-dlp, in preference order.
    pub languages: Vec<String>,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en.*".to_string()],
        }
    }
}

/// Speech-to-text (slow path) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Whisper model to use.
    pub model: String,
    /// Duration in seconds for splitting long audio files.
    pub chunk_duration_seconds: u32,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            chunk_duration_seconds: 1200,
        }
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

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::VidtalkError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidtalk")
            .join("config.toml")
    }

    /// The config file in use: `override_path` when given, otherwise the default location.
    pub fn resolve_config_path(override_path: Option<&str>) -> PathBuf {
        match override_path {
            Some(path) => Self::expand_path(path),
            None => Self::default_config_path(),
        }
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded scratch directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }

    /// Resolve the API key: config file first, then `OPENAI_API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        self.openai
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                std::env::var("OPENAI_API_KEY")
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_model_parse() {
        assert_eq!("gpt-4o-mini".parse::<ChatModel>(), Ok(ChatModel::Gpt4oMini));
        assert_eq!("GPT-3.5-Turbo".parse::<ChatModel>(), Ok(ChatModel::Gpt35Turbo));
        assert!("gpt-5".parse::<ChatModel>().is_err());
        assert_eq!(ChatModel::Gpt4oMini.to_string(), "gpt-4o-mini");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [chat]
            model = "gpt-4o-mini"

            [prompts]
            system = "Be brief."
            "#,
        )
        .unwrap();

        assert_eq!(settings.chat.model, ChatModel::Gpt4oMini);
        assert_eq!(settings.chat.temperature, 0.7);
        assert_eq!(settings.prompts.system, "Be brief.");
        assert_eq!(settings.prompts.user, ChatPrompts::default().user);
        assert_eq!(settings.transcription.model, "whisper-1");
    }

    #[test]
    fn test_settings_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.transcript.languages = vec!["de".to_string(), "en".to_string()];
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.transcript.languages, vec!["de", "en"]);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.chat.model, ChatModel::Gpt35Turbo);
    }

    #[test]
    fn test_configured_api_key_wins() {
        let mut settings = Settings::default();
        settings.openai.api_key = Some("sk-from-config".to_string());
        assert_eq!(settings.api_key().as_deref(), Some("sk-from-config"));
    }

    #[test]
    fn test_resolve_config_path() {
        assert_eq!(Settings::resolve_config_path(None), Settings::default_config_path());
        assert_eq!(
            Settings::resolve_config_path(Some("./x.toml")),
            PathBuf::from("./x.toml")
        );
    }
}
