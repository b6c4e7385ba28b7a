//! Error types for vidtalk.

use thiserror::Error;

/// Library-level error type for vidtalk operations.
#[derive(Error, Debug)]
pub enum VidtalkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid video URL: {0}")]
    InvalidReference(String),

    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Audio download failed: {0}")]
    AudioDownload(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Could not extract any content (transcript: {transcript}; audio: {audio})")]
    ContentUnavailable {
        transcript: Box<VidtalkError>,
        audio: Box<VidtalkError>,
    },

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Coarse failure category, used by the presenter to label an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The video reference has no usable identifier.
    InvalidReference,
    /// Neither the transcript service nor the audio path produced text.
    Content,
    /// The language model call failed.
    Model,
    /// Local setup problem (config, missing tool, bad input).
    Setup,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::InvalidReference => write!(f, "invalid url"),
            FailureKind::Content => write!(f, "content"),
            FailureKind::Model => write!(f, "model"),
            FailureKind::Setup => write!(f, "setup"),
        }
    }
}

impl VidtalkError {
    /// Classify this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            VidtalkError::InvalidReference(_) => FailureKind::InvalidReference,
            VidtalkError::TranscriptUnavailable(_)
            | VidtalkError::AudioDownload(_)
            | VidtalkError::Transcription(_)
            | VidtalkError::ContentUnavailable { .. } => FailureKind::Content,
            VidtalkError::OpenAI(_) | VidtalkError::EmptyResponse | VidtalkError::Http(_) => {
                FailureKind::Model
            }
            VidtalkError::Config(_)
            | VidtalkError::Io(_)
            | VidtalkError::Json(_)
            | VidtalkError::TomlParse(_)
            | VidtalkError::ToolNotFound(_)
            | VidtalkError::InvalidInput(_) => FailureKind::Setup,
        }
    }
}

/// Result type alias for vidtalk operations.
pub type Result<T> = std::result::Result<T, VidtalkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            VidtalkError::InvalidReference("x".into()).kind(),
            FailureKind::InvalidReference
        );
        assert_eq!(VidtalkError::EmptyResponse.kind(), FailureKind::Model);

        let both = VidtalkError::ContentUnavailable {
            transcript: Box::new(VidtalkError::TranscriptUnavailable("none".into())),
            audio: Box::new(VidtalkError::AudioDownload("403".into())),
        };
        assert_eq!(both.kind(), FailureKind::Content);
        let msg = both.to_string();
        assert!(msg.contains("none"));
        assert!(msg.contains("403"));
    }
}
