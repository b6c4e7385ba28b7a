//! Speech-to-text transcription.
//!
//! Used by the audio loader when a video has no captions.

mod whisper;

pub use whisper::WhisperTranscriber;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file into plain text.
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}
