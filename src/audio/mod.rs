//! Audio path: download a video's audio track and turn it into text documents.

mod downloader;
mod loader;

pub use downloader::{download_audio, split_audio};
pub use loader::WhisperAudioLoader;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A piece of transcribed text produced by an [`AudioLoader`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Transcribed text of this piece.
    pub page_content: String,
    /// Reference the audio came from.
    pub source: String,
    /// Position of this piece in the track.
    pub chunk_index: usize,
}

/// Trait for loaders that turn a video reference into transcribed documents.
///
/// Everything the loader writes must go under `dest_dir`; the caller owns and
/// removes that directory.
#[async_trait]
pub trait AudioLoader: Send + Sync {
    /// Download and transcribe the audio of `reference`, in playback order.
    async fn load(&self, reference: &str, dest_dir: &Path) -> Result<Vec<Document>>;
}
