//! yt-dlp + Whisper audio loader.

use super::{download_audio, split_audio, AudioLoader, Document};
use crate::error::{Result, VidtalkError};
use crate::transcription::Transcriber;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Downloads audio with yt-dlp and transcribes it piece by piece.
pub struct WhisperAudioLoader {
    transcriber: Arc<dyn Transcriber>,
    chunk_duration_seconds: u32,
}

impl WhisperAudioLoader {
    pub fn new(transcriber: Arc<dyn Transcriber>, chunk_duration_seconds: u32) -> Self {
        Self {
            transcriber,
            chunk_duration_seconds,
        }
    }
}

#[async_trait]
impl AudioLoader for WhisperAudioLoader {
    #[instrument(skip(self, dest_dir))]
    async fn load(&self, reference: &str, dest_dir: &Path) -> Result<Vec<Document>> {
        let audio_path = download_audio(reference, dest_dir).await?;
        let pieces = split_audio(
            &audio_path,
            &dest_dir.join("pieces"),
            self.chunk_duration_seconds,
        )
        .await?;

        info!("Transcribing {} audio piece(s)", pieces.len());

        let mut documents = Vec::with_capacity(pieces.len());
        for (chunk_index, piece) in pieces.iter().enumerate() {
            let page_content = self.transcriber.transcribe(piece).await.map_err(|e| {
                VidtalkError::Transcription(format!("piece {}: {}", chunk_index, e))
            })?;

            documents.push(Document {
                page_content,
                source: reference.to_string(),
                chunk_index,
            });
        }

        Ok(documents)
    }
}
