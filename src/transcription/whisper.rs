//! OpenAI Whisper transcription implementation.

use super::Transcriber;
use crate::error::{Result, VidtalkError};
use crate::openai::OpenAIClient;
use async_openai::types::{AudioInput, AudioResponseFormat, CreateTranscriptionRequestArgs};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, instrument};

/// OpenAI Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: OpenAIClient,
    model: String,
}

impl WhisperTranscriber {
    /// Create a transcriber for the given model (e.g. `whisper-1`).
    pub fn new(client: OpenAIClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    #[instrument(skip(self), fields(audio_path = %audio_path.display()))]
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        debug!("Transcribing audio file");

        let file_bytes = tokio::fs::read(audio_path).await?;

        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(
                audio_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.mp3")
                    .to_string(),
                file_bytes,
            ))
            .model(&self.model)
            .response_format(AudioResponseFormat::Json)
            .build()
            .map_err(|e| VidtalkError::Transcription(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| VidtalkError::OpenAI(format!("Whisper API error: {}", e)))?;

        let text = response.text.trim().to_string();
        debug!("Transcribed {} characters", text.len());
        Ok(text)
    }
}
