//! Session orchestration.
//!
//! Ties the fetcher, the responder chain and one [`SessionState`] together
//! behind the three user actions: load, ask, reset.

use crate::audio::WhisperAudioLoader;
use crate::config::{ChatModel, Settings};
use crate::error::{Result, VidtalkError};
use crate::fetcher::{ContentFetcher, ContentOrigin};
use crate::openai::create_client;
use crate::responder::{OpenAiChat, ResponderChain};
use crate::session::{ContentBlock, ConversationTurn, SessionState};
use crate::transcript::YtDlpTranscripts;
use crate::transcription::WhisperTranscriber;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Drives one interactive session.
pub struct Orchestrator {
    fetcher: ContentFetcher,
    chain: Arc<ResponderChain>,
    session: SessionState,
}

impl Orchestrator {
    /// Build the production stack (yt-dlp captions, Whisper, OpenAI chat) from settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = create_client(settings)?;
        let scratch_root = settings.temp_dir();

        let transcripts = Arc::new(YtDlpTranscripts::new(
            settings.transcript.languages.clone(),
            scratch_root.clone(),
        ));
        let transcriber = Arc::new(WhisperTranscriber::new(
            client.clone(),
            &settings.transcription.model,
        ));
        let audio = Arc::new(WhisperAudioLoader::new(
            transcriber,
            settings.transcription.chunk_duration_seconds,
        ));

        let fetcher = ContentFetcher::new(transcripts, audio, scratch_root);
        let chain = Arc::new(ResponderChain::new(
            settings.prompts.clone(),
            Arc::new(OpenAiChat::new(client, settings.chat.temperature)),
        ));

        Ok(Self::with_components(fetcher, chain, settings.chat.model))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        fetcher: ContentFetcher,
        chain: Arc<ResponderChain>,
        model: ChatModel,
    ) -> Self {
        Self {
            fetcher,
            chain,
            session: SessionState::new(model),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn set_model(&mut self, model: ChatModel) {
        self.session.model = model;
    }

    /// Fetch a video's content and make it the current content block.
    ///
    /// On failure the previous content stays in place.
    #[instrument(skip(self))]
    pub async fn load(&mut self, reference: &str) -> Result<ContentOrigin> {
        let content = self.fetcher.fetch(reference).await?;

        self.session.content = content.block;
        self.session.reference = Some(reference.trim().to_string());
        info!("Session content replaced ({})", content.origin);

        Ok(content.origin)
    }

    /// Forget the cached content of the current reference, if any.
    pub fn invalidate_cache(&self) -> bool {
        match &self.session.reference {
            Some(reference) => self.fetcher.invalidate(reference),
            None => false,
        }
    }

    /// Drop the cached content of the current reference and load it again.
    pub async fn reload(&mut self) -> Result<ContentOrigin> {
        let reference = self
            .session
            .reference
            .clone()
            .ok_or_else(|| VidtalkError::InvalidInput("No video loaded yet".to_string()))?;

        self.invalidate_cache();
        self.load(&reference).await
    }

    /// Ask a question about the loaded content.
    ///
    /// Appends exactly one turn on success and nothing on failure.
    #[instrument(skip(self))]
    pub async fn ask(&mut self, question: &str) -> Result<&ConversationTurn> {
        if question.trim().is_empty() {
            return Err(VidtalkError::InvalidInput("Question is empty".to_string()));
        }

        if !self.session.has_content() {
            warn!("Asking without loaded content; the answer will not be grounded");
        }

        let answer = self
            .chain
            .respond(self.session.model, &self.session.content, question)
            .await?;

        Ok(self
            .session
            .history
            .push(ConversationTurn::new(question, answer)))
    }

    /// Clear the conversation. The loaded content is kept.
    pub fn reset(&mut self) {
        self.session.history.clear();
    }

    /// The currently loaded content block.
    pub fn content(&self) -> &ContentBlock {
        self.session.content()
    }
}
