//! Question answering over a content block.
//!
//! The chain renders the prompt templates with the question and the full
//! content, then hands the messages to a chat backend.

use crate::config::{ChatModel, ChatPrompts};
use crate::error::{Result, VidtalkError};
use crate::openai::OpenAIClient;
use crate::session::ContentBlock;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// System and user messages ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

/// Trait for hosted chat models.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Return a single text completion for the prompt.
    async fn complete(&self, model: ChatModel, prompt: &RenderedPrompt) -> Result<String>;
}

/// Chat completions through the OpenAI API.
pub struct OpenAiChat {
    client: OpenAIClient,
    temperature: f32,
}

impl OpenAiChat {
    pub fn new(client: OpenAIClient, temperature: f32) -> Self {
        Self {
            client,
            temperature,
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiChat {
    #[instrument(skip(self, prompt), fields(model = %model))]
    async fn complete(&self, model: ChatModel, prompt: &RenderedPrompt) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(prompt.system.clone())
                .build()
                .map_err(|e| VidtalkError::OpenAI(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.user.clone())
                .build()
                .map_err(|e| VidtalkError::OpenAI(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(model.as_str())
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| VidtalkError::OpenAI(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            VidtalkError::OpenAI(format!("Failed to generate response: {}", e))
        })?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .filter(|text| !text.trim().is_empty())
            .ok_or(VidtalkError::EmptyResponse)?
            .clone();

        debug!("Model returned {} characters", answer.len());
        Ok(answer)
    }
}

/// Prompt templates plus a chat backend.
pub struct ResponderChain {
    prompts: ChatPrompts,
    backend: Arc<dyn ChatBackend>,
}

impl ResponderChain {
    pub fn new(prompts: ChatPrompts, backend: Arc<dyn ChatBackend>) -> Self {
        let missing = prompts.missing_placeholders();
        if !missing.is_empty() {
            warn!("User prompt template has no placeholder for: {}", missing.join(", "));
        }

        Self { prompts, backend }
    }

    /// Fill the templates for one question. The content is passed verbatim.
    pub fn render(&self, content: &ContentBlock, question: &str) -> RenderedPrompt {
        let mut vars = HashMap::new();
        vars.insert("question", question);
        vars.insert("content", content.as_str());

        RenderedPrompt {
            system: self.prompts.system.clone(),
            user: ChatPrompts::render(&self.prompts.user, &vars),
        }
    }

    /// Answer `question` about `content` with the selected model.
    #[instrument(skip(self, content), fields(question = %question))]
    pub async fn respond(
        &self,
        model: ChatModel,
        content: &ContentBlock,
        question: &str,
    ) -> Result<String> {
        info!("Asking {} ({} content words)", model, content.word_count());
        let prompt = self.render(content, question);
        self.backend.complete(model, &prompt).await
    }
}
