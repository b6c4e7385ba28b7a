//! Configuration module for vidtalk.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::ChatPrompts;
pub use settings::{
    ChatModel, ChatSettings, GeneralSettings, OpenAISettings, Settings, TranscriptSettings,
    TranscriptionSettings,
};
