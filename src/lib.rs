//! vidtalk - chat with the spoken content of a video
//!
//! Give it a video URL and it pulls the spoken content as text, from the
//! video's captions when there are any and from a speech-to-text pass over the
//! downloaded audio when there are not. Questions about that text are then
//! answered by an OpenAI chat model, turn by turn.
//!
//! # Architecture
//!
//! - `source` - Video reference parsing
//! - `transcript` - Caption transcripts (fast path)
//! - `audio` - Audio download and the audio loader (slow path)
//! - `transcription` - Speech-to-text
//! - `fetcher` / `cache` - Two-tier content acquisition with memoization
//! - `responder` - Prompt rendering and the chat backend
//! - `session` - Content block and conversation history
//! - `orchestrator` - The load / ask / reset actions over one session
//! - `cli` - Interactive terminal front end
//!
//! # Example
//!
//! ```rust,no_run
//! use vidtalk::config::Settings;
//! use vidtalk::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let mut orchestrator = Orchestrator::new(&settings)?;
//!
//!     orchestrator.load("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
//!     let turn = orchestrator.ask("Give me a summary").await?;
//!     println!("{}", turn.answer());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod openai;
pub mod orchestrator;
pub mod responder;
pub mod session;
pub mod source;
pub mod transcript;
pub mod transcription;

pub use error::{FailureKind, Result, VidtalkError};
