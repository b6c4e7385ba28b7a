//! Caption transcripts: the fast path for getting a video's spoken content.

mod ytdlp;

pub use ytdlp::{parse_json3, YtDlpTranscripts};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One timed caption segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedText {
    /// Caption text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

impl TimedText {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// Trait for transcript services keyed by video identifier.
#[async_trait]
pub trait TranscriptService: Send + Sync {
    /// Fetch the ordered caption segments for a video.
    async fn get_transcript(&self, video_id: &str) -> Result<Vec<TimedText>>;
}
