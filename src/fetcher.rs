//! Content acquisition with a two-tier fallback.
//!
//! Captions are tried first. When they fail or come back blank, the audio track
//! is downloaded into a scoped scratch directory and transcribed. Successful
//! results are memoized per reference.

use crate::audio::AudioLoader;
use crate::cache::ContentCache;
use crate::error::{Result, VidtalkError};
use crate::session::ContentBlock;
use crate::source::require_video_id;
use crate::transcript::TranscriptService;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Which path produced a content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    /// Caption transcript.
    Transcript,
    /// Downloaded audio run through speech-to-text.
    Audio,
}

impl std::fmt::Display for ContentOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentOrigin::Transcript => write!(f, "transcript"),
            ContentOrigin::Audio => write!(f, "audio transcription"),
        }
    }
}

/// Result of a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub block: ContentBlock,
    pub origin: ContentOrigin,
}

/// Resolves video references to their spoken content.
///
/// Clones share the same cache.
#[derive(Clone)]
pub struct ContentFetcher {
    transcripts: Arc<dyn TranscriptService>,
    audio: Arc<dyn AudioLoader>,
    cache: Arc<Mutex<ContentCache>>,
    scratch_root: PathBuf,
}

impl ContentFetcher {
    /// Create a fetcher. Audio scratch directories are created under `scratch_root`.
    pub fn new(
        transcripts: Arc<dyn TranscriptService>,
        audio: Arc<dyn AudioLoader>,
        scratch_root: PathBuf,
    ) -> Self {
        Self {
            transcripts,
            audio,
            cache: Arc::new(Mutex::new(ContentCache::new())),
            scratch_root,
        }
    }

    fn cache(&self) -> MutexGuard<'_, ContentCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the content of a video.
    ///
    /// An invalid reference fails immediately without touching either path.
    /// If both paths fail, the error carries both reasons.
    #[instrument(skip(self))]
    pub async fn fetch(&self, reference: &str) -> Result<Content> {
        let video_id = require_video_id(reference)?;

        if let Some(hit) = self.cache().get(reference) {
            debug!("Content cache hit");
            return Ok(hit);
        }

        let content = match self.fetch_transcript(&video_id).await {
            Ok(block) => Content {
                block,
                origin: ContentOrigin::Transcript,
            },
            Err(transcript_err) => {
                warn!("Transcript path failed, falling back to audio: {}", transcript_err);

                match self.fetch_audio(reference).await {
                    Ok(block) => Content {
                        block,
                        origin: ContentOrigin::Audio,
                    },
                    Err(audio_err) => {
                        return Err(VidtalkError::ContentUnavailable {
                            transcript: Box::new(transcript_err),
                            audio: Box::new(audio_err),
                        });
                    }
                }
            }
        };

        info!(
            "Loaded {} characters from {}",
            content.block.len(),
            content.origin
        );
        self.cache().insert(reference, content.clone());
        Ok(content)
    }

    /// Forget the cached content for one reference.
    pub fn invalidate(&self, reference: &str) -> bool {
        self.cache().invalidate(reference)
    }

    /// Forget all cached content.
    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    /// Number of cached references.
    pub fn cached_count(&self) -> usize {
        self.cache().len()
    }

    async fn fetch_transcript(&self, video_id: &str) -> Result<ContentBlock> {
        let segments = self.transcripts.get_transcript(video_id).await?;
        let text = join_text(segments.iter().map(|s| s.text.as_str()));

        if text.trim().is_empty() {
            return Err(VidtalkError::TranscriptUnavailable(format!(
                "transcript for {} is empty ({} segments)",
                video_id,
                segments.len()
            )));
        }

        Ok(ContentBlock::new(text))
    }

    async fn fetch_audio(&self, reference: &str) -> Result<ContentBlock> {
        std::fs::create_dir_all(&self.scratch_root)?;
        let scratch = tempfile::Builder::new()
            .prefix("audio-")
            .tempdir_in(&self.scratch_root)?;

        let loaded = self.audio.load(reference, scratch.path()).await;

        // Released before the result is inspected; a dropped future releases it on drop
        if let Err(e) = scratch.close() {
            warn!("Failed to remove audio scratch directory: {}", e);
        }

        let documents = loaded?;
        let text = join_text(documents.iter().map(|d| d.page_content.as_str()));

        if text.trim().is_empty() {
            return Err(VidtalkError::Transcription(
                "no speech recognised in audio".to_string(),
            ));
        }

        Ok(ContentBlock::new(text))
    }
}

/// Join text fragments with single spaces, keeping their order.
fn join_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Document;
    use crate::transcript::TimedText;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    struct FakeTranscripts {
        result: std::result::Result<Vec<&'static str>, &'static str>,
        calls: AtomicUsize,
    }

    impl FakeTranscripts {
        fn ok(texts: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(texts),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(reason: &'static str) -> Arc<Self> {
            Arc::new(Self {
                result: Err(reason),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TranscriptService for FakeTranscripts {
        async fn get_transcript(&self, _video_id: &str) -> Result<Vec<TimedText>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(texts) => Ok(texts
                    .iter()
                    .enumerate()
                    .map(|(i, t)| TimedText::new(*t, i as f64, 1.0))
                    .collect()),
                Err(reason) => Err(VidtalkError::TranscriptUnavailable(reason.to_string())),
            }
        }
    }

    struct FakeAudio {
        result: std::result::Result<Vec<&'static str>, &'static str>,
        calls: AtomicUsize,
        seen_dir: Mutex<Option<PathBuf>>,
    }

    impl FakeAudio {
        fn ok(texts: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(texts),
                calls: AtomicUsize::new(0),
                seen_dir: Mutex::new(None),
            })
        }

        fn failing(reason: &'static str) -> Arc<Self> {
            Arc::new(Self {
                result: Err(reason),
                calls: AtomicUsize::new(0),
                seen_dir: Mutex::new(None),
            })
        }

        fn seen_dir(&self) -> PathBuf {
            self.seen_dir.lock().unwrap().clone().expect("loader was not called")
        }
    }

    #[async_trait]
    impl AudioLoader for FakeAudio {
        async fn load(&self, reference: &str, dest_dir: &Path) -> Result<Vec<Document>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_dir.lock().unwrap() = Some(dest_dir.to_path_buf());
            std::fs::write(dest_dir.join("audio.mp3"), b"fake audio")?;

            match &self.result {
                Ok(texts) => Ok(texts
                    .iter()
                    .enumerate()
                    .map(|(chunk_index, t)| Document {
                        page_content: t.to_string(),
                        source: reference.to_string(),
                        chunk_index,
                    })
                    .collect()),
                Err(reason) => Err(VidtalkError::AudioDownload(reason.to_string())),
            }
        }
    }

    fn fetcher(
        transcripts: Arc<FakeTranscripts>,
        audio: Arc<FakeAudio>,
        scratch: &Path,
    ) -> ContentFetcher {
        ContentFetcher::new(transcripts, audio, scratch.to_path_buf())
    }

    #[tokio::test]
    async fn test_fast_path_joins_segments_in_order() {
        let scratch = tempfile::tempdir().unwrap();
        let transcripts = FakeTranscripts::ok(vec!["hello", "world"]);
        let audio = FakeAudio::ok(vec!["should not be used"]);
        let fetcher = fetcher(transcripts.clone(), audio.clone(), scratch.path());

        let content = assert_ok!(fetcher.fetch("https://youtu.be/?v=ABC123").await);

        assert_eq!(content.block.as_str(), "hello world");
        assert_eq!(content.origin, ContentOrigin::Transcript);
        assert_eq!(audio.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_reference_skips_both_paths() {
        let scratch = tempfile::tempdir().unwrap();
        let transcripts = FakeTranscripts::ok(vec!["unused"]);
        let audio = FakeAudio::ok(vec!["unused"]);
        let fetcher = fetcher(transcripts.clone(), audio.clone(), scratch.path());

        let err = assert_err!(fetcher.fetch("https://youtu.be/ABC123").await);

        assert!(matches!(err, VidtalkError::InvalidReference(_)));
        assert_eq!(transcripts.calls.load(Ordering::SeqCst), 0);
        assert_eq!(audio.calls.load(Ordering::SeqCst), 0);
        assert_eq!(fetcher.cached_count(), 0);
    }

    #[tokio::test]
    async fn test_transcript_failure_falls_back_to_audio_and_cleans_up() {
        let scratch = tempfile::tempdir().unwrap();
        let transcripts = FakeTranscripts::failing("captions disabled");
        let audio = FakeAudio::ok(vec!["first piece", "second piece"]);
        let fetcher = fetcher(transcripts, audio.clone(), scratch.path());

        let content = assert_ok!(fetcher.fetch("https://www.youtube.com/watch?v=xyz").await);

        assert_eq!(content.block.as_str(), "first piece second piece");
        assert_eq!(content.origin, ContentOrigin::Audio);

        let dir = audio.seen_dir();
        assert!(dir.starts_with(scratch.path()));
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_blank_transcript_falls_back_to_audio() {
        let scratch = tempfile::tempdir().unwrap();
        let transcripts = FakeTranscripts::ok(vec!["  ", ""]);
        let audio = FakeAudio::ok(vec!["spoken words"]);
        let fetcher = fetcher(transcripts, audio.clone(), scratch.path());

        let content = assert_ok!(fetcher.fetch("https://www.youtube.com/watch?v=xyz").await);

        assert_eq!(content.block.as_str(), "spoken words");
        assert_eq!(audio.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_paths_failing_reports_both_and_cleans_up() {
        let scratch = tempfile::tempdir().unwrap();
        let transcripts = FakeTranscripts::failing("no captions");
        let audio = FakeAudio::failing("HTTP 403");
        let fetcher = fetcher(transcripts, audio.clone(), scratch.path());

        let err = assert_err!(fetcher.fetch("https://www.youtube.com/watch?v=xyz").await);

        match err {
            VidtalkError::ContentUnavailable { transcript, audio } => {
                assert!(matches!(*transcript, VidtalkError::TranscriptUnavailable(_)));
                assert!(matches!(*audio, VidtalkError::AudioDownload(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!audio.seen_dir().exists());
        assert_eq!(fetcher.cached_count(), 0);
    }

    #[tokio::test]
    async fn test_silent_audio_is_a_failure() {
        let scratch = tempfile::tempdir().unwrap();
        let fetcher = fetcher(
            FakeTranscripts::failing("no captions"),
            FakeAudio::ok(vec![" "]),
            scratch.path(),
        );

        let err = assert_err!(fetcher.fetch("https://www.youtube.com/watch?v=xyz").await);
        assert!(matches!(err, VidtalkError::ContentUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_repeated_fetch_is_memoized_until_invalidated() {
        let scratch = tempfile::tempdir().unwrap();
        let transcripts = FakeTranscripts::ok(vec!["cached"]);
        let audio = FakeAudio::ok(vec![]);
        let fetcher = fetcher(transcripts.clone(), audio, scratch.path());
        let reference = "https://www.youtube.com/watch?v=xyz";

        assert_ok!(fetcher.fetch(reference).await);
        assert_ok!(fetcher.clone().fetch(reference).await);
        assert_eq!(transcripts.calls.load(Ordering::SeqCst), 1);

        assert!(fetcher.invalidate(reference));
        assert_ok!(fetcher.fetch(reference).await);
        assert_eq!(transcripts.calls.load(Ordering::SeqCst), 2);

        fetcher.clear_cache();
        assert_eq!(fetcher.cached_count(), 0);
    }

    #[tokio::test]
    async fn test_failures_are_not_memoized() {
        let scratch = tempfile::tempdir().unwrap();
        let transcripts = FakeTranscripts::failing("offline");
        let audio = FakeAudio::failing("offline");
        let fetcher = fetcher(transcripts.clone(), audio, scratch.path());
        let reference = "https://www.youtube.com/watch?v=xyz";

        assert_err!(fetcher.fetch(reference).await);
        assert_err!(fetcher.fetch(reference).await);
        assert_eq!(transcripts.calls.load(Ordering::SeqCst), 2);
    }
}
