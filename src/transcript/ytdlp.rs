//! Caption download through yt-dlp.

use super::{TimedText, TranscriptService};
use crate::error::{Result, VidtalkError};
use crate::source::watch_url;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Fetches manual or automatic captions with yt-dlp in json3 format.
pub struct YtDlpTranscripts {
    languages: Vec<String>,
    scratch_root: PathBuf,
}

impl YtDlpTranscripts {
    pub fn new(languages: Vec<String>, scratch_root: PathBuf) -> Self {
        Self {
            languages,
            scratch_root,
        }
    }

    /// Run yt-dlp and return the path of the caption file it wrote, if any.
    async fn download_captions(&self, video_id: &str, dest: &Path) -> Result<Option<PathBuf>> {
        let template = dest.join("%(id)s.%(ext)s");

        let result = Command::new("yt-dlp")
            .arg("--skip-download")
            .arg("--write-subs")
            .arg("--write-auto-subs")
            .arg("--sub-langs").arg(self.languages.join(","))
            .arg("--sub-format").arg("json3")
            .arg("--output").arg(&template)
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(watch_url(video_id))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VidtalkError::ToolNotFound("yt-dlp".into()));
            }
            Err(e) => {
                return Err(VidtalkError::TranscriptUnavailable(format!(
                    "yt-dlp execution failed: {e}"
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VidtalkError::TranscriptUnavailable(format!(
                "yt-dlp failed: {}",
                stderr.trim()
            )));
        }

        let mut candidates: Vec<PathBuf> = std::fs::read_dir(dest)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json3"))
            .collect();
        candidates.sort();

        debug!("yt-dlp wrote {} caption file(s)", candidates.len());
        Ok(candidates.into_iter().next())
    }
}

#[async_trait]
impl TranscriptService for YtDlpTranscripts {
    #[instrument(skip(self))]
    async fn get_transcript(&self, video_id: &str) -> Result<Vec<TimedText>> {
        std::fs::create_dir_all(&self.scratch_root)?;
        let scratch = tempfile::Builder::new()
            .prefix("captions-")
            .tempdir_in(&self.scratch_root)?;

        let captions = self
            .download_captions(video_id, scratch.path())
            .await?
            .ok_or_else(|| {
                VidtalkError::TranscriptUnavailable(format!(
                    "no captions in [{}] for video {}",
                    self.languages.join(", "),
                    video_id
                ))
            })?;

        let raw = std::fs::read_to_string(&captions)?;
        let segments = parse_json3(&raw)?;
        info!("Fetched {} caption segments", segments.len());

        if let Err(e) = scratch.close() {
            warn!("Failed to remove caption scratch directory: {}", e);
        }

        Ok(segments)
    }
}

#[derive(Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse a json3 caption document into ordered segments.
///
/// Each event becomes one segment; line breaks inside an event become spaces
/// and events with no visible text are dropped.
pub fn parse_json3(raw: &str) -> Result<Vec<TimedText>> {
    let doc: Json3 = serde_json::from_str(raw)?;

    Ok(doc
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.replace('\n', " ").trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(TimedText::new(
                text,
                event.t_start_ms as f64 / 1000.0,
                event.d_duration_ms as f64 / 1000.0,
            ))
        })
        .collect())
}
