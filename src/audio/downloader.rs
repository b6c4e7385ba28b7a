//! Audio download and splitting.
//!
//! Downloads the audio track of a video with yt-dlp and cuts it into pieces
//! small enough for the transcription API with ffmpeg.

use crate::error::{Result, VidtalkError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// File stem used for the downloaded track inside the scratch directory.
const AUDIO_STEM: &str = "audio";

/// Tails shorter than this are merged into the previous piece; Whisper rejects very short audio.
const MIN_TAIL_SECONDS: f64 = 1.0;

/// Downloads the audio track of `url` into `output_dir` as MP3.
#[instrument(skip(output_dir))]
pub async fn download_audio(url: &str, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let target_path = output_dir.join(format!("{}.mp3", AUDIO_STEM));
    let template = output_dir.join(format!("{}.%(ext)s", AUDIO_STEM));

    info!("Downloading audio from {}", url);

    let result = Command::new("yt-dlp")
        .arg("--format").arg("bestaudio/best")
        .arg("--extract-audio")
        .arg("--audio-format").arg("mp3")
        .arg("--output").arg(&template)
        .arg("--no-playlist")
        .arg("--quiet")
        .arg("--no-warnings")
        .arg(url)
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
            return Err(VidtalkError::AudioDownload(format!("yt-dlp execution failed: {e}")));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VidtalkError::AudioDownload(format!("yt-dlp failed: {}", stderr.trim())));
    }

    // yt-dlp may leave a different container behind when post-processing is skipped
    let downloaded = find_audio_file(output_dir)?;

    if downloaded != target_path {
        normalize_to_mp3(&downloaded, &target_path).await?;
        let _ = std::fs::remove_file(&downloaded);
    }

    Ok(target_path)
}

/// Locates the downloaded audio file in the scratch directory.
fn find_audio_file(dir: &Path) -> Result<PathBuf> {
    for ext in &["mp3", "opus", "m4a", "webm", "ogg"] {
        let candidate = dir.join(format!("{}.{}", AUDIO_STEM, ext));
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| VidtalkError::AudioDownload(format!("Cannot read directory: {e}")))?;

    for entry in entries.flatten() {
        if entry.file_name().to_string_lossy().starts_with(AUDIO_STEM) {
            return Ok(entry.path());
        }
    }

    Err(VidtalkError::AudioDownload("Audio file not found after download".into()))
}

/// Converts an audio file to MP3 using ffmpeg.
async fn normalize_to_mp3(source: &Path, dest: &Path) -> Result<()> {
    debug!("Converting {:?} to MP3", source);

    let result = Command::new("ffmpeg")
        .arg("-i").arg(source)
        .arg("-vn")
        .arg("-codec:a").arg("libmp3lame")
        .arg("-qscale:a").arg("2")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(VidtalkError::AudioDownload(format!("ffmpeg conversion failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(VidtalkError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(VidtalkError::AudioDownload(format!("ffmpeg error: {e}"))),
    }
}

/// Splits an audio file into pieces of roughly `chunk_seconds` each.
///
/// Returns the pieces in playback order. Audio shorter than one chunk is
/// returned as-is.
#[instrument(skip_all)]
pub async fn split_audio(
    source: &Path,
    output_dir: &Path,
    chunk_seconds: u32,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let total_duration = probe_duration(source).await?;
    info!("Total audio duration: {:.1}s", total_duration);

    let chunk_len = chunk_seconds.max(1) as f64;
    let offsets = chunk_offsets(total_duration, chunk_len);

    if offsets.len() <= 1 {
        return Ok(vec![source.to_path_buf()]);
    }

    let base_name = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(AUDIO_STEM);

    let mut segments = Vec::with_capacity(offsets.len());
    for (idx, &offset) in offsets.iter().enumerate() {
        let segment_path = output_dir.join(format!("{}_{:04}.mp3", base_name, idx));
        let end = offsets.get(idx + 1).copied().unwrap_or(total_duration);
        let segment_len = end - offset;

        extract_segment(source, &segment_path, offset, segment_len).await?;

        debug!("Created segment {} at offset {:.1}s", idx, offset);
        segments.push(segment_path);
    }

    info!("Created {} audio segments", segments.len());
    Ok(segments)
}

/// Start offsets of each chunk for a track of `total` seconds.
fn chunk_offsets(total: f64, chunk_len: f64) -> Vec<f64> {
    if total <= chunk_len {
        return vec![0.0];
    }

    let mut offsets = Vec::new();
    let mut offset = 0.0;
    while offset < total {
        offsets.push(offset);
        offset += chunk_len;
    }

    // Dropping the last offset stretches the previous piece to the end of the track
    if offsets.len() > 1 && offsets.last().is_some_and(|&last| total - last < MIN_TAIL_SECONDS) {
        offsets.pop();
    }
    offsets
}

/// Extracts a time segment from an audio file.
async fn extract_segment(source: &Path, dest: &Path, start: f64, length: f64) -> Result<()> {
    // Stream copy first; it is lossless and fast
    let copy_result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-c").arg("copy")
        .arg("-y")
        .arg("-loglevel").arg("warning")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    if let Ok(status) = copy_result {
        if status.success() && dest.exists() {
            return Ok(());
        }
    }

    warn!("Stream copy failed, re-encoding segment");

    let encode_result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-codec:a").arg("libmp3lame")
        .arg("-qscale:a").arg("2")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match encode_result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(VidtalkError::AudioDownload(format!("Segment extraction failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(VidtalkError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(VidtalkError::AudioDownload(format!("ffmpeg error: {e}"))),
    }
}

/// Queries the duration of an audio file using ffprobe with JSON output.
async fn probe_duration(path: &Path) -> Result<f64> {
    let result = Command::new("ffprobe")
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .arg("-show_format")
        .arg(path)
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(VidtalkError::ToolNotFound("ffprobe".into()));
        }
        Err(e) => {
            return Err(VidtalkError::AudioDownload(format!("ffprobe failed: {e}")));
        }
    };

    if !output.status.success() {
        return Err(VidtalkError::AudioDownload("ffprobe returned error".into()));
    }

    parse_probe_duration(&String::from_utf8_lossy(&output.stdout))
}

fn parse_probe_duration(json_str: &str) -> Result<f64> {
    let parsed: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|_| VidtalkError::AudioDownload("Invalid ffprobe output".into()))?;

    parsed["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| VidtalkError::AudioDownload("Could not determine audio duration".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_offsets() {
        assert_eq!(chunk_offsets(30.0, 120.0), vec![0.0]);
        assert_eq!(chunk_offsets(120.0, 120.0), vec![0.0]);
        assert_eq!(chunk_offsets(250.0, 120.0), vec![0.0, 120.0, 240.0]);
    }

    #[test]
    fn test_chunk_offsets_merges_short_tail() {
        let total = 2400.05;
        let offsets = chunk_offsets(total, 1200.0);
        assert_eq!(offsets, vec![0.0, 1200.0]);

        let last_len = total - offsets.last().unwrap();
        assert!(last_len >= MIN_TAIL_SECONDS);

        assert_eq!(chunk_offsets(2401.5, 1200.0), vec![0.0, 1200.0, 2400.0]);
    }

    #[test]
    fn test_parse_probe_duration() {
        let json = r#"{"format": {"filename": "audio.mp3", "duration": "184.320000"}}"#;
        assert_eq!(parse_probe_duration(json).unwrap(), 184.32);

        assert!(parse_probe_duration(r#"{"format": {}}"#).is_err());
        assert!(parse_probe_duration("not json").is_err());
    }

    #[test]
    fn test_find_audio_file_prefers_known_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("audio.webm"), b"x").unwrap();
        std::fs::write(dir.path().join("audio.m4a"), b"x").unwrap();

        let found = find_audio_file(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("audio.m4a"));
    }

    #[test]
    fn test_find_audio_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            find_audio_file(dir.path()),
            Err(VidtalkError::AudioDownload(_))
        ));
    }
}
