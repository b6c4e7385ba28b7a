//! Video reference handling.
//!
//! A video reference is the URL the user pastes. The only thing parsed out of it
//! is the `v` query parameter, which is the identifier the transcript service is
//! keyed by.

use crate::error::{Result, VidtalkError};
use url::Url;

/// Extract the video identifier from a reference.
///
/// Returns `None` for strings that are not URLs and for URLs without a
/// non-empty `v` query parameter.
pub fn extract_video_id(reference: &str) -> Option<String> {
    let url = Url::parse(reference.trim()).ok()?;

    url.query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.trim().to_string())
        .filter(|id| !id.is_empty())
}

/// Like [`extract_video_id`], but reports the invalid-reference condition.
pub fn require_video_id(reference: &str) -> Result<String> {
    extract_video_id(reference).ok_or_else(|| {
        VidtalkError::InvalidReference(format!(
            "'{}' has no video id. Please provide a URL like https://www.youtube.com/watch?v=...",
            reference.trim()
        ))
    })
}

/// Canonical watch URL for an identifier.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtu.be/?v=ABC123"),
            Some("ABC123".to_string())
        );
        assert_eq!(
            extract_video_id("  https://www.youtube.com/watch?list=PL1&v=abc&t=42s "),
            Some("abc".to_string())
        );
    }

    #[test]
    fn test_extract_video_id_invalid() {
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v="), None);
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_require_video_id_reports_invalid_reference() {
        let err = require_video_id("https://example.com/video").unwrap_err();
        assert!(matches!(err, VidtalkError::InvalidReference(_)));
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(watch_url("abc"), "https://www.youtube.com/watch?v=abc");
    }
}
