//! Media kind classification against the configured extension allow-lists

use std::path::Path;

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Media kinds the pipeline accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    /// Still image input
    Image,
    /// Video input
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// Immutable set of permitted file extensions per media kind
///
/// Loaded once at process start and shared read-only across requests.
/// Classification is a pure function of the filename extension; no file
/// content is inspected.
#[derive(Debug, Clone)]
pub struct AllowListPolicy {
    image_exts: Vec<String>,
    video_exts: Vec<String>,
}

impl Default for AllowListPolicy {
    fn default() -> Self {
        Self {
            image_exts: vec!["jpg".into(), "jpeg".into(), "png".into()],
            video_exts: vec!["mp4".into(), "avi".into(), "mov".into()],
        }
    }
}

impl AllowListPolicy {
    /// Build a policy from explicit extension lists (without leading dots)
    #[must_use]
    pub fn new(image_exts: Vec<String>, video_exts: Vec<String>) -> Self {
        let normalize = |exts: Vec<String>| {
            exts.into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect()
        };
        Self {
            image_exts: normalize(image_exts),
            video_exts: normalize(video_exts),
        }
    }

    /// Classify a local path by its extension, case-insensitively
    ///
    /// Returns `None` for anything not in the allow-lists. Never errors.
    #[must_use]
    pub fn classify(&self, path: &Path) -> Option<MediaKind> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.classify_ext(&ext)
    }

    /// Classify the candidate extension recovered from a URL's path
    ///
    /// Used to reject unsupported media before any network I/O happens.
    #[must_use]
    pub fn classify_url(&self, url: &Url) -> Option<MediaKind> {
        self.classify(Path::new(url.path()))
    }

    /// Extension (without dot, lowercased) recovered from a URL's path
    #[must_use]
    pub fn url_extension(url: &Url) -> Option<String> {
        Path::new(url.path())
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }

    fn classify_ext(&self, ext: &str) -> Option<MediaKind> {
        if self.image_exts.iter().any(|e| e == ext) {
            Some(MediaKind::Image)
        } else if self.video_exts.iter().any(|e| e == ext) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}
