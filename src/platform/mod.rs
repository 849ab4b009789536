use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ClipperError, Result};

/// Video hosting services the clipper understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    YouTube,
    TikTok,
    InstagramReel,
}

impl Platform {
    /// Display name used in the note frontmatter and body
    pub fn name(&self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::TikTok => "TikTok",
            Platform::InstagramReel => "Instagram Reels",
        }
    }

    /// Lowercase slug used as a note tag
    pub fn slug(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::TikTok => "tiktok",
            Platform::InstagramReel => "reel",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A URL classified by platform; immutable once resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoReference {
    pub url: String,
    pub platform: Platform,
}

/// Classify a URL by hostname into a [`VideoReference`].
///
/// Malformed URLs, non-http(s) schemes, and unrecognized hosts all fail with
/// `UnsupportedPlatform`; no partial processing is attempted.
pub fn resolve(url: &str) -> Result<VideoReference> {
    let parsed =
        Url::parse(url).map_err(|_| ClipperError::UnsupportedPlatform(url.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClipperError::UnsupportedPlatform(url.to_string()).into());
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| ClipperError::UnsupportedPlatform(url.to_string()))?
        .to_lowercase();
    let host = host.trim_start_matches("www.");

    let platform = if host == "youtube.com" || host.ends_with(".youtube.com") || host == "youtu.be"
    {
        Platform::YouTube
    } else if host == "tiktok.com" || host.ends_with(".tiktok.com") {
        Platform::TikTok
    } else if host == "instagram.com" || host.ends_with(".instagram.com") {
        // Instagram links without an explicit /reel/ path are assumed to be reels
        Platform::InstagramReel
    } else {
        return Err(ClipperError::UnsupportedPlatform(url.to_string()).into());
    };

    Ok(VideoReference {
        url: url.to_string(),
        platform,
    })
}
