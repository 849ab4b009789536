use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::platform::VideoReference;
use crate::{ClipperError, Result};

/// Audio file plus best-effort metadata produced by a downloader
#[derive(Debug, Clone)]
pub struct DownloadResult {
    /// Path to the extracted audio file inside the run's working directory
    pub audio_path: PathBuf,

    /// Video title if the source exposes it
    pub title: Option<String>,

    /// Uploader/creator name if available
    pub creator: Option<String>,

    /// Upload date as reported by the source (YYYYMMDD)
    pub upload_date: Option<String>,

    /// Duration in seconds if available
    pub duration_seconds: Option<f64>,
}

/// Narrow seam over the external downloader so tests can inject stubs
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download the best-available audio track into `workdir` and collect metadata
    async fn fetch(&self, video: &VideoReference, workdir: &Path) -> Result<DownloadResult>;
}

/// Metadata subset of yt-dlp's `--print-json` output
#[derive(Debug, Deserialize)]
struct YtDlpMetadata {
    id: Option<String>,
    title: Option<String>,
    uploader: Option<String>,
    upload_date: Option<String>,
    duration: Option<f64>,
}

/// Downloader backed by the yt-dlp CLI
pub struct YtDlpDownloader {
    yt_dlp_path: String,
}

impl YtDlpDownloader {
    pub fn new(yt_dlp_path: impl Into<String>) -> Self {
        Self {
            yt_dlp_path: yt_dlp_path.into(),
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> bool {
        Command::new(&self.yt_dlp_path)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

impl Default for YtDlpDownloader {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

#[async_trait]
impl Downloader for YtDlpDownloader {
    async fn fetch(&self, video: &VideoReference, workdir: &Path) -> Result<DownloadResult> {
        let output_template = workdir.join("%(id)s.%(ext)s");

        tracing::debug!("invoking yt-dlp for {}", video.url);

        let output = Command::new(&self.yt_dlp_path)
            .args([
                "-x",
                "--audio-format",
                "mp3",
                "--audio-quality",
                "192K",
                "--print-json",
                "--no-playlist",
                "--no-warnings",
                "--quiet",
                "-o",
            ])
            .arg(&output_template)
            .arg(&video.url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                ClipperError::DownloadFailed(format!(
                    "failed to run {}: {e}. Install it: https://github.com/yt-dlp/yt-dlp",
                    self.yt_dlp_path
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(ClipperError::DownloadFailed(format!("yt-dlp failed: {message}")).into());
        }

        let info: YtDlpMetadata = serde_json::from_slice(&output.stdout).map_err(|e| {
            ClipperError::DownloadFailed(format!("could not parse yt-dlp metadata: {e}"))
        })?;

        // yt-dlp names the extracted audio after the video id
        let video_id = info.id.as_deref().unwrap_or("video");
        let audio_path = workdir.join(format!("{video_id}.mp3"));

        if !audio_path.exists() {
            return Err(ClipperError::DownloadFailed(format!(
                "expected audio file was not produced: {}",
                audio_path.display()
            ))
            .into());
        }

        tracing::debug!("downloaded audio to {}", audio_path.display());

        Ok(DownloadResult {
            audio_path,
            title: info.title,
            creator: info.uploader,
            upload_date: info.upload_date,
            duration_seconds: info.duration,
        })
    }
}
