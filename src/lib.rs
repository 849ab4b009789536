//! Video Clipper - A Rust CLI tool for clipping social-media videos into notes
//!
//! This library downloads the audio track of a YouTube, TikTok, or Instagram Reels
//! video, transcribes it with a local whisper.cpp CLI, and renders the metadata,
//! a short summary, and the full transcript into a timestamped Markdown note.

pub mod cli;
pub mod config;
pub mod download;
pub mod note;
pub mod pipeline;
pub mod platform;
pub mod transcribe;
pub mod utils;

pub use cli::Cli;
pub use config::Config;
pub use download::{DownloadResult, Downloader, YtDlpDownloader};
pub use pipeline::{ClipOptions, ClipReport, VideoClipPipeline};
pub use platform::{Platform, VideoReference};
pub use transcribe::{ModelSize, TranscriptResult, Transcriber, WhisperCliTranscriber};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the clipper
#[derive(thiserror::Error, Debug)]
pub enum ClipperError {
    #[error("unsupported platform for URL: {0}")]
    UnsupportedPlatform(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("download failed: {0}")]
    DownloadFailed(String),

    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("failed to write note: {0}")]
    WriteFailed(String),
}
