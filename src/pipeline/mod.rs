use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::Config;
use crate::download::{DownloadResult, Downloader, YtDlpDownloader};
use crate::platform::{self, Platform, VideoReference};
use crate::transcribe::{ModelSize, Transcriber, WhisperCliTranscriber};
use crate::{note, ClipperError, Result};

/// Per-run settings resolved from CLI flags and configuration
#[derive(Debug, Clone)]
pub struct ClipOptions {
    pub model: ModelSize,
    pub keep_audio: bool,
    pub quiet: bool,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct ClipReport {
    pub note_path: PathBuf,
    pub audio_path: Option<PathBuf>,
    pub platform: Platform,
    pub transcript_chars: usize,
}

/// Sequences resolve, download, transcribe, and compose, then applies the
/// keep-audio policy.
pub struct VideoClipPipeline {
    config: Config,
    downloader: Box<dyn Downloader>,
    transcriber: Box<dyn Transcriber>,
}

impl VideoClipPipeline {
    /// Create a pipeline wired to the real yt-dlp and whisper-cli adapters
    pub fn new(config: Config) -> Self {
        let downloader = YtDlpDownloader::new(config.tools.yt_dlp.clone());
        let transcriber = WhisperCliTranscriber::new(
            config.tools.whisper_cli.clone(),
            config.transcription.model_dirs.clone(),
        );

        Self {
            config,
            downloader: Box::new(downloader),
            transcriber: Box::new(transcriber),
        }
    }

    /// Create a pipeline with injected adapters; used by tests to substitute stubs
    pub fn with_components(
        config: Config,
        downloader: Box<dyn Downloader>,
        transcriber: Box<dyn Transcriber>,
    ) -> Self {
        Self {
            config,
            downloader,
            transcriber,
        }
    }

    /// Run the full pipeline for one URL.
    ///
    /// Any stage failure aborts the run and leaves the working directory in
    /// place for diagnosis; the downloaded audio is never deleted on failure.
    pub async fn run(
        &self,
        url: &str,
        output_dir: &Path,
        options: &ClipOptions,
    ) -> Result<ClipReport> {
        let timestamp = Local::now().naive_local();

        tracing::info!("resolving platform for {url}");
        let video = platform::resolve(url)?;
        tracing::info!("detected platform: {}", video.platform);

        let workdir = self.create_workdir()?;

        match self
            .execute(&video, workdir.path(), output_dir, timestamp, options)
            .await
        {
            Ok((note_path, download, transcript_chars)) => {
                let audio_path = if options.keep_audio {
                    match self.preserve_audio(&download, output_dir, timestamp) {
                        Ok(path) => Some(path),
                        Err(err) => {
                            let kept = workdir.into_path();
                            tracing::warn!(
                                "keeping working directory {} for inspection",
                                kept.display()
                            );
                            return Err(err);
                        }
                    }
                } else {
                    None
                };

                // Cleanup failure must not turn a successful run into a failure
                if let Err(err) = workdir.close() {
                    tracing::warn!("failed to remove working directory: {err}");
                }

                Ok(ClipReport {
                    note_path,
                    audio_path,
                    platform: video.platform,
                    transcript_chars,
                })
            }
            Err(err) => {
                let kept = workdir.into_path();
                tracing::warn!("keeping working directory {} for inspection", kept.display());
                Err(err)
            }
        }
    }

    /// Download, transcribe, compose, and write the note
    async fn execute(
        &self,
        video: &VideoReference,
        workdir: &Path,
        output_dir: &Path,
        timestamp: NaiveDateTime,
        options: &ClipOptions,
    ) -> Result<(PathBuf, DownloadResult, usize)> {
        let spinner = self.spinner(options.quiet);
        spinner.set_message("Downloading audio with yt-dlp...");
        let download = self.downloader.fetch(video, workdir).await?;
        spinner.finish_with_message("Download complete");
        tracing::info!(
            "downloaded: {}",
            download.title.as_deref().unwrap_or("Unknown")
        );

        let spinner = self.spinner(options.quiet);
        spinner.set_message(format!(
            "Transcribing audio with whisper-cli (model: {})...",
            options.model
        ));
        let transcript = self
            .transcriber
            .transcribe(&download.audio_path, options.model)
            .await?;
        spinner.finish_with_message("Transcription complete");
        tracing::info!("transcription complete ({} characters)", transcript.text.len());

        let transcript_chars = transcript.text.len();
        let note = note::compose(video, &download, &transcript, timestamp);
        let note_path = note::write(&note, output_dir)?;
        tracing::info!("note saved to {}", note_path.display());

        Ok((note_path, download, transcript_chars))
    }

    /// Per-run working directory with a randomized name, so concurrent
    /// invocations never collide on an intermediate filename.
    fn create_workdir(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("video-clip-");

        let workdir = match &self.config.app.temp_dir {
            Some(base) => {
                fs_err::create_dir_all(base)
                    .context("failed to create configured temp directory")?;
                builder.tempdir_in(base)
            }
            None => builder.tempdir(),
        }
        .context("failed to create working directory")?;

        tracing::debug!("working directory: {}", workdir.path().display());
        Ok(workdir)
    }

    /// Copy the intermediate audio next to the note under the run's timestamp
    fn preserve_audio(
        &self,
        download: &DownloadResult,
        output_dir: &Path,
        timestamp: NaiveDateTime,
    ) -> Result<PathBuf> {
        let extension = download
            .audio_path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("mp3");
        let destination = output_dir.join(note::audio_filename(timestamp, extension));

        fs_err::copy(&download.audio_path, &destination)
            .map_err(|e| ClipperError::WriteFailed(format!("could not keep audio file: {e}")))?;

        Ok(destination)
    }

    fn spinner(&self, quiet: bool) -> ProgressBar {
        if quiet {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        spinner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcribe::TranscriptResult;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct StubDownloader {
        fail: bool,
        written_audio: Arc<Mutex<Option<PathBuf>>>,
    }

    #[async_trait]
    impl Downloader for StubDownloader {
        async fn fetch(&self, _video: &VideoReference, workdir: &Path) -> Result<DownloadResult> {
            if self.fail {
                return Err(ClipperError::DownloadFailed("stub download error".into()).into());
            }

            let audio_path = workdir.join("abc123.mp3");
            fs_err::write(&audio_path, b"stub audio bytes")?;
            *self.written_audio.lock().unwrap() = Some(audio_path.clone());

            Ok(DownloadResult {
                audio_path,
                title: Some("Test Video".to_string()),
                creator: Some("TestChannel".to_string()),
                upload_date: Some("20240310".to_string()),
                duration_seconds: Some(120.0),
            })
        }
    }

    struct StubTranscriber {
        fail: bool,
    }

    #[async_trait]
    impl Transcriber for StubTranscriber {
        async fn transcribe(
            &self,
            _audio_path: &Path,
            _model: ModelSize,
        ) -> Result<TranscriptResult> {
            if self.fail {
                return Err(
                    ClipperError::TranscriptionFailed("stub transcription error".into()).into(),
                );
            }
            Ok(TranscriptResult {
                text: "This is the transcript.".to_string(),
            })
        }
    }

    fn stub_pipeline(
        download_fails: bool,
        transcription_fails: bool,
    ) -> (VideoClipPipeline, Arc<Mutex<Option<PathBuf>>>) {
        let written_audio = Arc::new(Mutex::new(None));
        let pipeline = VideoClipPipeline::with_components(
            Config::default(),
            Box::new(StubDownloader {
                fail: download_fails,
                written_audio: written_audio.clone(),
            }),
            Box::new(StubTranscriber {
                fail: transcription_fails,
            }),
        );
        (pipeline, written_audio)
    }

    fn options(keep_audio: bool) -> ClipOptions {
        ClipOptions {
            model: ModelSize::Base,
            keep_audio,
            quiet: true,
        }
    }

    #[tokio::test]
    async fn successful_run_writes_a_single_note() {
        let output = tempfile::tempdir().unwrap();
        let (pipeline, written_audio) = stub_pipeline(false, false);

        let report = pipeline
            .run(
                "https://youtube.com/watch?v=abc123",
                output.path(),
                &options(false),
            )
            .await
            .unwrap();

        assert_eq!(report.platform, Platform::YouTube);
        assert!(report.audio_path.is_none());
        assert_eq!(report.transcript_chars, "This is the transcript.".len());

        let entries: Vec<_> = fs_err::read_dir(output.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with("-video-clip.md"));

        let content = fs_err::read_to_string(&report.note_path).unwrap();
        assert!(content.contains("platform: YouTube"));
        assert!(content.contains("creator: \"TestChannel\""));
        assert!(content.contains("This is the transcript."));

        // Without --keep-audio the intermediate audio is removed with the workdir
        let audio = written_audio.lock().unwrap().clone().unwrap();
        assert!(!audio.exists());
    }

    #[tokio::test]
    async fn keep_audio_preserves_file_next_to_note() {
        let output = tempfile::tempdir().unwrap();
        let (pipeline, _) = stub_pipeline(false, false);

        let report = pipeline
            .run(
                "https://youtube.com/watch?v=abc123",
                output.path(),
                &options(true),
            )
            .await
            .unwrap();

        let audio_path = report.audio_path.expect("audio should be kept");
        assert!(audio_path.exists());
        assert_eq!(audio_path.parent(), Some(output.path()));
        assert!(audio_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("-video-clip.mp3"));
        assert_eq!(fs_err::read(&audio_path).unwrap(), b"stub audio bytes");
    }

    #[tokio::test]
    async fn failed_transcription_aborts_and_keeps_audio() {
        let output = tempfile::tempdir().unwrap();
        let (pipeline, written_audio) = stub_pipeline(false, true);

        let err = pipeline
            .run(
                "https://youtube.com/watch?v=abc123",
                output.path(),
                &options(false),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ClipperError>(),
            Some(ClipperError::TranscriptionFailed(_))
        ));

        // No partial note is written
        assert_eq!(fs_err::read_dir(output.path()).unwrap().count(), 0);

        // The downloaded audio survives for diagnosis regardless of the flag
        let audio = written_audio.lock().unwrap().clone().unwrap();
        assert!(audio.exists());

        fs_err::remove_dir_all(audio.parent().unwrap()).unwrap();
    }

    #[tokio::test]
    async fn failed_download_surfaces_download_error() {
        let output = tempfile::tempdir().unwrap();
        let (pipeline, _) = stub_pipeline(true, false);

        let err = pipeline
            .run(
                "https://tiktok.com/@user/video/123",
                output.path(),
                &options(false),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ClipperError>(),
            Some(ClipperError::DownloadFailed(_))
        ));
        assert_eq!(fs_err::read_dir(output.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn unsupported_url_fails_before_any_stage_runs() {
        let output = tempfile::tempdir().unwrap();
        let (pipeline, written_audio) = stub_pipeline(false, false);

        let err = pipeline
            .run("https://vimeo.com/12345", output.path(), &options(false))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ClipperError>(),
            Some(ClipperError::UnsupportedPlatform(_))
        ));
        assert!(written_audio.lock().unwrap().is_none());
    }
}
