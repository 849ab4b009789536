use async_trait::async_trait;
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::{ClipperError, Result};

/// Whisper model size selector, trading run time for accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelSize {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl ModelSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
        }
    }

    /// Parse a selector string, rejecting anything outside the enumerated set
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "tiny" => Ok(ModelSize::Tiny),
            "base" => Ok(ModelSize::Base),
            "small" => Ok(ModelSize::Small),
            "medium" => Ok(ModelSize::Medium),
            "large" => Ok(ModelSize::Large),
            other => Err(ClipperError::InvalidConfiguration(format!(
                "unknown whisper model size '{other}' (expected tiny, base, small, medium, or large)"
            ))
            .into()),
        }
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Plain-text transcript produced from an audio file
#[derive(Debug, Clone)]
pub struct TranscriptResult {
    pub text: String,
}

/// Narrow seam over the external speech-to-text engine so tests can inject stubs
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path, model: ModelSize) -> Result<TranscriptResult>;
}

/// Transcriber backed by the whisper.cpp CLI
pub struct WhisperCliTranscriber {
    whisper_cli_path: String,
    model_dirs: Vec<PathBuf>,
}

impl WhisperCliTranscriber {
    pub fn new(whisper_cli_path: impl Into<String>, model_dirs: Vec<PathBuf>) -> Self {
        Self {
            whisper_cli_path: whisper_cli_path.into(),
            model_dirs,
        }
    }

    /// Find the ggml model file for the requested size.
    ///
    /// Configured directories are searched first, then the usual whisper-cpp
    /// install locations.
    fn locate_model(&self, model: ModelSize) -> Result<PathBuf> {
        let file_name = format!("ggml-{model}.bin");

        let mut candidates: Vec<PathBuf> = self
            .model_dirs
            .iter()
            .map(|dir| dir.join(&file_name))
            .collect();

        if let Some(cache) = dirs::cache_dir() {
            candidates.push(cache.join("whisper-cpp").join(&file_name));
        }
        if let Some(data) = dirs::data_dir() {
            candidates.push(data.join("whisper-cpp").join(&file_name));
        }
        candidates.push(Path::new("/usr/local/share/whisper-cpp").join(&file_name));
        candidates.push(Path::new("/opt/homebrew/share/whisper-cpp").join(&file_name));

        candidates
            .into_iter()
            .find(|path| path.exists())
            .ok_or_else(|| {
                anyhow::Error::new(ClipperError::TranscriptionFailed(format!(
                    "whisper model '{model}' not found. Download it:\n  curl -L -o ~/.cache/whisper-cpp/{file_name} \
                     https://huggingface.co/ggerganov/whisper.cpp/resolve/main/{file_name}"
                )))
            })
    }
}

impl Default for WhisperCliTranscriber {
    fn default() -> Self {
        Self::new("whisper-cli", Vec::new())
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, audio_path: &Path, model: ModelSize) -> Result<TranscriptResult> {
        let model_path = self.locate_model(model)?;

        // whisper-cli appends .txt to this base path
        let output_base = audio_path.with_extension("");

        tracing::debug!(
            "invoking {} with model {}",
            self.whisper_cli_path,
            model_path.display()
        );

        let output = Command::new(&self.whisper_cli_path)
            .arg("-m")
            .arg(&model_path)
            .arg("-f")
            .arg(audio_path)
            .args(["--no-timestamps", "--output-txt", "--output-file"])
            .arg(&output_base)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                ClipperError::TranscriptionFailed(format!(
                    "failed to run {}: {e}",
                    self.whisper_cli_path
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(
                ClipperError::TranscriptionFailed(format!("whisper-cli failed: {message}")).into(),
            );
        }

        let txt_path = output_base.with_extension("txt");
        let text = if txt_path.exists() {
            let text = fs_err::read_to_string(&txt_path).map_err(|e| {
                ClipperError::TranscriptionFailed(format!("could not read transcript: {e}"))
            })?;
            if let Err(e) = fs_err::remove_file(&txt_path) {
                tracing::debug!("could not remove transcript scratch file: {e}");
            }
            text
        } else {
            // Some whisper-cli builds print the transcript to stdout instead
            String::from_utf8_lossy(&output.stdout).to_string()
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ClipperError::TranscriptionFailed(
                "engine produced an empty transcript (empty or corrupt audio?)".to_string(),
            )
            .into());
        }

        Ok(TranscriptResult { text })
    }
}
