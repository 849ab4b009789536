use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::transcribe::ModelSize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// External tool locations
    pub tools: ToolsConfig,

    /// Transcription settings
    pub transcription: TranscriptionConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path or command name for yt-dlp
    pub yt_dlp: String,

    /// Path or command name for whisper-cli
    pub whisper_cli: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Model size used when --model is not given
    pub default_model: String,

    /// Extra directories searched for ggml model files, before the
    /// standard whisper-cpp install locations
    pub model_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base directory for per-run working directories
    pub temp_dir: Option<PathBuf>,

    /// Keep audio files after transcription
    pub keep_audio: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tools: ToolsConfig {
                yt_dlp: "yt-dlp".to_string(),
                whisper_cli: "whisper-cli".to_string(),
            },
            transcription: TranscriptionConfig {
                default_model: "base".to_string(),
                model_dirs: Vec::new(),
            },
            app: AppConfig {
                temp_dir: None,
                keep_audio: false,
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content =
                fs_err::read_to_string(&config_path).context("Failed to read config file")?;

            let config: Config =
                serde_yaml::from_str(&content).context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("video-clipper").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        ModelSize::parse(&self.transcription.default_model)?;
        Ok(())
    }

    /// Model size used when the CLI does not override it
    pub fn default_model(&self) -> Result<ModelSize> {
        ModelSize::parse(&self.transcription.default_model)
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  yt-dlp: {}", self.tools.yt_dlp);
        println!("  whisper-cli: {}", self.tools.whisper_cli);
        println!("  Default Model: {}", self.transcription.default_model);
        if let Some(temp_dir) = &self.app.temp_dir {
            println!("  Temp Dir: {}", temp_dir.display());
        }
        println!("  Keep Audio: {}", self.app.keep_audio);
    }
}
