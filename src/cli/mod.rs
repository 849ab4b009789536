use clap::Parser;
use std::path::PathBuf;

use crate::transcribe::ModelSize;

#[derive(Parser)]
#[command(
    name = "video-clipper",
    about = "Download and transcribe videos from YouTube, TikTok, or Instagram Reels into Markdown notes",
    version,
    long_about = "Downloads the audio track of a social-media video with yt-dlp, transcribes it \
with whisper-cli, and writes an Obsidian-style Markdown note containing the video metadata, \
a short summary, and the full transcript."
)]
pub struct Cli {
    /// URL of the video to download and transcribe
    #[arg(value_name = "URL")]
    pub url: String,

    /// Directory to save the note (filename is auto-generated as YYYY-MM-DD-HH-MM-SS-video-clip.md)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Whisper model size (defaults to the configured model)
    #[arg(long, value_enum, value_name = "SIZE")]
    pub model: Option<ModelSize>,

    /// Keep the downloaded audio file next to the note
    #[arg(long)]
    pub keep_audio: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_positional_args_and_flags() {
        let cli = Cli::parse_from([
            "video-clipper",
            "https://youtube.com/watch?v=abc123",
            "/tmp/clips",
            "--model",
            "small",
            "--keep-audio",
        ]);

        assert_eq!(cli.url, "https://youtube.com/watch?v=abc123");
        assert_eq!(cli.output_dir, PathBuf::from("/tmp/clips"));
        assert_eq!(cli.model, Some(ModelSize::Small));
        assert!(cli.keep_audio);
        assert!(!cli.verbose);
    }

    #[test]
    fn model_defaults_to_none() {
        let cli = Cli::parse_from(["video-clipper", "https://youtu.be/x", "out"]);
        assert_eq!(cli.model, None);
        assert!(!cli.keep_audio);
    }
}
