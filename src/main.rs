use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video_clipper::pipeline::{ClipOptions, VideoClipPipeline};
use video_clipper::{utils, Cli, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "video_clipper=debug"
    } else {
        "video_clipper=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Check for required external dependencies (non-fatal)
    let missing_deps = utils::check_dependencies().await;
    if !missing_deps.is_empty() {
        eprintln!("⚠️  Dependency check warnings:");
        for dep in missing_deps {
            eprintln!("   • {}", dep);
        }
        eprintln!("   (Continuing anyway - tools may be available)");
    }

    let config = Config::load().await?;

    let options = ClipOptions {
        model: match cli.model {
            Some(model) => model,
            None => config.default_model()?,
        },
        keep_audio: cli.keep_audio || config.app.keep_audio,
        quiet: cli.quiet,
    };

    let pipeline = VideoClipPipeline::new(config);

    tracing::info!("Starting video clip pipeline for URL: {}", cli.url);

    let report = pipeline.run(&cli.url, &cli.output_dir, &options).await?;

    println!("Note saved to: {}", report.note_path.display());
    if let Some(audio_path) = &report.audio_path {
        println!("Audio saved to: {}", audio_path.display());
    }

    Ok(())
}
