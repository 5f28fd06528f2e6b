use anyhow::{Context, Result};
use clap::Parser;
use mic_scribe::{
    Config, ConsoleHost, FileCaptureProvider, HttpTranscriptionService, RecorderController,
    RemotePorts, SessionConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Chunked live transcription: capture, segment, upload, reassemble
#[derive(Debug, Parser)]
#[command(name = "mic-scribe", version)]
struct Cli {
    /// Configuration file (without extension)
    #[arg(long, default_value = "config/mic-scribe")]
    config: String,

    /// Stream a WAV file through the chunk pipeline instead of a live source
    #[arg(long)]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} starting", cfg.service.name);

    let api_key = std::env::var(&cfg.remote.api_key_env).with_context(|| {
        format!(
            "Set {} to your transcription API key",
            cfg.remote.api_key_env
        )
    })?;

    let service = HttpTranscriptionService::new(&cfg.remote, api_key)?;
    let ports = Arc::new(RemotePorts::new(
        Arc::new(service),
        cfg.remote.max_attempts,
    ));

    let Some(input) = cli.input else {
        anyhow::bail!(
            "No capture source available: pass --input <wav> to stream a recording through the pipeline"
        );
    };

    let session = SessionConfig {
        chunk_duration: Duration::from_millis(cfg.session.chunk_duration_ms),
        debounce: Duration::from_millis(cfg.session.debounce_ms),
        stop_timeout: Duration::from_secs(cfg.session.stop_timeout_secs),
        ..SessionConfig::default()
    };

    let provider = FileCaptureProvider::new(input, cfg.audio.frame_size);
    let mut controller = RecorderController::new(
        session.clone(),
        cfg.indicator,
        ports,
        Box::new(provider),
        Arc::new(ConsoleHost),
    );

    // Start the session; the file source streams its frames immediately.
    controller.trigger().await?;

    // The second trigger has to clear the debounce window; by then the
    // file frames have long since been ingested.
    tokio::time::sleep(session.debounce + Duration::from_millis(200)).await;

    // Stop: flush the tail chunk, wait for in-flight chunks, print the
    // final transcript on stdout.
    controller.trigger().await?;

    Ok(())
}
