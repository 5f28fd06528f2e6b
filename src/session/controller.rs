use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::config::SessionConfig;
use super::pipeline::{ChunkPipeline, PipelineConfig, PipelineShared};
use super::stats::SessionStats;
use crate::audio::{CaptureProvider, CaptureSource};
use crate::host::{HostSink, IndicatorConfig};
use crate::remote::RemotePorts;

/// Recorder lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderPhase {
    Idle,
    Recording,
    Stopping,
}

/// A running session: the capture source being drained plus the pipeline
/// driver consuming its frames
struct ActiveSession {
    capture: Box<dyn CaptureSource>,
    driver: JoinHandle<Arc<PipelineShared>>,
}

/// Top-level recorder state machine
///
/// Idle → Recording → Stopping → Idle, driven by a single debounced
/// `trigger()` entry point wired to the host control. At most one session
/// is active; a trigger while stopping is ignored, not queued.
pub struct RecorderController {
    config: SessionConfig,
    indicator: IndicatorConfig,
    ports: Arc<RemotePorts>,
    capture: Box<dyn CaptureProvider>,
    host: Arc<dyn HostSink>,

    phase: RecorderPhase,
    last_trigger: Option<tokio::time::Instant>,
    active: Option<ActiveSession>,

    /// State of the current (or most recent) session, for stats and the
    /// final transcript
    last_shared: Option<Arc<PipelineShared>>,
    started_at: Option<DateTime<Utc>>,
}

impl RecorderController {
    pub fn new(
        config: SessionConfig,
        indicator: IndicatorConfig,
        ports: Arc<RemotePorts>,
        capture: Box<dyn CaptureProvider>,
        host: Arc<dyn HostSink>,
    ) -> Self {
        info!("Recorder controller created: {}", config.session_id);

        Self {
            config,
            indicator,
            ports,
            capture,
            host,
            phase: RecorderPhase::Idle,
            last_trigger: None,
            active: None,
            last_shared: None,
            started_at: None,
        }
    }

    pub fn phase(&self) -> RecorderPhase {
        self.phase
    }

    /// Host control trigger: starts when idle, stops when recording
    ///
    /// Triggers inside the debounce window are ignored outright, so a
    /// double click cannot start-then-immediately-stop a session.
    pub async fn trigger(&mut self) -> Result<()> {
        let now = tokio::time::Instant::now();
        if let Some(last) = self.last_trigger {
            if now.duration_since(last) < self.config.debounce {
                debug!("Trigger ignored: inside debounce window");
                return Ok(());
            }
        }
        self.last_trigger = Some(now);

        match self.phase {
            RecorderPhase::Idle => self.start().await,
            RecorderPhase::Recording => self.stop().await,
            RecorderPhase::Stopping => {
                debug!("Trigger ignored: session is stopping");
                Ok(())
            }
        }
    }

    /// Current session statistics
    pub async fn stats(&self) -> SessionStats {
        let (chunks_cut, in_flight, results_resolved) = match &self.last_shared {
            Some(shared) => {
                let state = shared.snapshot().await;
                (state.chunks_cut, state.in_flight, state.results.len())
            }
            None => (0, 0, 0),
        };

        let duration_secs = self
            .started_at
            .map(|t| Utc::now().signed_duration_since(t).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0);

        SessionStats {
            phase: self.phase,
            session_id: self.config.session_id.clone(),
            started_at: self.started_at,
            duration_secs,
            chunks_cut,
            in_flight,
            results_resolved,
        }
    }

    /// Open capture and begin a fresh session
    async fn start(&mut self) -> Result<()> {
        info!("Starting recording session: {}", self.config.session_id);

        let mut capture = match self.capture.open() {
            Ok(capture) => capture,
            Err(e) => {
                self.host.status("microphone unavailable").await;
                return Err(e.context("Failed to open capture source"));
            }
        };

        let frames = match capture.start().await {
            Ok(frames) => frames,
            Err(e) => {
                self.host.status("microphone unavailable").await;
                return Err(e.context("Failed to start capture"));
            }
        };

        let pipeline = ChunkPipeline::new(
            PipelineConfig {
                chunk_duration: self.config.chunk_duration,
                sample_rate: capture.sample_rate(),
                stop_timeout: self.config.stop_timeout,
            },
            Arc::clone(&self.ports),
            Arc::clone(&self.host),
        );

        // Fresh shared state per session: previous results are gone
        self.last_shared = Some(pipeline.shared());
        let driver = tokio::spawn(pipeline.run(frames));

        self.active = Some(ActiveSession { capture, driver });
        self.started_at = Some(Utc::now());
        self.phase = RecorderPhase::Recording;

        self.host.indicator(&self.indicator.recording_color).await;
        self.host.status("recording...").await;

        Ok(())
    }

    /// Stop capture, flush the tail chunk, wait for in-flight work and
    /// emit the final transcript
    async fn stop(&mut self) -> Result<()> {
        let Some(mut active) = self.active.take() else {
            warn!("Stop requested with no active session");
            self.phase = RecorderPhase::Idle;
            return Ok(());
        };

        info!("Stopping recording session: {}", self.config.session_id);
        self.phase = RecorderPhase::Stopping;

        self.host.indicator(&self.indicator.processing_color).await;
        self.host.status("transcribing...").await;

        // Closing the capture channel lets the driver drain remaining
        // frames, cut the tail chunk and wait on the in-flight barrier.
        if let Err(e) = active.capture.stop().await {
            warn!("Failed to stop capture source: {:#}", e);
        }

        let shared = match active.driver.await {
            Ok(shared) => shared,
            Err(e) => {
                error!("Pipeline driver task failed: {}", e);
                self.last_shared
                    .clone()
                    .context("Pipeline driver failed before any state was shared")?
            }
        };

        let transcript = shared.transcript().await;
        self.host.deliver(&transcript).await;
        self.host.indicator(&self.indicator.neutral_color).await;
        self.host.status("").await;

        self.phase = RecorderPhase::Idle;

        info!(
            "Recording session complete: {} ({} chars)",
            self.config.session_id,
            transcript.len()
        );

        Ok(())
    }
}
