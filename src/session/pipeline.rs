use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, Notify};
use tracing::{debug, info, warn};

use super::assembler;
use crate::audio::{encode_wav, SampleAccumulator, SampleFrame, WAV_MIME_TYPE};
use crate::host::HostSink;
use crate::remote::RemotePorts;

/// One encoded, ready-to-upload slice of the recording
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Position in the cut order, starting at 0
    pub id: u64,
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// Outcome of one chunk's round trip
///
/// `transcript` is `None` when upload or transcription exhausted its
/// retries; the chunk is then silently omitted from the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkResult {
    pub id: u64,
    pub transcript: Option<String>,
}

/// Mutable per-session pipeline state
///
/// Invariants: chunk ids increase by exactly 1 per cut and are never
/// reused within a session; `in_flight` equals the number of chunks cut
/// but not yet resolved.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub in_flight: usize,
    /// Doubles as the next chunk id
    pub chunks_cut: u64,
    pub results: Vec<ChunkResult>,
    pub transcript: String,
}

/// Synchronized aggregate shared between the ingest driver and chunk tasks
///
/// All cross-task mutation is serialized through the one mutex; `completed`
/// wakes barrier waiters after every decrement.
pub struct PipelineShared {
    state: Mutex<PipelineState>,
    completed: Notify,
    host: Arc<dyn HostSink>,
}

impl PipelineShared {
    fn new(host: Arc<dyn HostSink>) -> Self {
        Self {
            state: Mutex::new(PipelineState::default()),
            completed: Notify::new(),
            host,
        }
    }

    /// Reserve the next chunk id and count it as in flight
    ///
    /// Called synchronously at dispatch, before the chunk task is spawned,
    /// so the barrier can never observe a cut-but-uncounted chunk.
    async fn dispatch_id(&self) -> u64 {
        let mut state = self.state.lock().await;
        let id = state.chunks_cut;
        state.chunks_cut += 1;
        state.in_flight += 1;
        id
    }

    /// Record one chunk's outcome and refresh the assembled transcript
    ///
    /// Chunk tasks funnel every exit path through here, so the in-flight
    /// counter comes back down whether the chunk succeeded, failed to
    /// upload, or failed to transcribe.
    pub async fn complete(&self, id: u64, transcript: Option<String>) {
        let assembled = {
            let mut state = self.state.lock().await;
            state.results.push(ChunkResult { id, transcript });
            state.transcript = assembler::assemble(&state.results);

            match state.in_flight.checked_sub(1) {
                Some(remaining) => state.in_flight = remaining,
                // Unreachable as long as every decrement is paired with a
                // dispatch_id; logged instead of panicking mid-session.
                None => warn!("In-flight counter underflow resolving chunk {}", id),
            }

            state.transcript.clone()
        };

        self.completed.notify_waiters();
        self.host.status(&assembled).await;
    }

    /// Wait until every dispatched chunk has resolved
    ///
    /// Bounded: a stuck chunk cannot hang the session past `limit`.
    pub async fn wait_idle(&self, limit: Duration) -> Result<()> {
        let barrier = async {
            loop {
                // Register before checking so a completion between the check
                // and the await cannot be missed
                let notified = self.completed.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();

                if self.state.lock().await.in_flight == 0 {
                    return;
                }
                notified.await;
            }
        };

        if tokio::time::timeout(limit, barrier).await.is_err() {
            let stuck = self.state.lock().await.in_flight;
            anyhow::bail!(
                "Timed out after {:?} with {} chunk(s) still in flight",
                limit,
                stuck
            );
        }

        Ok(())
    }

    /// Current assembled transcript
    pub async fn transcript(&self) -> String {
        self.state.lock().await.transcript.clone()
    }

    /// Point-in-time copy of the pipeline state
    pub async fn snapshot(&self) -> PipelineState {
        self.state.lock().await.clone()
    }

    async fn report(&self, status: &str) {
        self.host.status(status).await;
    }
}

/// Per-session pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Elapsed capture time per chunk
    pub chunk_duration: Duration,
    /// Sample rate of incoming frames, stamped into each chunk's WAV header
    pub sample_rate: u32,
    /// Upper bound on waiting for in-flight chunks at finalization
    pub stop_timeout: Duration,
}

/// Cuts the capture stream into chunks and dispatches each through
/// encode → upload → transcribe without blocking ingestion
///
/// Owned by the single ingest driver; chunk round trips run as independent
/// tasks that report back through `PipelineShared`. Chunks are cut in
/// strict id order but may complete in any order.
pub struct ChunkPipeline {
    config: PipelineConfig,
    ports: Arc<RemotePorts>,
    shared: Arc<PipelineShared>,
    accumulator: SampleAccumulator,
    /// Timestamp of the current chunk's first frame; None until capture
    /// delivers one
    chunk_start_ms: Option<u64>,
}

impl ChunkPipeline {
    pub fn new(config: PipelineConfig, ports: Arc<RemotePorts>, host: Arc<dyn HostSink>) -> Self {
        info!(
            "Chunk pipeline initialized: {:?} chunks at {}Hz",
            config.chunk_duration, config.sample_rate
        );

        Self {
            config,
            ports,
            shared: Arc::new(PipelineShared::new(host)),
            accumulator: SampleAccumulator::new(),
            chunk_start_ms: None,
        }
    }

    /// Handle to the shared state, for stats and final transcript access
    pub fn shared(&self) -> Arc<PipelineShared> {
        Arc::clone(&self.shared)
    }

    /// Feed one capture frame
    ///
    /// Buffers the frame, then cuts and dispatches a chunk once the elapsed
    /// time since the last boundary reaches the chunk duration. Never
    /// blocks on chunk processing.
    pub async fn ingest(&mut self, frame: SampleFrame) {
        let at_ms = frame.timestamp_ms;
        let start_ms = *self.chunk_start_ms.get_or_insert(at_ms);

        self.accumulator.push(frame);

        if at_ms.saturating_sub(start_ms) >= self.config.chunk_duration.as_millis() as u64 {
            self.chunk_start_ms = Some(at_ms);
            self.cut_and_dispatch().await;
        }
    }

    /// Cut one final chunk from whatever is still buffered
    ///
    /// Skipped when nothing is buffered — an empty trailing chunk carries
    /// no transcribable signal.
    pub async fn finalize(&mut self) {
        if !self.accumulator.is_empty() {
            self.cut_and_dispatch().await;
        }
    }

    /// Wait for all dispatched chunks, bounded by the stop timeout
    pub async fn wait_idle(&self) -> Result<()> {
        self.shared.wait_idle(self.config.stop_timeout).await
    }

    /// Drive the pipeline from a capture channel until it closes, then
    /// flush the tail chunk and wait for in-flight work
    ///
    /// On barrier timeout the transcript assembled from the chunks that
    /// did resolve is still available through the returned handle.
    pub async fn run(mut self, mut frames: mpsc::Receiver<SampleFrame>) -> Arc<PipelineShared> {
        while let Some(frame) = frames.recv().await {
            self.ingest(frame).await;
        }

        self.finalize().await;

        if let Err(e) = self.wait_idle().await {
            warn!("Chunk barrier: {:#}; continuing with resolved chunks only", e);
        }

        self.shared
    }

    async fn cut_and_dispatch(&mut self) {
        let (left, right, sample_count) = self.accumulator.drain();
        let id = self.shared.dispatch_id().await;

        debug!("Cut chunk {} ({} sample pairs)", id, sample_count);

        let ports = Arc::clone(&self.ports);
        let shared = Arc::clone(&self.shared);
        let sample_rate = self.config.sample_rate;

        tokio::spawn(async move {
            let transcript = process_chunk(&ports, &shared, id, left, right, sample_rate).await;
            // Single exit point: the result is recorded and the counter
            // comes back down no matter which stage gave up.
            shared.complete(id, transcript).await;
        });
    }
}

/// One chunk's round trip: encode, upload, transcribe
///
/// Returns the recognized text, or `None` when any stage exhausted its
/// retries. Failure statuses are reported to the host as they happen.
async fn process_chunk(
    ports: &RemotePorts,
    shared: &PipelineShared,
    id: u64,
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: u32,
) -> Option<String> {
    let chunk = match encode_wav(&left, &right, sample_rate) {
        Ok(bytes) => AudioChunk {
            id,
            bytes,
            mime_type: WAV_MIME_TYPE,
        },
        Err(e) => {
            warn!("Failed to encode chunk {}: {:#}", id, e);
            shared.report("chunk encoding failed").await;
            return None;
        }
    };

    debug!("Chunk {} encoded: {} bytes", chunk.id, chunk.bytes.len());

    let Some(audio_url) = ports.upload(&chunk.bytes, chunk.mime_type).await else {
        shared.report("chunk upload failed").await;
        return None;
    };

    match ports.transcribe(&audio_url).await {
        Some(text) => {
            info!("Chunk {} transcribed: {} chars", id, text.len());
            Some(text)
        }
        None => {
            shared.report("chunk transcription failed").await;
            None
        }
    }
}
