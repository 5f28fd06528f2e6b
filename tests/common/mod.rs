// Shared test doubles: a scriptable transcription service, capture
// sources feeding canned frames, and a host sink that records everything
// it is told.
//
// Chunks are identified in tests by a "tag" baked into the sample values:
// a frame filled with (tag + 0.5) / 32767.0 encodes to 16-bit samples
// equal to `tag`, so the mock service can read the first sample pair of
// an uploaded WAV and know which chunk it is looking at regardless of
// completion order.
#![allow(dead_code)]

use anyhow::{bail, Result};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

use mic_scribe::{
    encode_wav, CaptureProvider, CaptureSource, HostSink, SampleFrame, TranscriptionService,
};

/// Build a frame whose 16-bit encoding is exactly `tag` on every sample
pub fn tone_frame(tag: i16, len: usize, timestamp_ms: u64) -> SampleFrame {
    let value = (tag as f32 + 0.5) / 32767.0;
    SampleFrame {
        left: vec![value; len],
        right: vec![value; len],
        timestamp_ms,
    }
}

/// Read the tag back out of an encoded chunk's first sample
pub fn chunk_tag(wav: &[u8]) -> i16 {
    assert!(wav.len() >= 46, "buffer too short to be a WAV chunk");
    i16::from_le_bytes([wav[44], wav[45]])
}

/// Encoded WAV carrying a single tagged sample pair, for driving the
/// ports directly
pub fn tagged_wav(tag: i16) -> Vec<u8> {
    let value = (tag as f32 + 0.5) / 32767.0;
    encode_wav(&[value], &[value], 44100).expect("encoding a single pair cannot fail")
}

fn take_failure(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

/// Scriptable `TranscriptionService`
///
/// Per-tag failures and delays make completion order and failure paths
/// deterministic under a paused tokio clock; global failure budgets
/// drive the retry tests.
#[derive(Default)]
pub struct MockService {
    pub upload_calls: AtomicU32,
    pub transcribe_calls: AtomicU32,

    /// Tags whose upload always fails
    pub fail_upload_tags: HashSet<i16>,
    /// Tags whose transcription always fails
    pub fail_transcribe_tags: HashSet<i16>,

    /// The next N upload calls fail, regardless of tag
    pub upload_failures_remaining: AtomicU32,
    /// The next N transcribe calls fail, regardless of tag
    pub transcribe_failures_remaining: AtomicU32,

    /// Delay before an upload response, per tag (milliseconds)
    pub upload_delay_ms: HashMap<i16, u64>,
    /// Delay before a transcription response, per tag (milliseconds)
    pub transcribe_delay_ms: HashMap<i16, u64>,
}

impl MockService {
    pub fn uploads(&self) -> u32 {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn transcriptions(&self) -> u32 {
        self.transcribe_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TranscriptionService for MockService {
    async fn upload(&self, audio: &[u8], _mime_type: &str) -> Result<String> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let tag = chunk_tag(audio);

        if let Some(&ms) = self.upload_delay_ms.get(&tag) {
            tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
        }

        if take_failure(&self.upload_failures_remaining) {
            bail!("injected upload failure");
        }
        if self.fail_upload_tags.contains(&tag) {
            bail!("injected upload failure for tag {tag}");
        }

        Ok(format!("mem://uploads/{tag}"))
    }

    async fn transcribe(&self, audio_url: &str) -> Result<String> {
        self.transcribe_calls.fetch_add(1, Ordering::SeqCst);

        let tag: i16 = audio_url
            .rsplit('/')
            .next()
            .and_then(|t| t.parse().ok())
            .expect("mock upload URLs always end in the tag");

        if let Some(&ms) = self.transcribe_delay_ms.get(&tag) {
            tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
        }

        if take_failure(&self.transcribe_failures_remaining) {
            bail!("injected transcription failure");
        }
        if self.fail_transcribe_tags.contains(&tag) {
            bail!("injected transcription failure for tag {tag}");
        }

        Ok(format!("chunk-{tag}"))
    }
}

/// Capture source that delivers canned frames and then closes the channel
pub struct ScriptedCapture {
    frames: Vec<SampleFrame>,
    sample_rate: u32,
}

#[async_trait::async_trait]
impl CaptureSource for ScriptedCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<SampleFrame>> {
        let (tx, rx) = mpsc::channel(self.frames.len().max(1));
        for frame in self.frames.drain(..) {
            tx.try_send(frame).expect("channel sized for all frames");
        }
        // tx drops here; the channel closes once the frames are consumed
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Provider handing out `ScriptedCapture` sessions over the same frames
pub struct ScriptedProvider {
    pub frames: Vec<SampleFrame>,
    pub sample_rate: u32,
}

impl CaptureProvider for ScriptedProvider {
    fn open(&self) -> Result<Box<dyn CaptureSource>> {
        Ok(Box::new(ScriptedCapture {
            frames: self.frames.clone(),
            sample_rate: self.sample_rate,
        }))
    }
}

/// Provider that cannot acquire a capture source
pub struct FailingProvider;

impl CaptureProvider for FailingProvider {
    fn open(&self) -> Result<Box<dyn CaptureSource>> {
        bail!("no capture device available")
    }
}

/// Host sink that records every call for assertions
#[derive(Default)]
pub struct RecordingHost {
    pub indicators: Mutex<Vec<String>>,
    pub statuses: Mutex<Vec<String>>,
    pub delivered: Mutex<Vec<String>>,
}

impl RecordingHost {
    pub fn delivered_values(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }

    pub fn status_values(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn indicator_values(&self) -> Vec<String> {
        self.indicators.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HostSink for RecordingHost {
    async fn indicator(&self, color: &str) {
        self.indicators.lock().unwrap().push(color.to_string());
    }

    async fn status(&self, status: &str) {
        self.statuses.lock().unwrap().push(status.to_string());
    }

    async fn deliver(&self, transcript: &str) {
        self.delivered.lock().unwrap().push(transcript.to_string());
    }
}

/// Host sink that ignores everything
pub struct NullHost;

#[async_trait::async_trait]
impl HostSink for NullHost {
    async fn indicator(&self, _color: &str) {}
    async fn status(&self, _status: &str) {}
    async fn deliver(&self, _transcript: &str) {}
}
