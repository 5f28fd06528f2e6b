use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::capture::{CaptureProvider, CaptureSource, SampleFrame};

/// Streams a WAV file through the capture seam as stereo float frames
///
/// Used for batch transcription and end-to-end runs without a microphone.
/// Frames are delivered as fast as the pipeline consumes them; boundary
/// detection runs on the frame timestamps, not wall-clock time, so a file
/// is chunked exactly as a live recording of the same length would be.
pub struct FileCaptureSource {
    path: PathBuf,
    frame_size: usize,
    sample_rate: u32,
    feeder: Option<JoinHandle<()>>,
}

impl FileCaptureSource {
    pub fn open(path: impl AsRef<Path>, frame_size: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let reader = WavReader::open(&path)
            .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
        let sample_rate = reader.spec().sample_rate;

        Ok(Self {
            path,
            frame_size,
            sample_rate,
            feeder: None,
        })
    }

    /// Read the whole file into equal-length stereo float channels
    fn read_channels(path: &Path) -> Result<(Vec<f32>, Vec<f32>, u32)> {
        let reader = WavReader::open(path)
            .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
        let spec = reader.spec();

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Int => reader
                .into_samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to read integer samples")?,
            SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to read float samples")?,
        };

        let (left, right) = match spec.channels {
            1 => {
                // Mono input feeds both channels
                (interleaved.clone(), interleaved)
            }
            2 => {
                let mut left = Vec::with_capacity(interleaved.len() / 2);
                let mut right = Vec::with_capacity(interleaved.len() / 2);
                for pair in interleaved.chunks_exact(2) {
                    left.push(pair[0]);
                    right.push(pair[1]);
                }
                (left, right)
            }
            n => bail!("Unsupported channel count: {} (expected 1 or 2)", n),
        };

        Ok((left, right, spec.sample_rate))
    }
}

#[async_trait::async_trait]
impl CaptureSource for FileCaptureSource {
    async fn start(&mut self) -> Result<mpsc::Receiver<SampleFrame>> {
        let (left, right, sample_rate) = Self::read_channels(&self.path)?;
        let duration_secs = left.len() as f64 / sample_rate as f64;

        info!(
            "File capture started: {} ({:.1}s, {}Hz, {} sample pairs)",
            self.path.display(),
            duration_secs,
            sample_rate,
            left.len()
        );

        let frame_size = self.frame_size;
        let (tx, rx) = mpsc::channel(100);

        let feeder = tokio::spawn(async move {
            let mut offset = 0;
            while offset < left.len() {
                let end = (offset + frame_size).min(left.len());
                let timestamp_ms = offset as u64 * 1000 / sample_rate as u64;

                let frame = SampleFrame {
                    left: left[offset..end].to_vec(),
                    right: right[offset..end].to_vec(),
                    timestamp_ms,
                };

                if tx.send(frame).await.is_err() {
                    // Receiver went away; nothing left to feed
                    break;
                }

                offset = end;
            }
            // Dropping the sender closes the channel and signals end of input
        });

        self.feeder = Some(feeder);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(feeder) = self.feeder.take() {
            if !feeder.is_finished() {
                warn!("Stopping file capture before the file was fully streamed");
                feeder.abort();
            }
        }
        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Opens a `FileCaptureSource` for each session over the same file
pub struct FileCaptureProvider {
    path: PathBuf,
    frame_size: usize,
}

impl FileCaptureProvider {
    pub fn new(path: impl Into<PathBuf>, frame_size: usize) -> Self {
        Self {
            path: path.into(),
            frame_size,
        }
    }
}

impl CaptureProvider for FileCaptureProvider {
    fn open(&self) -> Result<Box<dyn CaptureSource>> {
        let source = FileCaptureSource::open(&self.path, self.frame_size)?;
        Ok(Box::new(source))
    }
}
