use anyhow::Result;
use tokio::sync::mpsc;

/// One acquisition callback worth of audio: equal-length left/right
/// float channels plus a timestamp relative to capture start.
#[derive(Debug, Clone)]
pub struct SampleFrame {
    /// Left channel samples, range [-1.0, 1.0]
    pub left: Vec<f32>,
    /// Right channel samples, same length as `left`
    pub right: Vec<f32>,
    /// Milliseconds since capture started (drives chunk boundaries)
    pub timestamp_ms: u64,
}

impl SampleFrame {
    /// Number of sample pairs in this frame
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Raw-sample acquisition seam
///
/// The recorder treats acquisition as an external collaborator: anything
/// that can deliver fixed-size stereo float frames at a known rate works.
/// Implementations:
/// - `FileCaptureSource`: streams a WAV file (batch processing, demos)
/// - test doubles feeding scripted frames
#[async_trait::async_trait]
pub trait CaptureSource: Send {
    /// Start delivering frames
    ///
    /// Returns a channel receiver; the channel closes when the source stops
    /// or runs out of input.
    async fn start(&mut self) -> Result<mpsc::Receiver<SampleFrame>>;

    /// Stop delivering frames and release the underlying device/input
    async fn stop(&mut self) -> Result<()>;

    /// Sample rate of the delivered frames
    fn sample_rate(&self) -> u32;

    /// Source name for logging
    fn name(&self) -> &str;
}

/// Opens a fresh capture source for each recording session
pub trait CaptureProvider: Send + Sync {
    fn open(&self) -> Result<Box<dyn CaptureSource>>;
}
