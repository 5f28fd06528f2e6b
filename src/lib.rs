pub mod audio;
pub mod config;
pub mod host;
pub mod remote;
pub mod session;

pub use audio::{
    encode_wav, CaptureProvider, CaptureSource, FileCaptureProvider, FileCaptureSource,
    SampleAccumulator, SampleFrame, WAV_MIME_TYPE,
};
pub use config::Config;
pub use host::{ConsoleHost, HostSink, IndicatorConfig};
pub use remote::{HttpTranscriptionService, RemotePorts, TranscriptionService};
pub use session::{
    AudioChunk, ChunkPipeline, ChunkResult, PipelineConfig, PipelineShared, PipelineState,
    RecorderController, RecorderPhase, SessionConfig, SessionStats,
};
