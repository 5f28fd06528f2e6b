pub mod accumulator;
pub mod capture;
pub mod file;
pub mod wav;

pub use accumulator::SampleAccumulator;
pub use capture::{CaptureProvider, CaptureSource, SampleFrame};
pub use file::{FileCaptureProvider, FileCaptureSource};
pub use wav::{encode_wav, WAV_MIME_TYPE};
