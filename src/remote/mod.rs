//! Remote speech-to-text integration
//!
//! Two opaque network operations sit behind the pipeline:
//! - upload: ship one encoded chunk, get back a reference URL
//! - transcribe: submit the reference, await the recognized text
//!
//! `RemotePorts` wraps both with a bounded immediate-retry policy and
//! converts exhaustion into an absent result; `HttpTranscriptionService`
//! is the real HTTP implementation behind the `TranscriptionService` trait.

pub mod client;
pub mod messages;
pub mod port;

pub use client::HttpTranscriptionService;
pub use messages::{TranscriptEnvelope, TranscriptRequest, TranscriptStatus, UploadResponse};
pub use port::{RemotePorts, TranscriptionService};
