use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// The two opaque network operations behind the pipeline
///
/// One `upload` or `transcribe` call is a single attempt; retry policy
/// lives in `RemotePorts`. A `transcribe` attempt covers the full job
/// round trip (submit + await terminal status).
#[async_trait::async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Upload one encoded audio buffer, returning the service's reference
    /// URL for it
    async fn upload(&self, audio: &[u8], mime_type: &str) -> Result<String>;

    /// Transcribe previously uploaded audio, returning the recognized text
    async fn transcribe(&self, audio_url: &str) -> Result<String>;
}

/// Bounded-retry wrappers around the remote operations
///
/// Every failure is treated as retryable: the call is reissued immediately
/// (no backoff) until the attempt budget is spent, then surfaced as `None`.
/// Failures never propagate past this boundary, and retried uploads may
/// leave duplicate remote artifacts; only the first success is used.
pub struct RemotePorts {
    service: Arc<dyn TranscriptionService>,
    max_attempts: u32,
}

impl RemotePorts {
    pub fn new(service: Arc<dyn TranscriptionService>, max_attempts: u32) -> Self {
        Self {
            service,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Upload with retries; `None` after the attempt budget is spent
    pub async fn upload(&self, audio: &[u8], mime_type: &str) -> Option<String> {
        for attempt in 1..=self.max_attempts {
            match self.service.upload(audio, mime_type).await {
                Ok(audio_url) => {
                    debug!("Upload succeeded on attempt {}", attempt);
                    return Some(audio_url);
                }
                Err(e) => {
                    warn!(
                        "Upload attempt {}/{} failed: {:#}",
                        attempt, self.max_attempts, e
                    );
                }
            }
        }
        None
    }

    /// Transcribe with retries; `None` after the attempt budget is spent
    pub async fn transcribe(&self, audio_url: &str) -> Option<String> {
        for attempt in 1..=self.max_attempts {
            match self.service.transcribe(audio_url).await {
                Ok(text) => {
                    debug!("Transcription succeeded on attempt {}", attempt);
                    return Some(text);
                }
                Err(e) => {
                    warn!(
                        "Transcription attempt {}/{} failed: {:#}",
                        attempt, self.max_attempts, e
                    );
                }
            }
        }
        None
    }
}
