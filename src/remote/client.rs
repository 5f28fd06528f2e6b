use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, info};

use super::messages::{TranscriptEnvelope, TranscriptRequest, TranscriptStatus, UploadResponse};
use super::port::TranscriptionService;
use crate::config::RemoteConfig;

/// HTTP implementation of the upload + transcribe operations
///
/// Talks to an AssemblyAI-shaped API: raw-body upload returning a
/// reference URL, then a transcript job polled until it reaches a
/// terminal status.
pub struct HttpTranscriptionService {
    http: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl HttpTranscriptionService {
    pub fn new(config: &RemoteConfig, api_key: String) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&api_key).context("API key is not a valid header value")?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            poll_timeout: Duration::from_secs(config.poll_timeout_secs),
        })
    }

    async fn poll_transcript(&self, id: &str) -> Result<TranscriptEnvelope> {
        let url = format!("{}/transcript/{}", self.base_url, id);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Transcript poll request failed")?;

        if !response.status().is_success() {
            bail!("Transcript poll rejected with status {}", response.status());
        }

        response
            .json::<TranscriptEnvelope>()
            .await
            .context("Failed to parse transcript envelope")
    }
}

#[async_trait::async_trait]
impl TranscriptionService for HttpTranscriptionService {
    async fn upload(&self, audio: &[u8], mime_type: &str) -> Result<String> {
        let url = format!("{}/upload", self.base_url);

        debug!("Uploading {} bytes to {}", audio.len(), url);

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, mime_type)
            .body(audio.to_vec())
            .send()
            .await
            .context("Upload request failed")?;

        if !response.status().is_success() {
            bail!("Upload rejected with status {}", response.status());
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .context("Failed to parse upload response")?;

        info!("Audio uploaded: {}", parsed.upload_url);

        Ok(parsed.upload_url)
    }

    async fn transcribe(&self, audio_url: &str) -> Result<String> {
        let url = format!("{}/transcript", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&TranscriptRequest { audio_url })
            .send()
            .await
            .context("Transcript create request failed")?;

        if !response.status().is_success() {
            bail!(
                "Transcript create rejected with status {}",
                response.status()
            );
        }

        let mut envelope: TranscriptEnvelope = response
            .json()
            .await
            .context("Failed to parse transcript envelope")?;

        debug!("Transcript job {} submitted", envelope.id);

        // One attempt owns the full poll loop; the deadline keeps a silent
        // service from pinning the attempt forever.
        let deadline = tokio::time::Instant::now() + self.poll_timeout;

        loop {
            match envelope.status {
                TranscriptStatus::Completed => {
                    let text = envelope.text.unwrap_or_default();
                    info!("Transcript job {} completed: {} chars", envelope.id, text.len());
                    return Ok(text);
                }
                TranscriptStatus::Error => {
                    bail!(
                        "Transcription failed: {}",
                        envelope.error.as_deref().unwrap_or("unknown error")
                    );
                }
                TranscriptStatus::Queued | TranscriptStatus::Processing => {
                    if tokio::time::Instant::now() >= deadline {
                        bail!("Transcript job {} did not finish in time", envelope.id);
                    }
                    tokio::time::sleep(self.poll_interval).await;
                    envelope = self.poll_transcript(&envelope.id).await?;
                }
            }
        }
    }
}
