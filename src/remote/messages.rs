use serde::{Deserialize, Serialize};

/// Response to a raw audio upload
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    /// Reference URL for the uploaded audio, consumed by the transcript job
    pub upload_url: String,
}

/// Request body creating a transcript job for uploaded audio
#[derive(Debug, Serialize)]
pub struct TranscriptRequest<'a> {
    pub audio_url: &'a str,
}

/// Lifecycle status of a transcript job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

impl TranscriptStatus {
    /// Whether the job will make no further progress
    pub fn is_terminal(&self) -> bool {
        matches!(self, TranscriptStatus::Completed | TranscriptStatus::Error)
    }
}

/// Transcript job envelope returned by both the create and poll calls
#[derive(Debug, Deserialize)]
pub struct TranscriptEnvelope {
    pub id: String,
    pub status: TranscriptStatus,
    /// Recognized text, present once status is `completed`
    #[serde(default)]
    pub text: Option<String>,
    /// Failure detail, present when status is `error`
    #[serde(default)]
    pub error: Option<String>,
}
