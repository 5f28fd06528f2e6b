use serde::Deserialize;
use tracing::{debug, info};

/// Appearance of the host's record control
///
/// The host passes these alongside the trigger wiring; the controller only
/// echoes them back through `HostSink::indicator`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Control color while idle
    pub neutral_color: String,
    /// Control color while recording
    pub recording_color: String,
    /// Control color while waiting for in-flight chunks after stop
    pub processing_color: String,
    /// Icon identifier rendered by the host
    pub icon_name: String,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            neutral_color: "#6c757d".to_string(),
            recording_color: "#dc3545".to_string(),
            processing_color: "#ffd700".to_string(),
            icon_name: "microphone".to_string(),
        }
    }
}

/// Host application boundary
///
/// The recorder reports through this seam and never renders anything
/// itself: indicator color changes, incremental status strings (phase or
/// transcript-so-far), and exactly one final value per completed session.
#[async_trait::async_trait]
pub trait HostSink: Send + Sync {
    /// Update the record control color
    async fn indicator(&self, color: &str);

    /// Incremental status text
    async fn status(&self, status: &str);

    /// Deliver the final session transcript
    async fn deliver(&self, transcript: &str);
}

/// Host sink for the CLI binary: status via logs, final value on stdout
pub struct ConsoleHost;

#[async_trait::async_trait]
impl HostSink for ConsoleHost {
    async fn indicator(&self, color: &str) {
        debug!("Indicator color: {}", color);
    }

    async fn status(&self, status: &str) {
        if !status.is_empty() {
            info!("Status: {}", status);
        }
    }

    async fn deliver(&self, transcript: &str) {
        println!("{}", transcript);
    }
}
