use chrono::{DateTime, Utc};
use serde::Serialize;

use super::controller::RecorderPhase;

/// Point-in-time view of the recorder, for host status displays
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    /// Current controller phase
    pub phase: RecorderPhase,

    /// Session identifier
    pub session_id: String,

    /// When the current (or last) session started
    pub started_at: Option<DateTime<Utc>>,

    /// Elapsed seconds since the session started
    pub duration_secs: f64,

    /// Chunks cut so far
    pub chunks_cut: u64,

    /// Chunks dispatched but not yet resolved
    pub in_flight: usize,

    /// Chunks resolved (successfully or not)
    pub results_resolved: usize,
}
