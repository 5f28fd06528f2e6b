use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a recording session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier
    pub session_id: String,

    /// Elapsed capture time per chunk
    pub chunk_duration: Duration,

    /// Window during which repeated trigger events are ignored
    pub debounce: Duration,

    /// Upper bound on waiting for in-flight chunks when stopping
    pub stop_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            chunk_duration: Duration::from_millis(12_000),
            debounce: Duration::from_millis(1000),
            stop_timeout: Duration::from_secs(60),
        }
    }
}
