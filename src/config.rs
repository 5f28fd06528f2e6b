use anyhow::Result;
use serde::Deserialize;

use crate::host::IndicatorConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub remote: RemoteConfig,
    pub session: SessionSettings,
    #[serde(default)]
    pub indicator: IndicatorConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    /// Samples per channel per capture callback
    pub frame_size: usize,
}

#[derive(Debug, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the upload/transcription API
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Attempts per network operation before a chunk degrades to absent
    pub max_attempts: u32,
    /// Delay between transcript status polls
    pub poll_interval_ms: u64,
    /// Deadline for one transcribe attempt's poll loop
    pub poll_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    pub chunk_duration_ms: u64,
    pub debounce_ms: u64,
    /// Upper bound on waiting for in-flight chunks at stop
    pub stop_timeout_secs: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
