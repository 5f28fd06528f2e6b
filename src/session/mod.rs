//! Recording session management
//!
//! This module provides the chunked transcription core:
//! - `ChunkPipeline`: boundary detection, chunk dispatch, in-flight
//!   tracking and the completion barrier
//! - `assembler`: ordered transcript reassembly
//! - `RecorderController`: the Idle/Recording/Stopping state machine
//!   exposed to the host control
//! - Session configuration and statistics

pub mod assembler;
mod config;
mod controller;
mod pipeline;
mod stats;

pub use config::SessionConfig;
pub use controller::{RecorderController, RecorderPhase};
pub use pipeline::{
    AudioChunk, ChunkPipeline, ChunkResult, PipelineConfig, PipelineShared, PipelineState,
};
pub use stats::SessionStats;
