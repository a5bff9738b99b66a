//! Loudness Normalizer Library
//!
//! Brings audio files to a target integrated loudness with ffmpeg and verifies
//! the result before replacing the original.

pub mod batch;
pub mod config;
pub mod loudness;
pub mod tool;

// Re-export commonly used types for convenience
pub use batch::{BatchOrchestrator, BatchReport, Outcome, RunSummary};
pub use loudness::{Ebur128Parser, LoudnessCorrector, LoudnessTarget};
pub use tool::{FfmpegInvoker, ToolInvoker};
