//! Output module - Persistence of generation images and statistics.
//!
//! The engine itself never touches the filesystem; the binary drives a
//! [`GenerationRecorder`] from the per-generation callback.

mod recorder;

pub use recorder::{GenerationRecorder, RecorderConfig, RecorderError, format_report};
