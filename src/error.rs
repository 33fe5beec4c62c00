//! Error types for control-side operations.
//!
//! Nothing in the audio path returns these; `prepare()`, `process()` and
//! `reset()` are infallible.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load model from \"{}\": {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("preset is for \"{found}\", expected \"{expected}\"")]
    PresetMismatch { expected: String, found: String },

    #[error("malformed preset: {0}")]
    Preset(#[from] serde_json::Error),

    #[error("model hand-off queue is closed or full")]
    HandoffClosed,
}
