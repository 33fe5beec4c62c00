//! Distortion processors.

pub mod drive;
pub mod waveshaper;

pub use drive::{Drive, DriveParams};
pub use waveshaper::asymmetric_clip;
