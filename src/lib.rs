#![allow(
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::return_self_not_must_use
)]

// Signal processing
pub mod dsp;

// Control-side parameter handling and presets
pub mod params;

// Error types
pub mod error;

// General utilities
pub mod util;

// Some widely-used re-exports
pub mod prelude;

// Crate-wide settings
pub mod settings;

pub use dsp::{
    Drive, Effect, NeuralAmp, ReverseDelay, RingModulator, Vibrato,
};
pub use error::{Error, Result};
