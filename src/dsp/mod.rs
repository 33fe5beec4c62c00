//! Digital signal processors and utilities.

pub mod delay;
pub mod distortion;
pub mod filtering;
pub mod modulation;
pub mod neural;
pub mod synthesis;
pub mod util;

pub use delay::{DelayLine, ReverseDelay};
pub use distortion::Drive;
pub use filtering::{
    biquad::{BiquadFilter, BiquadParams},
    Filter, FilterType, BUTTERWORTH_Q,
};
pub use modulation::{RingModulator, Vibrato};
pub use neural::{
    LoadedModel, ModelInfo, ModelLoader, ModelSender, NeuralAmp, NeuralModel,
};
pub use synthesis::{CarrierOscillator, Lfo, Phasor, Waveform};
pub use util::*;
