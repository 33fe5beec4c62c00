//! Modulation effects.

pub mod ring_mod;
pub mod vibrato;

pub use ring_mod::{RingModulator, RingModulatorParams};
pub use vibrato::{RiseEnvelope, Vibrato, VibratoParams};
