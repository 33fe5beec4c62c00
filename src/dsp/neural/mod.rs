//! Adapter for externally trained neural amplifier models.
//!
//! The network itself is opaque: anything implementing [`NeuralModel`] can be
//! installed, either synchronously through a [`ModelLoader`] or from another
//! thread through a [`ModelSender`].

pub mod amp;
pub mod handoff;
pub mod model;
pub mod resampler;

#[cfg(test)]
pub(crate) mod testing;

pub use amp::{NeuralAmp, NeuralAmpParams};
pub use handoff::ModelSender;
pub use model::{LoadError, LoadedModel, ModelInfo, ModelLoader, NeuralModel};
pub use resampler::Resampler;
