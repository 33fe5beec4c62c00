//! Contracts for neural models and the loaders which build them.

use std::fmt::Debug;
use std::path::Path;

/// A single-channel inference model running at a fixed native sample rate.
pub trait NeuralModel: Send + Debug {
    /// Runs one sample through the model.
    fn process(&mut self, sample: f64) -> f64;

    /// Clears any recurrent state.
    fn reset(&mut self);

    /// The sample rate the model was trained at.
    fn sample_rate(&self) -> u32;
}

/// The error type loaders report; its message is kept in
/// [`Error::ModelLoad`](crate::Error::ModelLoad).
pub type LoadError = Box<dyn std::error::Error + Send + Sync>;

/// Builds models from files. File formats and network architectures are the
/// loader's business.
pub trait ModelLoader {
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or describes an
    /// unsupported model.
    fn load(&self, path: &Path) -> Result<LoadedModel, LoadError>;
}

/// Metadata describing an installed model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelInfo {
    pub architecture: String,
    pub sample_rate: u32,
}

/// A fully constructed model, ready to be installed.
#[derive(Debug)]
pub struct LoadedModel {
    model: Box<dyn NeuralModel>,
    architecture: String,
}

impl LoadedModel {
    pub fn new(model: impl NeuralModel + 'static, architecture: impl Into<String>) -> Self {
        Self::from_boxed(Box::new(model), architecture)
    }

    pub fn from_boxed(model: Box<dyn NeuralModel>, architecture: impl Into<String>) -> Self {
        Self { model, architecture: architecture.into() }
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            architecture: self.architecture.clone(),
            sample_rate: self.model.sample_rate(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.model.sample_rate()
    }

    pub(crate) fn model_mut(&mut self) -> &mut dyn NeuralModel {
        self.model.as_mut()
    }
}
