//! Test doubles for neural models and loaders.

use super::{LoadError, LoadedModel, ModelLoader, NeuralModel};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A memoryless model which scales its input, counting its calls.
#[derive(Debug)]
pub struct GainModel {
    gain: f64,
    sample_rate: u32,
    calls: Arc<AtomicUsize>,
}

impl GainModel {
    pub fn new(gain: f64, sample_rate: u32) -> Self {
        Self { gain, sample_rate, calls: Arc::default() }
    }

    /// A handle to the call counter, which stays valid once the model is
    /// boxed.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl NeuralModel for GainModel {
    fn process(&mut self, sample: f64) -> f64 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        sample * self.gain
    }

    fn reset(&mut self) {}

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// A model with memory: it outputs the running sum of its input.
#[derive(Debug)]
pub struct IntegratorModel {
    pub sum: f64,
    pub sample_rate: u32,
}

impl NeuralModel for IntegratorModel {
    fn process(&mut self, sample: f64) -> f64 {
        self.sum += sample;
        self.sum
    }

    fn reset(&mut self) {
        self.sum = 0.0;
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

pub fn loaded(gain: f64, sample_rate: u32) -> LoadedModel {
    LoadedModel::new(GainModel::new(gain, sample_rate), "gain")
}

/// Loads a [`GainModel`] for any path.
#[derive(Debug)]
pub struct GainLoader {
    pub gain: f64,
    pub sample_rate: u32,
}

impl ModelLoader for GainLoader {
    fn load(&self, _path: &Path) -> Result<LoadedModel, LoadError> {
        Ok(loaded(self.gain, self.sample_rate))
    }
}

/// Fails every load.
#[derive(Debug)]
pub struct FailingLoader;

impl ModelLoader for FailingLoader {
    fn load(&self, path: &Path) -> Result<LoadedModel, LoadError> {
        Err(format!("no model at {}", path.display()).into())
    }
}
