//! Sample-rate reconciliation between the host block rate and a model's
//! native rate.

use super::NeuralModel;
use crate::util::{epsilon_eq, lerp};

/// Runs a model at its own rate from a stream at the block rate.
///
/// Each block-rate sample advances a phase accumulator by
/// `model_rate / block_rate`. Every time the phase passes `1.0`, the model is
/// fed a linear interpolation between the previous and current input, and
/// the phase drops by `1.0`. Each block-rate tick returns the most recent
/// model output: a zero-order hold when the model runs slower than the block,
/// decimation when it runs faster.
///
/// When both rates match, the model is called once per sample directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct Resampler {
    active: bool,
    ratio: f64,
    /// Stays in `0.0..1.0` between calls.
    phase: f64,
    last_input: f64,
    last_output: f64,
}

impl Resampler {
    pub fn new() -> Self {
        Self { ratio: 1.0, ..Self::default() }
    }

    /// Sets the ratio for a model running at `model_rate` fed at
    /// `block_rate`, and clears the interpolation state.
    pub fn configure(&mut self, model_rate: u32, block_rate: f64) {
        let model_rate = f64::from(model_rate);
        self.active = !epsilon_eq(model_rate, block_rate);
        self.ratio = model_rate / block_rate;
        self.reset();
    }

    /// Runs `input` through `model`, returning one block-rate sample.
    pub fn process(&mut self, input: f64, model: &mut dyn NeuralModel) -> f64 {
        if !self.active {
            return model.process(input);
        }

        self.phase += self.ratio;

        while self.phase >= 1.0 {
            let frac = self.phase - self.phase.floor();
            self.last_output = model.process(lerp(self.last_input, input, frac));
            self.phase -= 1.0;
        }

        self.last_input = input;
        self.last_output
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.last_input = 0.0;
        self.last_output = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `model_rate / block_rate`.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }
}
