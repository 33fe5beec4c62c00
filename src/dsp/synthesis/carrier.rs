//! Audio-rate carrier oscillator with a continuous phase.

use super::Waveform;
use std::f64::consts::TAU;

/// A phase accumulator in the range `0.0` to `2π`, advanced by
/// `2π · f / sample_rate` per sample.
///
/// The frequency is supplied per sample so that it can be modulated; the
/// phase carries across blocks, so the carrier has no discontinuity when a
/// block ends mid-cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct CarrierOscillator {
    phase: f64,
}

impl CarrierOscillator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the carrier value at the current phase, then advances it.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `freq_hz` is negative or not below Nyquist.
    pub fn next(&mut self, waveform: Waveform, freq_hz: f64, sample_rate: f64) -> f64 {
        debug_assert!(0.0 <= freq_hz && freq_hz < sample_rate / 2.0);
        let out = waveform.evaluate(self.phase);

        self.phase += TAU * freq_hz / sample_rate;
        if self.phase >= TAU {
            self.phase -= TAU;
        }

        out
    }

    /// The current phase in radians.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
