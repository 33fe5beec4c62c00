//! Low-frequency oscillator for modulation.

use super::{Phasor, Waveform};
use crate::settings::DEFAULT_SAMPLE_RATE;

/// A low-frequency oscillator producing values between `-1.0` and `1.0`.
///
/// The start phase set with [`set_phase()`](Self::set_phase) is remembered,
/// and [`reset()`](Self::reset) returns to it.
#[derive(Debug, Clone, Copy)]
pub struct Lfo {
    phasor: Phasor,
    waveform: Waveform,
    freq_hz: f64,
    start_phase: f64,
    sample_rate: f64,
}

impl Lfo {
    pub fn new(freq_hz: f64, sample_rate: f64) -> Self {
        Self {
            phasor: Phasor::new(freq_hz, sample_rate),
            waveform: Waveform::Sine,
            freq_hz,
            start_phase: 0.0,
            sample_rate,
        }
    }

    /// Produces the current value and advances by one sample.
    pub fn tick(&mut self) -> f64 {
        self.waveform.evaluate_normalized(self.phasor.next())
    }

    pub fn set_freq(&mut self, freq_hz: f64) {
        self.freq_hz = freq_hz;
        self.phasor.set_freq(freq_hz, self.sample_rate);
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    /// Sets the phase, as a fraction of a cycle, and makes it the phase the
    /// oscillator resets to.
    pub fn set_phase(&mut self, phase: f64) {
        self.start_phase = phase.rem_euclid(1.0);
        self.phasor.set_phase(self.start_phase);
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.phasor.set_freq(self.freq_hz, sample_rate);
    }

    /// Returns to the start phase.
    pub fn reset(&mut self) {
        self.phasor.set_phase(self.start_phase);
    }

    pub fn phase(&self) -> f64 {
        self.phasor.phase()
    }
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(1.0, DEFAULT_SAMPLE_RATE)
    }
}
