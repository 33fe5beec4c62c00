//! A phasor (normalised phase ramp) generator.

/// Non-anti-aliased phasor, ramping from `0.0` to `1.0` once per cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Phasor {
    /// The phase value, in the range `0.0` to `1.0`.
    phase: f64,
    /// The phase increment based on the current frequency.
    phase_increment: f64,
}

impl Phasor {
    pub fn new(freq_hz: f64, sample_rate: f64) -> Self {
        let mut phasor = Self::default();
        phasor.set_freq(freq_hz, sample_rate);
        phasor
    }

    /// Returns the current phase and advances by one sample.
    #[allow(clippy::should_implement_trait)] // hush clippy
    pub fn next(&mut self) -> f64 {
        let out = self.phase;
        self.increment_phase();
        out
    }

    /// Increments the phase of the `Phasor` by one sample.
    pub fn increment_phase(&mut self) {
        self.phase += self.phase_increment;

        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
    }

    /// Sets the frequency of the phasor.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `freq_hz` is negative or above Nyquist.
    pub fn set_freq(&mut self, freq_hz: f64, sample_rate: f64) {
        debug_assert!(0.0 <= freq_hz && freq_hz <= sample_rate / 2.0);
        self.phase_increment = freq_hz / sample_rate;
    }

    /// Jumps to `phase`, which is wrapped into `0.0` to `1.0`.
    pub fn set_phase(&mut self, phase: f64) {
        self.phase = phase.rem_euclid(1.0);
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }
}
