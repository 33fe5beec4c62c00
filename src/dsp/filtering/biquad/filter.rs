//! Biquad filter using the [direct form 1](https://en.wikipedia.org/wiki/Digital_biquad_filter#Direct_form_1).
//!
//! Coefficient equations taken from the
//! [Audio EQ Cookbook by Robert Bristow-Johnson](https://www.w3.org/TR/audio-eq-cookbook/).

use super::*;
use crate::util::{epsilon_eq, level_to_db};
use std::f64::consts::{FRAC_1_SQRT_2, TAU};
use FilterType as FT;

/// The highest frequency a filter will be tuned to, as a fraction of the
/// sample rate. Keeps the cookbook equations away from Nyquist.
const MAX_FREQ_RATIO: f64 = 0.49;

/// Filter coefficients, normalised by `a0`.
#[derive(Debug, Clone, Copy)]
struct Coefs {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Coefs {
    /// A coefficient state which leaves the input signal totally unaffected.
    fn identity() -> Self {
        Self { b0: 1.0, b1: 0.0, b2: 0.0, a1: 0.0, a2: 0.0 }
    }
}

impl Default for Coefs {
    fn default() -> Self {
        Self::identity()
    }
}

/// A struct which covers the parameters used by biquad filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadParams {
    pub freq: f64,
    /// Gain in decibels; only used by `Peak` filters.
    pub gain: f64,
    pub q: f64,
    pub filter_type: FilterType,
}

impl Default for BiquadParams {
    fn default() -> Self {
        Self {
            freq: 1000.0,
            q: FRAC_1_SQRT_2,
            filter_type: FT::default(),
            gain: 0.0,
        }
    }
}

/// A biquad filter implementation, which offers all of the filter types
/// available in `FilterType`.
///
/// # Performance
///
/// The filter lazily updates its coefficients: they are only recomputed on
/// the first call to `process()` after a parameter actually changes. Setting
/// a parameter to its current value is free, so callers may re-apply their
/// parameters every block.
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    coefs: Coefs,
    delayed_in: (f64, f64),
    delayed_out: (f64, f64),

    params: BiquadParams,
    sample_rate: f64,

    needs_recompute: bool,
}

impl Filter for BiquadFilter {
    /// Processes a single sample of the filter and returns the new sample.
    fn process(&mut self, sample: f64) -> f64 {
        self.recompute_if_needed();
        let Coefs { b0, b1, b2, a1, a2 } = self.coefs;

        let feedforward = b1.mul_add(self.delayed_in.0, b2 * self.delayed_in.1);
        let feedback = a1.mul_add(self.delayed_out.0, a2 * self.delayed_out.1);
        let output = b0.mul_add(sample, feedforward) - feedback;

        self.delayed_in = (sample, self.delayed_in.0);
        self.delayed_out = (output, self.delayed_out.0);

        output
    }

    /// Clears the filter's sample history. Its parameters are untouched.
    fn reset(&mut self) {
        self.delayed_in = (0.0, 0.0);
        self.delayed_out = (0.0, 0.0);
    }
}

impl BiquadFilter {
    /// Creates a new, initialised filter, set to the default `Peak` filter
    /// type with no gain.
    #[must_use]
    pub fn new(sample_rate: f64) -> Self {
        Self {
            coefs: Coefs::identity(),
            delayed_in: (0.0, 0.0),
            delayed_out: (0.0, 0.0),
            params: BiquadParams::default(),
            sample_rate,
            needs_recompute: true,
        }
    }

    /// Sets every parameter of the filter at once.
    pub fn configure(
        &mut self,
        filter_type: FilterType,
        freq: f64,
        q: f64,
        gain_db: f64,
    ) {
        self.set_params(&BiquadParams { freq, gain: gain_db, q, filter_type });
    }

    /// Sets the parameters of the filter all at once.
    pub fn set_params(&mut self, params: &BiquadParams) {
        if *params != self.params {
            self.params = *params;
            self.needs_recompute = true;
        }
    }

    /// Sets the frequency of the filter. Frequencies are limited to just
    /// below Nyquist when the coefficients are computed.
    pub fn set_freq(&mut self, freq: f64) {
        if !epsilon_eq(freq, self.params.freq) {
            self.params.freq = freq;
            self.needs_recompute = true;
        }
    }

    /// Sets the gain of the filter in decibels.
    pub fn set_gain(&mut self, gain_db: f64) {
        if !epsilon_eq(gain_db, self.params.gain) {
            self.params.gain = gain_db;
            self.needs_recompute = true;
        }
    }

    /// Resets the sample rate of the filter. Its coefficients update upon the
    /// next call to `process()`.
    ///
    /// # Panics
    ///
    /// Panics if `sample_rate` is not positive.
    pub fn reset_sample_rate(&mut self, sample_rate: f64) {
        assert!(sample_rate > 0.0);
        self.sample_rate = sample_rate;
        self.needs_recompute = true;
    }

    pub fn params(&self) -> &BiquadParams {
        &self.params
    }

    /// Returns the magnitude response at `freq` Hz in decibels, evaluating
    /// the transfer function on the unit circle.
    pub fn response_at(&mut self, freq: f64) -> f64 {
        self.recompute_if_needed();
        let Coefs { b0, b1, b2, a1, a2 } = self.coefs;

        let w = TAU * freq / self.sample_rate;
        let (sin_w, cos_w) = w.sin_cos();
        let (sin_2w, cos_2w) = (2.0 * w).sin_cos();

        let num_re = b2.mul_add(cos_2w, b1.mul_add(cos_w, b0));
        let num_im = -b2.mul_add(sin_2w, b1 * sin_w);
        let den_re = a2.mul_add(cos_2w, a1.mul_add(cos_w, 1.0));
        let den_im = -a2.mul_add(sin_2w, a1 * sin_w);

        let num = num_re.hypot(num_im);
        let den = den_re.hypot(den_im);

        level_to_db(num / den)
    }

    /* PRIVATE METHODS */

    fn recompute_if_needed(&mut self) {
        if self.needs_recompute {
            match self.params.filter_type {
                FT::Peak => self.set_peak_coefs(),
                FT::Lowpass => self.set_lowpass_coefs(),
                FT::Highpass => self.set_highpass_coefs(),
            }

            self.needs_recompute = false;
        }
    }

    /// Sets the filter coefficients for a peak filter.
    fn set_peak_coefs(&mut self) {
        let phi = self.get_phi();
        let alpha = self.get_alpha(phi);
        let amp = 10.0f64.powf(self.params.gain / 40.0);
        let cos_phi = phi.cos();

        let a0 = 1.0 + alpha / amp;

        self.coefs = Coefs {
            b0: alpha.mul_add(amp, 1.0) / a0,
            b1: (-2.0 * cos_phi) / a0,
            b2: (-alpha).mul_add(amp, 1.0) / a0,
            a1: (-2.0 * cos_phi) / a0,
            a2: (1.0 - alpha / amp) / a0,
        };
    }

    /// Sets the filter coefficients for a lowpass filter.
    fn set_lowpass_coefs(&mut self) {
        let phi = self.get_phi();
        let alpha = self.get_alpha(phi);
        let cos_phi = phi.cos();

        let a0 = 1.0 + alpha;
        let b0 = ((1.0 - cos_phi) * 0.5) / a0;

        self.coefs = Coefs {
            b0,
            b1: (1.0 - cos_phi) / a0,
            b2: b0,
            a1: (-2.0 * cos_phi) / a0,
            a2: (1.0 - alpha) / a0,
        };
    }

    /// Sets the filter coefficients for a highpass filter.
    fn set_highpass_coefs(&mut self) {
        let phi = self.get_phi();
        let alpha = self.get_alpha(phi);
        let cos_phi = phi.cos();

        let a0 = 1.0 + alpha;
        let b0 = ((1.0 + cos_phi) * 0.5) / a0;

        self.coefs = Coefs {
            b0,
            b1: -(1.0 + cos_phi) / a0,
            b2: b0,
            a1: (-2.0 * cos_phi) / a0,
            a2: (1.0 - alpha) / a0,
        };
    }

    /// Convenience method for obtaining the value of "phi" (the normalised
    /// angular frequency).
    fn get_phi(&self) -> f64 {
        let freq = self
            .params
            .freq
            .clamp(1.0, self.sample_rate * MAX_FREQ_RATIO);

        TAU * (freq / self.sample_rate)
    }

    /// Convenience method for obtaining the value of "alpha".
    fn get_alpha(&self, phi: f64) -> f64 {
        phi.sin() / (2.0 * self.params.q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::filtering::BUTTERWORTH_Q;
    use approx::assert_abs_diff_eq;

    const SR: f64 = 48000.0;

    fn filter(filter_type: FilterType, freq: f64, q: f64, gain: f64) -> BiquadFilter {
        let mut f = BiquadFilter::new(SR);
        f.configure(filter_type, freq, q, gain);
        f
    }

    #[test]
    fn peak_boosts_by_its_gain_at_centre() {
        let mut f = filter(FT::Peak, 800.0, 1.2, 9.0);
        assert_abs_diff_eq!(f.response_at(800.0), 9.0, epsilon = 1e-6);
        assert!(f.response_at(20.0).abs() < 0.1);
    }

    #[test]
    fn flat_peak_is_transparent() {
        let mut f = filter(FT::Peak, 800.0, 1.2, 0.0);
        for &x in &[0.3, -0.5, 0.9, 0.0, 0.1] {
            assert_abs_diff_eq!(f.process(x), x, epsilon = 1e-12);
        }
    }

    #[test]
    fn lowpass_is_3db_down_at_cutoff() {
        let mut f = filter(FT::Lowpass, 2000.0, BUTTERWORTH_Q, 0.0);
        assert_abs_diff_eq!(f.response_at(10.0), 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(f.response_at(2000.0), -3.0103, epsilon = 1e-3);
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut f = filter(FT::Highpass, 60.0, BUTTERWORTH_Q, 0.0);
        let mut out = 1.0;
        for _ in 0..48000 {
            out = f.process(1.0);
        }
        assert!(out.abs() < 1e-6);
    }

    #[test]
    fn frequency_is_limited_below_nyquist() {
        let mut f = BiquadFilter::new(16000.0);
        f.configure(FT::Lowpass, 8000.0, BUTTERWORTH_Q, 0.0);

        let mut out = 0.0;
        for i in 0..1000 {
            out = f.process(if i % 2 == 0 { 1.0 } else { -1.0 });
        }
        assert!(out.is_finite());
    }

    #[test]
    fn reset_clears_history_only() {
        let mut f = filter(FT::Lowpass, 500.0, BUTTERWORTH_Q, 0.0);
        let first = f.process(1.0);
        f.process(0.5);
        f.reset();

        assert_abs_diff_eq!(f.process(1.0), first);
        assert_eq!(f.params().freq, 500.0);
    }

    #[test]
    fn zero_in_zero_out() {
        let mut f = filter(FT::Peak, 800.0, 1.2, 9.0);
        assert!((0..64).all(|_| f.process(0.0) == 0.0));
    }
}
