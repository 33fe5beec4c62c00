//! Module for signal generation.

use std::f64::consts::{PI, TAU};

pub mod carrier;
pub mod lfo;
pub mod phasor;

pub use carrier::CarrierOscillator;
pub use lfo::Lfo;
pub use phasor::Phasor;

/// Basic, non-anti-aliased waveform shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl Waveform {
    /// Evaluates the waveform at `phase` radians, in the range `0.0` to `2π`.
    /// Every shape outputs values between `-1.0` and `1.0`.
    ///
    /// - `Square` is `1.0` for the first half-cycle and `-1.0` after it.
    /// - `Triangle` rises from `-1.0` at `0` to `1.0` at `π` and falls back.
    /// - `Sawtooth` ramps linearly from `-1.0` to `1.0` across the cycle.
    #[inline]
    pub fn evaluate(self, phase: f64) -> f64 {
        match self {
            Self::Sine => phase.sin(),
            Self::Square => {
                if phase < PI {
                    1.0
                }
                else {
                    -1.0
                }
            }
            Self::Triangle => 2.0f64.mul_add(-(phase / PI - 1.0).abs(), 1.0),
            Self::Sawtooth => phase / PI - 1.0,
        }
    }

    /// Evaluates the waveform at a normalised phase (`0.0` to `1.0`).
    #[inline]
    pub fn evaluate_normalized(self, phase: f64) -> f64 {
        self.evaluate(phase * TAU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn triangle_peaks_at_half_cycle() {
        let tri = Waveform::Triangle;
        assert_abs_diff_eq!(tri.evaluate(0.0), -1.0);
        assert_abs_diff_eq!(tri.evaluate(PI / 2.0), 0.0);
        assert_abs_diff_eq!(tri.evaluate(PI), 1.0);
        assert_abs_diff_eq!(tri.evaluate(1.5 * PI), 0.0);
    }

    #[test]
    fn square_switches_at_half_cycle() {
        assert_eq!(Waveform::Square.evaluate(PI - 1e-9), 1.0);
        assert_eq!(Waveform::Square.evaluate(PI), -1.0);
    }

    #[test]
    fn sawtooth_ramps_across_cycle() {
        let saw = Waveform::Sawtooth;
        assert_abs_diff_eq!(saw.evaluate(0.0), -1.0);
        assert_abs_diff_eq!(saw.evaluate(PI), 0.0);
        assert_abs_diff_eq!(saw.evaluate(TAU), 1.0);
    }

    #[test]
    fn shapes_stay_in_range() {
        for wave in [Waveform::Sine, Waveform::Square, Waveform::Triangle, Waveform::Sawtooth] {
            for i in 0..100 {
                let v = wave.evaluate_normalized(i as f64 / 100.0);
                assert!((-1.0..=1.0).contains(&v));
            }
        }
    }
}
