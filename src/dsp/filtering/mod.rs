//! Module for time domain filters.

pub const BUTTERWORTH_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

pub mod biquad;

/// A trait for per-sample filters.
pub trait Filter: Send {
    /// Generic processing method for a filter.
    fn process(&mut self, sample: f64) -> f64;

    /// Clears the filter's memory without touching its parameters.
    fn reset(&mut self);
}

/// An enum which covers the available filter types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterType {
    #[default]
    Peak,
    Lowpass,
    Highpass,
}
