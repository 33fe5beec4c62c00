//! General-purpose utility functions.

/// Calculates amplitude in decibels from a linear power level.
#[inline]
pub fn level_to_db(level: f64) -> f64 {
    20.0 * level.log10()
}

/// Calculates the linear power level from amplitude as decibels.
#[inline]
pub fn db_to_level(db_value: f64) -> f64 {
    10.0f64.powf(db_value / 20.0)
}

/// Converts a time in milliseconds to a (fractional) number of samples.
#[inline]
pub fn ms_to_samples(ms: f64, sample_rate: f64) -> f64 {
    ms * sample_rate / 1000.0
}

/// Maps a percentage (`0.0` to `100.0`) to a fraction (`0.0` to `1.0`).
#[inline]
pub fn percent_to_fraction(percent: f64) -> f64 {
    percent / 100.0
}

/// Returns the number of frames a block may safely process: `num_frames`,
/// bounded by the length of every buffer involved in the call.
#[inline]
pub fn bounded_frames(num_frames: usize, buffer_lens: &[usize]) -> usize {
    buffer_lens.iter().fold(num_frames, |acc, &len| acc.min(len))
}

/// Returns whether `value` and `target` are equal, with a tolerance of
/// [`f64::EPSILON`].
pub fn epsilon_eq(value: f64, target: f64) -> bool {
    (target - value).abs() < f64::EPSILON
}

/// Returns whether the absolute value of `value` is less than the provided
/// `tolerance` value. Useful for checking approximate equality.
pub fn within_tolerance(value: f64, target: f64, tolerance: f64) -> bool {
    (value - target).abs() <= tolerance
}
