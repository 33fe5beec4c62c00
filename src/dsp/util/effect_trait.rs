//! Trait for audio-processing types.

use crate::params::Params;

/// Generic lifecycle for block-based audio effects.
///
/// `prepare()` sizes every internal buffer; `process()` and
/// `process_stereo()` never allocate, and carry their state across calls so
/// that consecutive blocks form one continuous stream. `reset()` clears that
/// state without reallocating.
///
/// Every processing loop is bounded by `num_frames` and by the length of each
/// buffer passed in, so mismatched buffers are silently truncated. Until an
/// effect has been prepared it copies its input to its output.
pub trait Effect: Send + std::fmt::Debug {
    /// Prepares the effect for processing at `sample_rate`, with blocks of at
    /// most `max_block_size` frames. Called once per sample rate change.
    fn prepare(&mut self, sample_rate: f64, max_block_size: usize);

    /// Processes a block of mono audio.
    fn process(&mut self, input: &[f64], output: &mut [f64], num_frames: usize);

    /// Processes a block of stereo audio.
    fn process_stereo(
        &mut self,
        in_l: &[f64],
        in_r: &[f64],
        out_l: &mut [f64],
        out_r: &mut [f64],
        num_frames: usize,
    );

    /// Clears all internal state (delay contents, phases, filter memory).
    fn reset(&mut self);

    /// Required method to obtain the sample rate of the processor.
    fn get_sample_rate(&self) -> f64;

    /// Required method to obtain the name of the effect processor.
    fn get_identifier(&self) -> &str;

    /// The effect's parameter set.
    fn params(&self) -> &dyn Params;
}

/// Copies up to `num_frames` samples from `input` to `output`.
pub fn copy_through(input: &[f64], output: &mut [f64], num_frames: usize) {
    let n = crate::util::bounded_frames(num_frames, &[input.len(), output.len()]);
    output[..n].copy_from_slice(&input[..n]);
}
