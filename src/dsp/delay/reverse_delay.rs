//! Reversed-echo delay built on a pair of ping-pong buffers.
//!
//! Each channel owns two equally sized buffers. One is written while the
//! other is read backwards; their roles swap at the end of every cycle, so
//! the previous cycle is always playing in reverse.

use crate::dsp::util::{copy_through, Effect};
use crate::prelude::*;

/// The longest supported cycle, which sets the buffer capacity.
const MAX_TIME_MS: f64 = 2000.0;

#[derive(Debug)]
pub struct ReverseDelayParams {
    pub time: Param,
    pub feedback: Param,
    pub crossfade: Param,
    pub mix: Param,
}

impl Default for ReverseDelayParams {
    fn default() -> Self {
        Self {
            time: Param::new(
                "time",
                "Time",
                "Length of each reversed segment",
                Unit::Ms,
                100.0..=MAX_TIME_MS,
                500.0,
            ),
            feedback: Param::new(
                "feedback",
                "Feedback",
                "Amount of reversed signal fed back into the buffer",
                Unit::Percent,
                0.0..=95.0,
                30.0,
            ),
            crossfade: Param::new(
                "crossfade",
                "Crossfade",
                "Fade length at each end of a segment, relative to its length",
                Unit::Percent,
                5.0..=50.0,
                10.0,
            ),
            mix: Param::new(
                "mix",
                "Mix",
                "Balance between dry and reversed signal",
                Unit::Percent,
                0.0..=100.0,
                50.0,
            ),
        }
    }
}

impl Params for ReverseDelayParams {
    fn owner(&self) -> &'static str {
        ReverseDelay::IDENTIFIER
    }

    fn all(&self) -> Vec<&Param> {
        vec![&self.time, &self.feedback, &self.crossfade, &self.mix]
    }
}

/// The fade applied across one buffer cycle.
///
/// Gain ramps from `0` to `1` over the first `crossfade_samples` read
/// positions, and back down to `0` over the last `crossfade_samples`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossfadeWindow {
    buffer_size: usize,
    crossfade_samples: usize,
}

impl CrossfadeWindow {
    /// `fraction` is the crossfade length relative to `buffer_size`.
    pub fn new(buffer_size: usize, fraction: f64) -> Self {
        let crossfade_samples = ((buffer_size as f64 * fraction.max(0.0))
            .floor() as usize)
            .min(buffer_size);

        Self { buffer_size, crossfade_samples }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn crossfade_samples(&self) -> usize {
        self.crossfade_samples
    }

    /// The fade gain at read position `pos`.
    pub fn gain_at(&self, pos: usize) -> f64 {
        if self.crossfade_samples == 0 {
            return 1.0;
        }

        let len = self.crossfade_samples as f64;
        let fade_in = pos as f64 / len;
        let fade_out = (self.buffer_size as f64 - 1.0 - pos as f64) / len;

        fade_in.min(fade_out).clamp(0.0, 1.0)
    }
}

/// Per-channel reversal state.
#[derive(Clone, Debug, Default)]
struct ReverseChannel {
    buffers: [Vec<f64>; 2],
    /// Index of the buffer currently being written.
    write_buffer: usize,
    write_pos: usize,
    read_pos: usize,
    /// The last faded, reversed sample, fed back on the next write.
    feedback_sample: f64,
}

impl ReverseChannel {
    /// Allocates; call from `prepare()` only.
    fn allocate(&mut self, capacity: usize) {
        for buffer in &mut self.buffers {
            buffer.clear();
            buffer.resize(capacity, 0.0);
        }

        self.reset();
    }

    fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.iter_mut().for_each(|x| *x = 0.0);
        }

        self.write_buffer = 0;
        self.write_pos = 0;
        self.read_pos = 0;
        self.feedback_sample = 0.0;
    }

    /// Processes one sample, returning the mixed output.
    ///
    /// The write cursor is not bounded against a `buffer_size` that shrank
    /// mid-cycle: it keeps writing at its old position for one sample, then
    /// wraps. Only the mirrored read index is clamped.
    fn process(
        &mut self,
        dry: f64,
        window: &CrossfadeWindow,
        feedback: f64,
        mix: f64,
    ) -> f64 {
        let size = window.buffer_size();
        let read_buffer = 1 - self.write_buffer;

        self.buffers[self.write_buffer][self.write_pos] =
            self.feedback_sample.mul_add(feedback, dry);

        let reverse_index = (size as isize - 1 - self.read_pos as isize)
            .clamp(0, size as isize - 1) as usize;
        let reversed = self.buffers[read_buffer][reverse_index]
            * window.gain_at(self.read_pos);

        self.feedback_sample = reversed;

        self.write_pos += 1;
        self.read_pos += 1;

        if self.write_pos >= size {
            self.write_pos = 0;
            self.read_pos = 0;
            self.write_buffer = read_buffer;
        }

        dry.mul_add(1.0 - mix, reversed * mix)
    }
}

/// A snapshot of the parameters, taken at the start of each block.
#[derive(Clone, Copy, Debug)]
struct Settings {
    time_ms: f64,
    feedback: f64,
    crossfade: f64,
    mix: f64,
}

/// A delay which plays each segment of its input backwards.
#[derive(Debug)]
pub struct ReverseDelay {
    params: Arc<ReverseDelayParams>,
    channels: [ReverseChannel; NUM_CHANNELS],
    /// Capacity of each buffer, in samples.
    capacity: usize,
    sample_rate: f64,
    prepared: bool,
}

impl ReverseDelay {
    pub const IDENTIFIER: &'static str = "reverse_delay";

    /// Creates a new reverse delay with default parameters. No buffers are
    /// allocated until `prepare()`.
    pub fn new() -> Self {
        Self {
            params: Arc::new(ReverseDelayParams::default()),
            channels: Default::default(),
            capacity: 0,
            sample_rate: DEFAULT_SAMPLE_RATE,
            prepared: false,
        }
    }

    /// A shared handle to the parameters, for control-side writes.
    pub fn shared_params(&self) -> Arc<ReverseDelayParams> {
        Arc::clone(&self.params)
    }

    /// The capacity of each buffer in samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The cycle length for `time_ms`, clamped to the buffer capacity.
    fn buffer_size(&self, time_ms: f64) -> usize {
        (ms_to_samples(time_ms, self.sample_rate) as usize)
            .clamp(1, self.capacity.max(1))
    }

    fn settings(&self) -> Settings {
        let p = &self.params;
        Settings {
            time_ms: p.time.value(),
            feedback: percent_to_fraction(p.feedback.value()),
            crossfade: percent_to_fraction(p.crossfade.value()),
            mix: percent_to_fraction(p.mix.value()),
        }
    }

    fn window(&self, settings: &Settings) -> CrossfadeWindow {
        CrossfadeWindow::new(self.buffer_size(settings.time_ms), settings.crossfade)
    }
}

impl Default for ReverseDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for ReverseDelay {
    fn prepare(&mut self, sample_rate: f64, _max_block_size: usize) {
        self.sample_rate = sample_rate.max(MIN_SAMPLE_RATE);
        self.capacity =
            ms_to_samples(MAX_TIME_MS, self.sample_rate).ceil() as usize;

        for ch in &mut self.channels {
            ch.allocate(self.capacity);
        }

        self.prepared = true;
        tracing::debug!(
            sample_rate = self.sample_rate,
            capacity = self.capacity,
            "prepared reverse delay"
        );
    }

    fn process(&mut self, input: &[f64], output: &mut [f64], num_frames: usize) {
        if !self.prepared {
            copy_through(input, output, num_frames);
            return;
        }

        let settings = self.settings();
        let window = self.window(&settings);
        let n = bounded_frames(num_frames, &[input.len(), output.len()]);
        let ch = &mut self.channels[0];

        for (out, &dry) in output[..n].iter_mut().zip(&input[..n]) {
            *out = ch.process(dry, &window, settings.feedback, settings.mix);
        }
    }

    fn process_stereo(
        &mut self,
        in_l: &[f64],
        in_r: &[f64],
        out_l: &mut [f64],
        out_r: &mut [f64],
        num_frames: usize,
    ) {
        if !self.prepared {
            copy_through(in_l, out_l, num_frames);
            copy_through(in_r, out_r, num_frames);
            return;
        }

        let settings = self.settings();
        let window = self.window(&settings);
        let n = bounded_frames(
            num_frames,
            &[in_l.len(), in_r.len(), out_l.len(), out_r.len()],
        );
        let [left, right] = &mut self.channels;

        for i in 0..n {
            out_l[i] =
                left.process(in_l[i], &window, settings.feedback, settings.mix);
            out_r[i] =
                right.process(in_r[i], &window, settings.feedback, settings.mix);
        }
    }

    fn reset(&mut self) {
        for ch in &mut self.channels {
            ch.reset();
        }
    }

    fn get_sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn get_identifier(&self) -> &str {
        Self::IDENTIFIER
    }

    fn params(&self) -> &dyn Params {
        self.params.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::util::test_signals::*;
    use approx::assert_abs_diff_eq;

    /// 1 kHz keeps buffer sizes readable: 100 ms is 100 samples.
    const SR: f64 = 1000.0;

    fn reverse_delay(time: f64, feedback: f64, crossfade: f64, mix: f64) -> ReverseDelay {
        let mut fx = ReverseDelay::new();
        let p = fx.shared_params();
        p.time.set_value(time);
        p.feedback.set_value(feedback);
        p.crossfade.set_value(crossfade);
        p.mix.set_value(mix);
        fx.prepare(SR, 256);
        fx
    }

    #[test]
    fn silence_stays_silent() {
        let mut fx = reverse_delay(100.0, 80.0, 20.0, 100.0);
        let out = process_in_blocks(&mut fx, &vec![0.0; 1000], 64);
        assert!(out.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn impulse_is_mirrored_in_next_cycle() {
        let (size, k, mix) = (100, 30, 0.5);
        let mut fx = reverse_delay(100.0, 0.0, 5.0, mix * 100.0);
        let out = process_in_blocks(&mut fx, &impulse(3 * size, k), 32);

        assert_abs_diff_eq!(out[k], 1.0 - mix);
        assert_abs_diff_eq!(out[size + size - 1 - k], mix);

        for (i, &x) in out.iter().enumerate() {
            if i != k && i != 2 * size - 1 - k {
                assert_eq!(x, 0.0, "unexpected output at {i}");
            }
        }
    }

    #[test]
    fn feedback_returns_the_echo_forwards() {
        let (size, k, fb) = (100, 30, 0.5);
        let mut fx = reverse_delay(100.0, fb * 100.0, 5.0, 100.0);
        let out = process_in_blocks(&mut fx, &impulse(3 * size, k), 100);

        assert_abs_diff_eq!(out[2 * size - 1 - k], 1.0);
        // the feedback register lands one write later, so the second
        // reversal comes out one sample early
        assert_abs_diff_eq!(out[2 * size + k - 1], fb, epsilon = 1e-12);
    }

    #[test]
    fn dry_signal_only_at_zero_mix() {
        let mut fx = reverse_delay(150.0, 50.0, 10.0, 0.0);
        let input = noise(3, 700, 1.0);
        let out = process_in_blocks(&mut fx, &input, 128);
        assert_eq!(out, input);
    }

    #[test]
    fn crossfade_window_shape() {
        let w = CrossfadeWindow::new(100, 0.1);
        assert_eq!(w.crossfade_samples(), 10);
        assert_eq!(w.gain_at(0), 0.0);
        assert_abs_diff_eq!(w.gain_at(5), 0.5);
        assert_eq!(w.gain_at(10), 1.0);
        assert_eq!(w.gain_at(50), 1.0);
        assert_abs_diff_eq!(w.gain_at(94), 0.5);
        assert_eq!(w.gain_at(99), 0.0);
        assert_eq!(w.gain_at(150), 0.0);
    }

    #[test]
    fn crossfade_never_exceeds_buffer() {
        let w = CrossfadeWindow::new(7, 3.0);
        assert!(w.crossfade_samples() <= w.buffer_size());
    }

    #[test]
    fn time_is_clamped_to_capacity() {
        let fx = reverse_delay(2000.0, 0.0, 5.0, 100.0);
        assert_eq!(fx.capacity(), 2000);
        assert_eq!(fx.buffer_size(5000.0), 2000);
    }

    #[test]
    fn shrinking_time_leaves_write_cursor_past_bound_for_one_sample() {
        // The write cursor is deliberately not clamped when the cycle
        // shrinks; this pins the current behaviour.
        let mut fx = reverse_delay(200.0, 0.0, 5.0, 100.0);
        process_in_blocks(&mut fx, &vec![0.0; 150], 150);
        assert_eq!(fx.channels[0].write_pos, 150);

        fx.params.time.set_value(100.0);
        let mut out = [0.0];
        fx.process(&[0.75], &mut out, 1);

        let ch = &fx.channels[0];
        assert_eq!(ch.buffers[0][150], 0.75);
        assert_eq!(ch.write_pos, 0);
        assert_eq!(ch.read_pos, 0);
        assert_eq!(ch.write_buffer, 1);
    }

    #[test]
    fn stereo_channels_are_independent() {
        let mut fx = reverse_delay(100.0, 40.0, 10.0, 100.0);
        let left = noise(1, 400, 1.0);
        let right = vec![0.0; 400];
        let (out_l, out_r) = process_stereo_in_blocks(&mut fx, &left, &right, 64);

        assert!(out_l.iter().any(|&x| x != 0.0));
        assert!(out_r.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn block_size_does_not_change_output() {
        let input = noise(9, 1024, 0.8);
        let mut a = reverse_delay(120.0, 60.0, 25.0, 70.0);
        let mut b = reverse_delay(120.0, 60.0, 25.0, 70.0);

        assert_eq!(
            process_in_blocks(&mut a, &input, 1024),
            process_in_blocks(&mut b, &input, 512)
        );
    }

    #[test]
    fn reset_clears_buffers_and_cursors() {
        let mut fx = reverse_delay(100.0, 50.0, 10.0, 100.0);
        process_in_blocks(&mut fx, &noise(4, 250, 1.0), 64);
        fx.reset();

        let out = process_in_blocks(&mut fx, &vec![0.0; 300], 64);
        assert!(out.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn unprepared_passes_through() {
        let mut fx = ReverseDelay::new();
        let input = noise(2, 32, 1.0);
        let out = process_in_blocks(&mut fx, &input, 32);
        assert_eq!(out, input);
    }

    #[test]
    fn mismatched_buffers_are_truncated() {
        let mut fx = reverse_delay(100.0, 0.0, 5.0, 50.0);
        let input = [1.0; 8];
        let mut output = [9.0; 4];
        fx.process(&input, &mut output, 16);
        assert_eq!(output, [0.5; 4]);
    }
}
