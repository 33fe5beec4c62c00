//! Fixed-capacity delay line with fractional reads.

use crate::util::{interp, ms_to_samples};

/// Extra samples reserved beyond the requested delay so cubic reads always
/// have their neighbours available.
const INTERP_HEADROOM: usize = 4;

/// A fixed-capacity ring buffer which supports cubic-interpolated reads at
/// fractional delay times.
///
/// A delay of `0.0` samples reads the most recently written sample.
#[derive(Debug, Clone, Default)]
pub struct DelayLine {
    /// The internal data buffer.
    data: Vec<f64>,
    /// The write position of the buffer.
    write_pos: usize,

    sample_rate: f64,
}

impl DelayLine {
    /// Returns a new `DelayLine` able to delay by at least `max_delay_ms`.
    ///
    /// # Panics
    ///
    /// Panics if `sample_rate` is not positive.
    #[must_use]
    pub fn new(max_delay_ms: f64, sample_rate: f64) -> Self {
        assert!(sample_rate > 0.0);
        let size = ms_to_samples(max_delay_ms.max(0.0), sample_rate).ceil()
            as usize
            + INTERP_HEADROOM;

        Self { data: vec![0.0; size], write_pos: 0, sample_rate }
    }

    /// Converts a time in milliseconds to a fractional number of samples at
    /// the line's sample rate.
    pub fn ms_to_samples(&self, ms: f64) -> f64 {
        ms_to_samples(ms, self.sample_rate)
    }

    /// Pushes `sample` into the line.
    pub fn write(&mut self, sample: f64) {
        if self.data.is_empty() {
            return;
        }

        self.data[self.write_pos] = sample;
        self.increment_write_pos();
    }

    /// Reads the line `delay_samples` behind the most recent write, using
    /// Catmull-Rom interpolation between the neighbouring samples.
    ///
    /// `delay_samples` is clamped to the readable range of the line.
    pub fn read_cubic(&self, delay_samples: f64) -> f64 {
        let size = self.size();
        if size < INTERP_HEADROOM {
            return 0.0;
        }

        let delay = delay_samples.clamp(0.0, self.max_delay_samples());
        let whole = delay.floor();
        let frac = delay - whole;
        let i = whole as usize;

        let p0 = if i == 0 { self.tap(0) } else { self.tap(i - 1) };

        interp::cubic_catmull(
            p0,
            self.tap(i),
            self.tap(i + 1),
            self.tap(i + 2),
            frac,
        )
    }

    /// Clears the contents of the buffer, i.e. sets its contents to `0.0`.
    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|x| *x = 0.0);
        self.write_pos = 0;
    }

    /// Returns the number of elements held by the line.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The largest delay, in samples, which can be read with interpolation.
    pub fn max_delay_samples(&self) -> f64 {
        self.size().saturating_sub(3) as f64
    }

    /// The sample written `samples_ago` writes before the most recent one.
    fn tap(&self, samples_ago: usize) -> f64 {
        let size = self.size();
        let newest = (self.write_pos + size - 1) % size;
        self.data[(newest + size - samples_ago % size) % size]
    }

    fn increment_write_pos(&mut self) {
        self.write_pos += 1;
        if self.size() <= self.write_pos {
            self.write_pos = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn capacity_covers_requested_time() {
        let line = DelayLine::new(20.0, 48000.0);
        assert!(line.max_delay_samples() >= 960.0);
    }

    #[test]
    fn integer_delay_is_exact() {
        let mut line = DelayLine::new(1.0, 1000.0);
        let mut out = vec![];
        for i in 0..5 {
            line.write((i + 1) as f64);
            out.push(line.read_cubic(1.0));
        }
        assert_eq!(out, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn zero_delay_reads_latest_write() {
        let mut line = DelayLine::new(5.0, 1000.0);
        line.write(0.25);
        line.write(-0.75);
        assert_eq!(line.read_cubic(0.0), -0.75);
    }

    #[test]
    fn fractional_delay_on_ramp_is_exact() {
        let mut line = DelayLine::new(10.0, 1000.0);
        for i in 0..8 {
            line.write(i as f64);
        }
        // newest is 7.0; 2.5 samples behind that is 4.5
        assert_abs_diff_eq!(line.read_cubic(2.5), 4.5, epsilon = 1e-12);
    }

    #[test]
    fn reads_wrap_around_the_buffer() {
        let mut line = DelayLine::new(2.0, 1000.0);
        let size = line.size();
        for i in 0..(size * 3 + 1) {
            line.write(i as f64);
        }
        let newest = (size * 3) as f64;
        assert_abs_diff_eq!(line.read_cubic(2.0), newest - 2.0, epsilon = 1e-12);
    }

    #[test]
    fn delay_is_clamped_to_capacity() {
        let mut line = DelayLine::new(2.0, 1000.0);
        line.write(1.0);
        let v = line.read_cubic(1e9);
        assert!(v.is_finite());
    }

    #[test]
    fn clear_silences_the_line() {
        let mut line = DelayLine::new(2.0, 1000.0);
        line.write(1.0);
        line.clear();
        assert_eq!(line.read_cubic(0.0), 0.0);
        assert_eq!(line.read_cubic(1.5), 0.0);
    }
}
