//! Pitch vibrato from a modulated delay.
//!
//! Sweeping the read position of a short delay line bends the pitch of its
//! output up and down; the output is fully wet.

use crate::dsp::delay::DelayLine;
use crate::dsp::synthesis::{Lfo, Waveform};
use crate::dsp::util::{copy_through, Effect};
use crate::prelude::*;

/// Delay line capacity, independent of the parameters.
const MAX_DELAY_MS: f64 = 20.0;

/// Cents of pitch deviation per millisecond of delay sweep, from the small
/// angle approximation of `2^(cents / 1200) - 1`.
const CENTS_PER_MS: f64 = 17.31;

/// Keeps the swept delay strictly positive.
const MIN_DELAY_MS: f64 = 1.0;

const WAVEFORMS: [&str; 2] = ["Sine", "Triangle"];

#[derive(Debug)]
pub struct VibratoParams {
    pub rate: Param,
    pub depth: Param,
    pub waveform: Param,
    pub rise: Param,
}

impl Default for VibratoParams {
    fn default() -> Self {
        Self {
            rate: Param::new(
                "rate",
                "Rate",
                "Speed of the pitch modulation",
                Unit::Hz,
                0.5..=10.0,
                5.0,
            ),
            depth: Param::new(
                "depth",
                "Depth",
                "Peak pitch deviation",
                Unit::Cents,
                0.0..=100.0,
                25.0,
            ),
            waveform: Param::choice(
                "waveform",
                "Waveform",
                "Shape of the modulation",
                &WAVEFORMS,
                0,
            ),
            rise: Param::new(
                "rise",
                "Rise",
                "Time for the modulation to fade in after a reset",
                Unit::Ms,
                0.0..=1000.0,
                0.0,
            ),
        }
    }
}

impl Params for VibratoParams {
    fn owner(&self) -> &'static str {
        Vibrato::IDENTIFIER
    }

    fn all(&self) -> Vec<&Param> {
        vec![&self.rate, &self.depth, &self.waveform, &self.rise]
    }
}

/// A linear fade-in from `0` to `1` over a number of samples, which then
/// holds at `1`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RiseEnvelope {
    counter: usize,
    length: usize,
}

impl RiseEnvelope {
    /// Sets the ramp length. A change mid-ramp keeps the elapsed count.
    pub fn set_length(&mut self, length_samples: usize) {
        self.length = length_samples;
    }

    /// Returns the current gain and advances by one sample.
    pub fn next_gain(&mut self) -> f64 {
        if self.counter >= self.length {
            return 1.0;
        }

        let gain = self.counter as f64 / self.length as f64;
        self.counter += 1;
        gain
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }
}

/// A snapshot of the parameters, taken at the start of each block.
#[derive(Clone, Copy, Debug)]
struct Settings {
    rate_hz: f64,
    waveform: Waveform,
    max_delay_ms: f64,
    base_delay_ms: f64,
    rise_samples: usize,
}

/// Delay-based vibrato.
///
/// Stereo processing drives both channels' delay lines from one LFO and one
/// rise envelope, so both sides move in step. Mono processing uses the same
/// LFO and envelope with the left delay line.
#[derive(Debug)]
pub struct Vibrato {
    params: Arc<VibratoParams>,
    delay_lines: [DelayLine; NUM_CHANNELS],
    lfo: Lfo,
    rise: RiseEnvelope,
    sample_rate: f64,
    prepared: bool,
}

impl Vibrato {
    pub const IDENTIFIER: &'static str = "vibrato";

    /// Creates a new vibrato with default parameters. No delay memory is
    /// allocated until `prepare()`.
    pub fn new() -> Self {
        Self {
            params: Arc::new(VibratoParams::default()),
            delay_lines: Default::default(),
            lfo: Lfo::default(),
            rise: RiseEnvelope::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            prepared: false,
        }
    }

    /// A shared handle to the parameters, for control-side writes.
    pub fn shared_params(&self) -> Arc<VibratoParams> {
        Arc::clone(&self.params)
    }

    fn settings(&self) -> Settings {
        let p = &self.params;
        let max_delay_ms = p.depth.value() / CENTS_PER_MS;

        Settings {
            rate_hz: p.rate.value(),
            waveform: match p.waveform.choice_index() {
                0 => Waveform::Sine,
                _ => Waveform::Triangle,
            },
            max_delay_ms,
            base_delay_ms: max_delay_ms + MIN_DELAY_MS,
            rise_samples: ms_to_samples(p.rise.value(), self.sample_rate) as usize,
        }
    }

    /// Applies the block's settings to the shared modulation sources.
    fn update(&mut self, settings: &Settings) {
        self.lfo.set_freq(settings.rate_hz);
        self.lfo.set_waveform(settings.waveform);
        self.rise.set_length(settings.rise_samples);
    }

    /// The delay for the next sample, in samples.
    fn next_delay(&mut self, settings: &Settings) -> f64 {
        let lfo = self.lfo.tick();
        let rise = self.rise.next_gain();
        let delay_ms = (lfo * settings.max_delay_ms).mul_add(rise, settings.base_delay_ms);

        ms_to_samples(delay_ms, self.sample_rate)
    }
}

impl Default for Vibrato {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Vibrato {
    fn prepare(&mut self, sample_rate: f64, _max_block_size: usize) {
        self.sample_rate = sample_rate.max(MIN_SAMPLE_RATE);

        for line in &mut self.delay_lines {
            *line = DelayLine::new(MAX_DELAY_MS, self.sample_rate);
        }

        self.lfo.set_sample_rate(self.sample_rate);
        self.lfo.reset();
        self.rise.reset();

        self.prepared = true;
        tracing::debug!(
            sample_rate = self.sample_rate,
            capacity = self.delay_lines[0].size(),
            "prepared vibrato"
        );
    }

    fn process(&mut self, input: &[f64], output: &mut [f64], num_frames: usize) {
        if !self.prepared {
            copy_through(input, output, num_frames);
            return;
        }

        let settings = self.settings();
        self.update(&settings);
        let n = bounded_frames(num_frames, &[input.len(), output.len()]);

        for i in 0..n {
            let delay = self.next_delay(&settings);
            let line = &mut self.delay_lines[0];

            line.write(input[i]);
            output[i] = line.read_cubic(delay);
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
        self.update(&settings);
        let n = bounded_frames(
            num_frames,
            &[in_l.len(), in_r.len(), out_l.len(), out_r.len()],
        );

        for i in 0..n {
            let delay = self.next_delay(&settings);
            let [left, right] = &mut self.delay_lines;

            left.write(in_l[i]);
            right.write(in_r[i]);
            out_l[i] = left.read_cubic(delay);
            out_r[i] = right.read_cubic(delay);
        }
    }

    fn reset(&mut self) {
        for line in &mut self.delay_lines {
            line.clear();
        }

        self.lfo.reset();
        self.rise.reset();
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
