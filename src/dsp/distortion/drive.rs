//! Tube-style overdrive.
//!
//! Signal flow per channel:
//!
//! ```text
//! highpass (60 Hz) -> mid boost (800 Hz) -> asymmetric clip -> tone lowpass -> lowpass (8 kHz) -> level
//! ```

use super::waveshaper::asymmetric_clip;
use crate::dsp::filtering::{biquad::BiquadFilter, Filter, FilterType, BUTTERWORTH_Q};
use crate::dsp::util::{copy_through, Effect};
use crate::prelude::*;

const INPUT_HIGHPASS_HZ: f64 = 60.0;
const MID_BOOST_HZ: f64 = 800.0;
const MID_BOOST_Q: f64 = 1.2;
/// Mid boost at 100% body.
const MAX_BODY_DB: f64 = 9.0;
const OUTPUT_LOWPASS_HZ: f64 = 8000.0;

#[derive(Debug)]
pub struct DriveParams {
    pub gain: Param,
    pub tone: Param,
    pub level: Param,
    pub body: Param,
}

impl Default for DriveParams {
    fn default() -> Self {
        Self {
            gain: Param::new(
                "gain",
                "Gain",
                "Drive into the clipping stage; higher adds more even harmonics",
                Unit::None,
                1.0..=30.0,
                5.0,
            ),
            tone: Param::new(
                "tone",
                "Tone",
                "Cutoff of the post-clip lowpass",
                Unit::Hz,
                500.0..=6000.0,
                3000.0,
            ),
            level: Param::new(
                "level",
                "Level",
                "Output level",
                Unit::Db,
                -20.0..=6.0,
                0.0,
            ),
            body: Param::new(
                "body",
                "Body",
                "Amount of pre-clip mid boost",
                Unit::Percent,
                0.0..=100.0,
                50.0,
            ),
        }
    }
}

impl Params for DriveParams {
    fn owner(&self) -> &'static str {
        Drive::IDENTIFIER
    }

    fn all(&self) -> Vec<&Param> {
        vec![&self.gain, &self.tone, &self.level, &self.body]
    }
}

/// A snapshot of the parameters, taken at the start of each block.
#[derive(Clone, Copy, Debug)]
struct Settings {
    gain: f64,
    tone_hz: f64,
    level: f64,
    body_db: f64,
}

/// One channel's filter chain.
#[derive(Clone, Debug)]
struct DriveChannel {
    highpass: BiquadFilter,
    mid_boost: BiquadFilter,
    tone: BiquadFilter,
    output_lowpass: BiquadFilter,
}

impl DriveChannel {
    fn new(sample_rate: f64) -> Self {
        let mut highpass = BiquadFilter::new(sample_rate);
        highpass.configure(FilterType::Highpass, INPUT_HIGHPASS_HZ, BUTTERWORTH_Q, 0.0);

        let mut mid_boost = BiquadFilter::new(sample_rate);
        mid_boost.configure(FilterType::Peak, MID_BOOST_HZ, MID_BOOST_Q, 0.0);

        let mut tone = BiquadFilter::new(sample_rate);
        tone.configure(FilterType::Lowpass, 3000.0, BUTTERWORTH_Q, 0.0);

        let mut output_lowpass = BiquadFilter::new(sample_rate);
        output_lowpass.configure(FilterType::Lowpass, OUTPUT_LOWPASS_HZ, BUTTERWORTH_Q, 0.0);

        Self { highpass, mid_boost, tone, output_lowpass }
    }

    fn filters_mut(&mut self) -> [&mut BiquadFilter; 4] {
        [
            &mut self.highpass,
            &mut self.mid_boost,
            &mut self.tone,
            &mut self.output_lowpass,
        ]
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        for filter in self.filters_mut() {
            filter.reset_sample_rate(sample_rate);
        }
    }

    /// Applies the block's body and tone settings. Unchanged values do not
    /// trigger a coefficient update.
    fn update(&mut self, settings: &Settings) {
        self.mid_boost.set_gain(settings.body_db);
        self.tone.set_freq(settings.tone_hz);
    }

    fn process(&mut self, sample: f64, settings: &Settings) -> f64 {
        let x = self.highpass.process(sample);
        let x = self.mid_boost.process(x);
        let x = asymmetric_clip(x, settings.gain);
        let x = self.tone.process(x);

        self.output_lowpass.process(x) * settings.level
    }

    fn reset(&mut self) {
        for filter in self.filters_mut() {
            filter.reset();
        }
    }
}

/// Asymmetric overdrive with a mid-boost and tone control.
///
/// Mono processing only uses the left channel's filters, so interleaving mono
/// and stereo calls on one instance shares that state between the two paths.
#[derive(Debug)]
pub struct Drive {
    params: Arc<DriveParams>,
    channels: [DriveChannel; NUM_CHANNELS],
    sample_rate: f64,
    prepared: bool,
}

impl Drive {
    pub const IDENTIFIER: &'static str = "drive";

    pub fn new() -> Self {
        Self {
            params: Arc::new(DriveParams::default()),
            channels: std::array::from_fn(|_| DriveChannel::new(DEFAULT_SAMPLE_RATE)),
            sample_rate: DEFAULT_SAMPLE_RATE,
            prepared: false,
        }
    }

    /// A shared handle to the parameters, for control-side writes.
    pub fn shared_params(&self) -> Arc<DriveParams> {
        Arc::clone(&self.params)
    }

    fn settings(&self) -> Settings {
        let p = &self.params;
        Settings {
            gain: p.gain.value(),
            tone_hz: p.tone.value(),
            level: db_to_level(p.level.value()),
            body_db: percent_to_fraction(p.body.value()) * MAX_BODY_DB,
        }
    }
}

impl Default for Drive {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Drive {
    fn prepare(&mut self, sample_rate: f64, _max_block_size: usize) {
        self.sample_rate = sample_rate.max(MIN_SAMPLE_RATE);

        for ch in &mut self.channels {
            ch.set_sample_rate(self.sample_rate);
            ch.reset();
        }

        self.prepared = true;
        tracing::debug!(sample_rate = self.sample_rate, "prepared drive");
    }

    fn process(&mut self, input: &[f64], output: &mut [f64], num_frames: usize) {
        if !self.prepared {
            copy_through(input, output, num_frames);
            return;
        }

        let settings = self.settings();
        let n = bounded_frames(num_frames, &[input.len(), output.len()]);
        let ch = &mut self.channels[0];
        ch.update(&settings);

        for (out, &x) in output[..n].iter_mut().zip(&input[..n]) {
            *out = ch.process(x, &settings);
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
        let n = bounded_frames(
            num_frames,
            &[in_l.len(), in_r.len(), out_l.len(), out_r.len()],
        );
        let [left, right] = &mut self.channels;
        left.update(&settings);
        right.update(&settings);

        for i in 0..n {
            out_l[i] = left.process(in_l[i], &settings);
            out_r[i] = right.process(in_r[i], &settings);
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
