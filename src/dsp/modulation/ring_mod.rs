//! Ring modulation: the input multiplied by a carrier oscillator, with an
//! optional LFO sweeping the carrier frequency.

use crate::dsp::synthesis::{CarrierOscillator, Lfo, Waveform};
use crate::dsp::util::{copy_through, Effect};
use crate::prelude::*;

const MIN_CARRIER_HZ: f64 = 20.0;

/// Start phase of the right channel's LFO, as a fraction of a cycle.
const RIGHT_LFO_PHASE: f64 = 0.25;

const WAVEFORMS: [&str; 4] = ["Sine", "Square", "Triangle", "Sawtooth"];

#[derive(Debug)]
pub struct RingModulatorParams {
    pub freq: Param,
    pub waveform: Param,
    pub lfo_rate: Param,
    pub lfo_depth: Param,
    pub mix: Param,
}

impl Default for RingModulatorParams {
    fn default() -> Self {
        Self {
            freq: Param::new(
                "freq",
                "Frequency",
                "Carrier frequency",
                Unit::Hz,
                MIN_CARRIER_HZ..=4000.0,
                440.0,
            ),
            waveform: Param::choice(
                "waveform",
                "Waveform",
                "Carrier shape",
                &WAVEFORMS,
                0,
            ),
            lfo_rate: Param::new(
                "lfo_rate",
                "LFO Rate",
                "Speed of the carrier frequency sweep",
                Unit::Hz,
                0.1..=10.0,
                1.0,
            ),
            lfo_depth: Param::new(
                "lfo_depth",
                "LFO Depth",
                "Amount of carrier frequency sweep",
                Unit::Percent,
                0.0..=100.0,
                0.0,
            ),
            mix: Param::new(
                "mix",
                "Mix",
                "Balance between dry and modulated signal",
                Unit::Percent,
                0.0..=100.0,
                50.0,
            ),
        }
    }
}

impl Params for RingModulatorParams {
    fn owner(&self) -> &'static str {
        RingModulator::IDENTIFIER
    }

    fn all(&self) -> Vec<&Param> {
        vec![
            &self.freq,
            &self.waveform,
            &self.lfo_rate,
            &self.lfo_depth,
            &self.mix,
        ]
    }
}

/// A snapshot of the parameters, taken at the start of each block.
#[derive(Clone, Copy, Debug)]
struct Settings {
    freq_hz: f64,
    waveform: Waveform,
    lfo_rate_hz: f64,
    lfo_depth: f64,
    mix: f64,
}

/// One channel's carrier and frequency LFO.
#[derive(Clone, Copy, Debug, Default)]
struct RingChannel {
    carrier: CarrierOscillator,
    lfo: Lfo,
}

impl RingChannel {
    fn process(&mut self, sample: f64, settings: &Settings, sample_rate: f64) -> f64 {
        let sweep = self.lfo.tick() * settings.lfo_depth;
        let freq = (settings.freq_hz * (1.0 + sweep))
            .clamp(MIN_CARRIER_HZ, sample_rate / 2.0 - 1.0);
        let carrier = self.carrier.next(settings.waveform, freq, sample_rate);

        sample.mul_add(1.0 - settings.mix, sample * carrier * settings.mix)
    }

    fn reset(&mut self) {
        self.carrier.reset();
        self.lfo.reset();
    }
}

/// Ring modulator with per-channel carriers.
///
/// Each channel has its own carrier phase and LFO. The right LFO starts a
/// quarter cycle ahead of the left, which widens the stereo image when the
/// sweep is active.
#[derive(Debug)]
pub struct RingModulator {
    params: Arc<RingModulatorParams>,
    channels: [RingChannel; NUM_CHANNELS],
    sample_rate: f64,
    prepared: bool,
}

impl RingModulator {
    pub const IDENTIFIER: &'static str = "ring_modulator";

    pub fn new() -> Self {
        Self {
            params: Arc::new(RingModulatorParams::default()),
            channels: Default::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            prepared: false,
        }
    }

    /// A shared handle to the parameters, for control-side writes.
    pub fn shared_params(&self) -> Arc<RingModulatorParams> {
        Arc::clone(&self.params)
    }

    fn settings(&self) -> Settings {
        let p = &self.params;
        Settings {
            freq_hz: p.freq.value(),
            waveform: match p.waveform.choice_index() {
                0 => Waveform::Sine,
                1 => Waveform::Square,
                2 => Waveform::Triangle,
                _ => Waveform::Sawtooth,
            },
            lfo_rate_hz: p.lfo_rate.value(),
            lfo_depth: percent_to_fraction(p.lfo_depth.value()),
            mix: percent_to_fraction(p.mix.value()),
        }
    }

    fn update(&mut self, settings: &Settings) {
        for ch in &mut self.channels {
            ch.lfo.set_freq(settings.lfo_rate_hz);
        }
    }
}

impl Default for RingModulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for RingModulator {
    fn prepare(&mut self, sample_rate: f64, _max_block_size: usize) {
        self.sample_rate = sample_rate.max(MIN_SAMPLE_RATE);

        for ch in &mut self.channels {
            ch.lfo.set_sample_rate(self.sample_rate);
        }
        self.channels[0].lfo.set_phase(0.0);
        self.channels[1].lfo.set_phase(RIGHT_LFO_PHASE);

        for ch in &mut self.channels {
            ch.reset();
        }

        self.prepared = true;
        tracing::debug!(sample_rate = self.sample_rate, "prepared ring modulator");
    }

    fn process(&mut self, input: &[f64], output: &mut [f64], num_frames: usize) {
        if !self.prepared {
            copy_through(input, output, num_frames);
            return;
        }

        let settings = self.settings();
        self.update(&settings);
        let n = bounded_frames(num_frames, &[input.len(), output.len()]);
        let sample_rate = self.sample_rate;
        let ch = &mut self.channels[0];

        for (out, &x) in output[..n].iter_mut().zip(&input[..n]) {
            *out = ch.process(x, &settings, sample_rate);
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
        let sample_rate = self.sample_rate;
        let [left, right] = &mut self.channels;

        for i in 0..n {
            out_l[i] = left.process(in_l[i], &settings, sample_rate);
            out_r[i] = right.process(in_r[i], &settings, sample_rate);
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

    const SR: f64 = 48000.0;

    fn ring_mod() -> RingModulator {
        let mut fx = RingModulator::new();
        fx.prepare(SR, 512);
        fx
    }

    #[test]
    fn full_mix_sine_multiplies_by_a_continuous_carrier() {
        let freq = 440.0;
        let mut fx = ring_mod();
        let params = fx.shared_params();
        params.mix.set_value(100.0);
        params.freq.set_value(freq);

        let input = noise(1, 4000, 1.0);
        // odd block size, so blocks end mid-cycle
        let out = process_in_blocks(&mut fx, &input, 333);

        let mut phase = 0.0;
        for (&x, &y) in input.iter().zip(&out) {
            assert_abs_diff_eq!(y, x * f64::sin(phase), epsilon = 1e-12);

            phase += TAU * freq / SR;
            if phase >= TAU {
                phase -= TAU;
            }
        }
    }

    #[test]
    fn square_carrier_flips_sign() {
        let mut fx = ring_mod();
        let params = fx.shared_params();
        params.mix.set_value(100.0);
        params.waveform.set_value(1.0);

        let out = process_in_blocks(&mut fx, &vec![0.5; 1000], 100);
        assert!(out.iter().all(|&y| y == 0.5 || y == -0.5));
        assert!(out.iter().any(|&y| y < 0.0));
    }

    #[test]
    fn sawtooth_carrier_starts_at_minus_one() {
        let mut fx = ring_mod();
        let params = fx.shared_params();
        params.mix.set_value(100.0);
        params.waveform.set_value(3.0);

        let out = process_in_blocks(&mut fx, &[1.0; 8], 8);
        assert_abs_diff_eq!(out[0], -1.0);
        assert!(out.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn zero_mix_is_dry() {
        let input = noise(2, 512, 0.5);
        let mut fx = ring_mod();
        fx.shared_params().mix.set_value(0.0);
        assert_eq!(process_in_blocks(&mut fx, &input, 128), input);
    }

    #[test]
    fn silence_stays_silent() {
        let mut fx = ring_mod();
        fx.shared_params().lfo_depth.set_value(100.0);
        let out = process_in_blocks(&mut fx, &vec![0.0; 2048], 256);
        assert!(out.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn split_blocks_match_one_block() {
        let input = noise(3, 2048, 0.5);
        let mut a = ring_mod();
        let mut b = ring_mod();
        for fx in [&a, &b] {
            fx.shared_params().lfo_depth.set_value(60.0);
        }

        assert_eq!(
            process_in_blocks(&mut a, &input, 2048),
            process_in_blocks(&mut b, &input, 1024)
        );
    }

    #[test]
    fn lfo_sweep_is_offset_between_channels() {
        let input = noise(4, 2048, 0.5);

        let mut still = ring_mod();
        still.shared_params().lfo_depth.set_value(0.0);
        let (l, r) = process_stereo_in_blocks(&mut still, &input, &input, 512);
        assert_eq!(l, r);

        let mut swept = ring_mod();
        let params = swept.shared_params();
        params.lfo_depth.set_value(100.0);
        params.lfo_rate.set_value(10.0);
        let (l, r) = process_stereo_in_blocks(&mut swept, &input, &input, 512);
        assert_ne!(l, r);
    }

    #[test]
    fn right_lfo_runs_a_quarter_cycle_ahead() {
        let mut fx = ring_mod();
        fx.shared_params().lfo_rate.set_value(3.0);

        let input = noise(7, 1000, 0.5);
        for _ in 0..2 {
            process_stereo_in_blocks(&mut fx, &input, &input, 300);

            let [left, right] = &fx.channels;
            let offset = (right.lfo.phase() - left.lfo.phase()).rem_euclid(1.0);
            assert_abs_diff_eq!(offset, RIGHT_LFO_PHASE, epsilon = 1e-9);

            fx.reset();
        }
    }

    #[test]
    fn carrier_is_limited_below_nyquist() {
        let mut fx = RingModulator::new();
        fx.prepare(2000.0, 64);
        let params = fx.shared_params();
        params.freq.set_value(4000.0);
        params.lfo_depth.set_value(100.0);

        let out = process_in_blocks(&mut fx, &noise(5, 4096, 1.0), 64);
        assert!(out.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn reset_restores_phases() {
        let input = noise(6, 700, 0.5);
        let mut fx = ring_mod();
        fx.shared_params().lfo_depth.set_value(50.0);

        let (l, r) = process_stereo_in_blocks(&mut fx, &input, &input, 100);
        fx.reset();
        assert_eq!(process_stereo_in_blocks(&mut fx, &input, &input, 100), (l, r));
    }
}
