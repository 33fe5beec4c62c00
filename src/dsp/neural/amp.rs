//! Gain staging and sample-rate reconciliation around a neural amp model.

use super::handoff::{self, ModelReceiver};
use super::{LoadedModel, ModelInfo, ModelLoader, ModelSender, Resampler};
use crate::dsp::util::{copy_through, Effect};
use crate::prelude::*;
use std::path::Path;

#[derive(Debug)]
pub struct NeuralAmpParams {
    pub input_gain: Param,
    pub output_gain: Param,
    pub mix: Param,
}

impl Default for NeuralAmpParams {
    fn default() -> Self {
        Self {
            input_gain: Param::new(
                "input_gain",
                "Input Gain",
                "Gain applied before the model",
                Unit::Db,
                -24.0..=24.0,
                0.0,
            ),
            output_gain: Param::new(
                "output_gain",
                "Output Gain",
                "Gain applied after the model",
                Unit::Db,
                -24.0..=24.0,
                0.0,
            ),
            mix: Param::new(
                "mix",
                "Mix",
                "Balance between dry and modelled signal",
                Unit::Percent,
                0.0..=100.0,
                100.0,
            ),
        }
    }
}

impl Params for NeuralAmpParams {
    fn owner(&self) -> &'static str {
        NeuralAmp::IDENTIFIER
    }

    fn all(&self) -> Vec<&Param> {
        vec![&self.input_gain, &self.output_gain, &self.mix]
    }
}

/// A snapshot of the parameters, taken at the start of each block.
#[derive(Clone, Copy, Debug)]
struct Settings {
    input_gain: f64,
    output_gain: f64,
    mix: f64,
}

/// Hosts a [`NeuralModel`](super::NeuralModel).
///
/// Without a model, audio passes through scaled by the output gain only; the
/// mix control is ignored. With a model, the dry signal is blended with
/// `model(dry · input_gain) · output_gain`.
///
/// Models are mono. The stereo path feeds the model the average of both
/// channels and blends the same wet signal into each side.
#[derive(Debug)]
pub struct NeuralAmp {
    params: Arc<NeuralAmpParams>,
    model: Option<LoadedModel>,
    resampler: Resampler,
    receiver: Option<ModelReceiver>,
    sample_rate: f64,
    prepared: bool,
}

impl NeuralAmp {
    pub const IDENTIFIER: &'static str = "neural_amp";

    pub fn new() -> Self {
        Self {
            params: Arc::new(NeuralAmpParams::default()),
            model: None,
            resampler: Resampler::new(),
            receiver: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
            prepared: false,
        }
    }

    /// A shared handle to the parameters, for control-side writes.
    pub fn shared_params(&self) -> Arc<NeuralAmpParams> {
        Arc::clone(&self.params)
    }

    /// Loads a model through `loader` and installs it. On failure the
    /// current model, if any, stays in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`] with the loader's reason if loading fails.
    pub fn load_model(
        &mut self,
        loader: &dyn ModelLoader,
        path: impl AsRef<Path>,
    ) -> Result<ModelInfo> {
        let path = path.as_ref();

        match loader.load(path) {
            Ok(model) => {
                let info = model.info();
                self.set_model(model);
                Ok(info)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load model");
                Err(Error::ModelLoad { path: path.to_path_buf(), reason: e.to_string() })
            }
        }
    }

    /// Installs `model`, returning the one it replaces.
    pub fn set_model(&mut self, mut model: LoadedModel) -> Option<LoadedModel> {
        let info = model.info();
        model.model_mut().reset();

        let old = self.model.replace(model);
        self.update_resampling();

        tracing::info!(
            architecture = %info.architecture,
            model_rate = info.sample_rate,
            ratio = self.resampler.ratio(),
            "installed neural model"
        );

        old
    }

    /// Removes the current model, returning to gain-only passthrough.
    pub fn clear_model(&mut self) -> Option<LoadedModel> {
        self.model.take()
    }

    /// Opens a hand-off channel for installing models from another thread.
    /// Models sent through it are installed at the start of the next
    /// processing call. Any previously opened channel is closed.
    pub fn handoff(&mut self) -> ModelSender {
        let (sender, receiver) = handoff::channel();
        self.receiver = Some(receiver);
        sender
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_info(&self) -> Option<ModelInfo> {
        self.model.as_ref().map(LoadedModel::info)
    }

    /// Whether the model's native rate differs from the block rate.
    pub fn needs_resampling(&self) -> bool {
        self.model.is_some() && self.resampler.is_active()
    }

    /// `model_rate / block_rate`, or `1.0` without a model.
    pub fn resampling_ratio(&self) -> f64 {
        if self.model.is_some() {
            self.resampler.ratio()
        }
        else {
            1.0
        }
    }

    fn settings(&self) -> Settings {
        let p = &self.params;
        Settings {
            input_gain: db_to_level(p.input_gain.value()),
            output_gain: db_to_level(p.output_gain.value()),
            mix: percent_to_fraction(p.mix.value()),
        }
    }

    fn update_resampling(&mut self) {
        if let Some(model) = &self.model {
            self.resampler.configure(model.sample_rate(), self.sample_rate);
        }
    }

    /// Installs a model sent through the hand-off channel, if one is waiting.
    /// The model starts from a cleared state, as with `set_model()`.
    fn receive_model(&mut self) {
        let installed = self
            .receiver
            .as_ref()
            .is_some_and(|rx| rx.receive(&mut self.model));

        if installed {
            if let Some(model) = &mut self.model {
                model.model_mut().reset();
            }
            self.update_resampling();
        }
    }
}

impl Default for NeuralAmp {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for NeuralAmp {
    fn prepare(&mut self, sample_rate: f64, _max_block_size: usize) {
        self.sample_rate = sample_rate.max(MIN_SAMPLE_RATE);

        if let Some(model) = &mut self.model {
            model.model_mut().reset();
        }
        self.update_resampling();

        self.prepared = true;
        tracing::debug!(
            sample_rate = self.sample_rate,
            resampling = self.needs_resampling(),
            "prepared neural amp"
        );
    }

    fn process(&mut self, input: &[f64], output: &mut [f64], num_frames: usize) {
        if !self.prepared {
            copy_through(input, output, num_frames);
            return;
        }

        self.receive_model();
        let s = self.settings();
        let n = bounded_frames(num_frames, &[input.len(), output.len()]);
        let io = output[..n].iter_mut().zip(&input[..n]);

        let Some(loaded) = &mut self.model else {
            io.for_each(|(out, &dry)| *out = dry * s.output_gain);
            return;
        };
        let model = loaded.model_mut();

        for (out, &dry) in io {
            let wet = self.resampler.process(dry * s.input_gain, model) * s.output_gain;
            *out = dry.mul_add(1.0 - s.mix, wet * s.mix);
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

        self.receive_model();
        let s = self.settings();
        let n = bounded_frames(
            num_frames,
            &[in_l.len(), in_r.len(), out_l.len(), out_r.len()],
        );

        let Some(loaded) = &mut self.model else {
            for i in 0..n {
                out_l[i] = in_l[i] * s.output_gain;
                out_r[i] = in_r[i] * s.output_gain;
            }
            return;
        };
        let model = loaded.model_mut();

        for i in 0..n {
            let (dry_l, dry_r) = (in_l[i], in_r[i]);
            let mono = (dry_l + dry_r) * 0.5;
            let wet = self.resampler.process(mono * s.input_gain, model) * s.output_gain;

            out_l[i] = dry_l.mul_add(1.0 - s.mix, wet * s.mix);
            out_r[i] = dry_r.mul_add(1.0 - s.mix, wet * s.mix);
        }
    }

    fn reset(&mut self) {
        self.resampler.reset();

        if let Some(model) = &mut self.model {
            model.model_mut().reset();
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
