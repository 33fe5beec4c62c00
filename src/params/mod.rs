//! Effect parameters.
//!
//! Parameter values are written by a control-side actor (a UI, a preset
//! loader) and read by the audio thread at the start of each processing call.
//! Values live in atomics so a parameter set can be shared through an `Arc`
//! without locking.

mod param;
mod preset;

pub use param::{Param, Unit};
pub use preset::Preset;

use crate::error::{Error, Result};
use std::fmt::Debug;

/// A fixed set of parameters owned by one effect.
pub trait Params: Send + Sync + Debug {
    /// The identifier of the effect which owns this set.
    fn owner(&self) -> &'static str;

    /// All parameters in declaration order.
    fn all(&self) -> Vec<&Param>;

    /// Looks up a parameter by its identifier.
    fn get(&self, id: &str) -> Option<&Param> {
        self.all().into_iter().find(|p| p.id() == id)
    }

    /// Sets the parameter named `id`, clamping `value` to its range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownParameter`] if no parameter is named `id`.
    fn set(&self, id: &str, value: f64) -> Result<()> {
        let param = self
            .get(id)
            .ok_or_else(|| Error::UnknownParameter(id.to_string()))?;

        param.set_value(value);
        Ok(())
    }

    /// Returns every parameter to its default value.
    fn reset_to_defaults(&self) {
        self.all().into_iter().for_each(Param::reset);
    }

    /// Captures the current values as a [`Preset`].
    fn capture(&self) -> Preset {
        Preset {
            effect: self.owner().to_string(),
            values: self
                .all()
                .into_iter()
                .map(|p| (p.id().to_string(), p.value()))
                .collect(),
        }
    }

    /// Applies `preset` to this set. Nothing is written unless the preset
    /// targets this effect and every parameter it names exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PresetMismatch`] if the preset was captured from
    /// another effect, or [`Error::UnknownParameter`] for the first
    /// unrecognised parameter id.
    fn apply(&self, preset: &Preset) -> Result<()> {
        if preset.effect != self.owner() {
            return Err(Error::PresetMismatch {
                expected: self.owner().to_string(),
                found: preset.effect.clone(),
            });
        }

        if let Some(unknown) =
            preset.values.keys().find(|id| self.get(id).is_none())
        {
            return Err(Error::UnknownParameter(unknown.clone()));
        }

        for (id, &value) in &preset.values {
            self.set(id, value)?;
        }

        Ok(())
    }
}
