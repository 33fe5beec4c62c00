//! Serialisable parameter snapshots.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named set of parameter values for one effect.
///
/// Captured with [`Params::capture()`](super::Params::capture) and restored
/// with [`Params::apply()`](super::Params::apply).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Identifier of the effect the preset belongs to.
    pub effect: String,
    /// Parameter values keyed by parameter id.
    pub values: BTreeMap<String, f64>,
}

impl Preset {
    /// Serialises the preset as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a preset from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Preset`](crate::Error::Preset) if `json` is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
