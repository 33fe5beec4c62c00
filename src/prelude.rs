//! Crate-wide exports for easy access.

pub use crate::error::{Error, Result};
pub use crate::params::{Param, Params, Preset, Unit};
pub use crate::settings::*;
pub use crate::util::*;
pub use std::f64::consts::{PI, TAU};
pub use std::sync::Arc;
