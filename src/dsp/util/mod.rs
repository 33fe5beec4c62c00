//! DSP utility types.

pub mod effect_trait;

pub use effect_trait::{copy_through, Effect};

#[cfg(test)]
pub(crate) mod test_signals;
