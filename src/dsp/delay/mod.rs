//! Delay types and implementations.

pub mod delay_line;
pub mod reverse_delay;

pub use delay_line::DelayLine;
pub use reverse_delay::{ReverseDelay, ReverseDelayParams};
