//! Second-order biquad filter form supporting various filter types.

mod filter;
use super::{Filter, FilterType};

pub use filter::*;
