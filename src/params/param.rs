//! A single, range-clamped effect parameter.

use atomic_float::AtomicF64;
use std::fmt::{Display, Formatter, Result};
use std::ops::RangeInclusive;
use std::sync::atomic::Ordering::Relaxed;

/// The unit a parameter's value is expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Unit {
    #[default]
    None,
    Hz,
    Ms,
    Db,
    Percent,
    Cents,
    /// An index into a fixed list of named choices.
    Choice,
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::None | Self::Choice => write!(f, ""),
            Self::Hz => write!(f, "Hz"),
            Self::Ms => write!(f, "ms"),
            Self::Db => write!(f, "dB"),
            Self::Percent => write!(f, "%"),
            Self::Cents => write!(f, "ct"),
        }
    }
}

/// An effect parameter with a declared range and default.
///
/// The value is stored atomically, so it may be set from a control thread
/// through a shared reference. `set_value()` always clamps, so the value can
/// never leave `range()`. Choice parameters additionally round to the nearest
/// index.
#[derive(Debug)]
pub struct Param {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    unit: Unit,
    min: f64,
    max: f64,
    default: f64,
    choices: &'static [&'static str],
    value: AtomicF64,
}

impl Param {
    /// Creates a continuous parameter. `default` is clamped to `range`.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `range` is empty.
    pub fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        unit: Unit,
        range: RangeInclusive<f64>,
        default: f64,
    ) -> Self {
        let (min, max) = range.into_inner();
        debug_assert!(min <= max);
        let default = default.clamp(min, max);

        Self {
            id,
            name,
            description,
            unit,
            min,
            max,
            default,
            choices: &[],
            value: AtomicF64::new(default),
        }
    }

    /// Creates an enumerated parameter over `choices`.
    ///
    /// # Panics
    ///
    /// Panics if `choices` is empty.
    pub fn choice(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        choices: &'static [&'static str],
        default_index: usize,
    ) -> Self {
        assert!(!choices.is_empty(), "choice parameter \"{id}\" has no choices");
        let max = (choices.len() - 1) as f64;

        Self {
            choices,
            ..Self::new(id, name, description, Unit::Choice, 0.0..=max, default_index as f64)
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn range(&self) -> RangeInclusive<f64> {
        self.min..=self.max
    }

    pub fn default_value(&self) -> f64 {
        self.default
    }

    /// The current value.
    pub fn value(&self) -> f64 {
        self.value.load(Relaxed)
    }

    /// Sets the value, clamped to the declared range. NaN is ignored.
    pub fn set_value(&self, value: f64) {
        if value.is_nan() {
            return;
        }

        let mut value = value.clamp(self.min, self.max);
        if self.is_choice() {
            value = value.round();
        }

        self.value.store(value, Relaxed);
    }

    /// Returns the value to its default.
    pub fn reset(&self) {
        self.value.store(self.default, Relaxed);
    }

    pub fn is_choice(&self) -> bool {
        !self.choices.is_empty()
    }

    /// The current value as a discrete index. Continuous parameters round
    /// their value.
    pub fn choice_index(&self) -> usize {
        self.value().round().max(0.0) as usize
    }

    /// The name of the current choice, if this is an enumerated parameter.
    pub fn choice_name(&self) -> Option<&'static str> {
        self.choices.get(self.choice_index()).copied()
    }

    pub fn choices(&self) -> &'static [&'static str] {
        self.choices
    }
}

impl Display for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.choice_name() {
            Some(choice) => write!(f, "{}: {choice}", self.name),
            None => write!(f, "{}: {:.2} {}", self.name, self.value(), self.unit),
        }
    }
}
