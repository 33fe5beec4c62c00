//! Crate-wide constants.

/// The sample rate assumed by effects which have not yet been prepared.
pub const DEFAULT_SAMPLE_RATE: f64 = 48000.0;

/// The number of audio channels handled by the stereo processing path.
pub const NUM_CHANNELS: usize = 2;

/// The lowest sample rate an effect will accept in `prepare()`; lower values
/// are raised to this.
pub const MIN_SAMPLE_RATE: f64 = 1000.0;

/// Bounded capacity of the queues used to hand neural models to and from the
/// audio thread.
pub const MODEL_HANDOFF_QUEUE_SIZE: usize = 2;
