//! Signals and harnesses shared by the effect tests.

use super::Effect;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// `len` samples of seeded white noise in `-amplitude..amplitude`.
pub fn noise(seed: u64, len: usize, amplitude: f64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(-amplitude..amplitude)).collect()
}

/// A unit impulse at `position` in a block of `len` zeros.
pub fn impulse(len: usize, position: usize) -> Vec<f64> {
    let mut v = vec![0.0; len];
    v[position] = 1.0;
    v
}

/// Runs `input` through `effect` in consecutive mono blocks of `block_size`.
pub fn process_in_blocks(
    effect: &mut dyn Effect,
    input: &[f64],
    block_size: usize,
) -> Vec<f64> {
    let mut output = vec![0.0; input.len()];

    for (inp, out) in input.chunks(block_size).zip(output.chunks_mut(block_size)) {
        effect.process(inp, out, inp.len());
    }

    output
}

/// Runs a stereo pair through `effect` in consecutive blocks of `block_size`.
pub fn process_stereo_in_blocks(
    effect: &mut dyn Effect,
    left: &[f64],
    right: &[f64],
    block_size: usize,
) -> (Vec<f64>, Vec<f64>) {
    let mut out_l = vec![0.0; left.len()];
    let mut out_r = vec![0.0; right.len()];

    let blocks = left
        .chunks(block_size)
        .zip(right.chunks(block_size))
        .zip(out_l.chunks_mut(block_size).zip(out_r.chunks_mut(block_size)));

    for ((in_l, in_r), (o_l, o_r)) in blocks {
        effect.process_stereo(in_l, in_r, o_l, o_r, in_l.len());
    }

    (out_l, out_r)
}
