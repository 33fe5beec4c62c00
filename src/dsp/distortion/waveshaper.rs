//! Signal waveshaping transfer functions.

/// The largest drive amount the asymmetry bias is scaled against.
const MAX_DRIVE: f64 = 30.0;

/// The DC bias applied before the curve at maximum drive.
const MAX_BIAS: f64 = 0.25;

/// Asymmetric soft saturation, loosely modelling a single-ended tube stage.
///
/// `drive` scales the input into a `tanh` curve. As it rises, an increasing
/// bias shifts the operating point so that the positive half clips earlier
/// than the negative half, which adds even harmonics. The bias is removed
/// again afterwards, so `0.0` always maps to `0.0`.
///
/// `drive` values below `1.0` are treated as `1.0`.
pub fn asymmetric_clip(sample: f64, drive: f64) -> f64 {
    let drive = drive.max(1.0);
    let bias = MAX_BIAS * ((drive - 1.0) / (MAX_DRIVE - 1.0)).min(1.0);

    drive.mul_add(sample, bias).tanh() - bias.tanh()
}
