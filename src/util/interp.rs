//! Interpolation functions.

/// Shorthand for the `interp::linear` function.
///
/// `t` is clamped between `0` and `1`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    linear(a, b, t)
}

/// Linearly interpolates between `a` and `b` based on the value of `t`.
///
/// `t` is clamped between `0` and `1`.
pub fn linear(a: f64, b: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 {
        return a;
    }
    else if t == 1.0 {
        return b;
    }

    t.mul_add(b - a, a)
}

/// Interpolates between `p1` and `p2` based on the value of t using Catmull-Rom
/// cubic interpolation, which requires four samples.
///
/// Reproduces straight lines exactly, which keeps modulated delay reads
/// transparent for slowly-varying input.
///
/// `t` is clamped between `0` and `1`.
pub fn cubic_catmull(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let t2 = t * t;
    let t3 = t2 * t;

    let a = -0.5 * p0 + 1.5 * p1 - 1.5 * p2 + 0.5 * p3;
    let b = p0 - 2.5 * p1 + 2.0 * p2 - 0.5 * p3;
    let c = -0.5 * p0 + 0.5 * p2;
    let d = p1;

    c.mul_add(t, a.mul_add(t3, b * t2)) + d
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linear_interp() {
        assert_abs_diff_eq!(lerp(1.0, 3.0, 0.25), 1.5);
        assert_abs_diff_eq!(lerp(1.0, 3.0, -2.0), 1.0);
        assert_abs_diff_eq!(lerp(1.0, 3.0, 7.0), 3.0);
    }

    #[test]
    fn test_catmull_rom_hits_control_points() {
        assert_abs_diff_eq!(cubic_catmull(0.3, -0.2, 0.9, 0.4, 0.0), -0.2);
        assert_abs_diff_eq!(cubic_catmull(0.3, -0.2, 0.9, 0.4, 1.0), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_catmull_rom_is_exact_for_ramps() {
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert_abs_diff_eq!(
                cubic_catmull(0.0, 1.0, 2.0, 3.0, t),
                1.0 + t,
                epsilon = 1e-12
            );
        }
    }
}
