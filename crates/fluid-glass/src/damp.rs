//! Frame-rate independent exponential smoothing.

use glam::Vec3;

/// Fraction of the remaining distance closed over `dt`.
///
/// `half_life <= 0` snaps (returns 1). Always in `[0, 1]`.
#[inline]
pub fn damp_factor(half_life: f32, dt: f32) -> f32 {
    if !(half_life > 0.0) {
        return 1.0;
    }
    let dt = dt.max(0.0);
    (1.0 - (-dt / half_life).exp()).clamp(0.0, 1.0)
}

/// Moves `current` toward `target` without overshoot.
#[inline]
pub fn damp(current: f32, target: f32, half_life: f32, dt: f32) -> f32 {
    current + (target - current) * damp_factor(half_life, dt)
}

/// Per-axis [`damp`] on a vector.
#[inline]
pub fn damp3(current: Vec3, target: Vec3, half_life: f32, dt: f32) -> Vec3 {
    current.lerp(target, damp_factor(half_life, dt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_increases_distance() {
        let mut current = 10.0;
        let target = -3.0;
        for step in 0..200 {
            let next = damp(current, target, 0.15, 1.0 / 60.0 + step as f32 * 0.001);
            assert!((target - next).abs() <= (target - current).abs());
            // No overshoot: stays on the same side of the target.
            assert!(next >= target);
            current = next;
        }
        assert!((current - target).abs() < 1e-3);
    }

    #[test]
    fn strictly_closer_for_positive_dt() {
        let next = damp(0.0, 1.0, 0.15, 0.016);
        assert!(next > 0.0 && next < 1.0);
    }

    #[test]
    fn zero_dt_keeps_current() {
        assert_eq!(damp(2.0, 5.0, 0.15, 0.0), 2.0);
    }

    #[test]
    fn non_positive_half_life_snaps() {
        assert_eq!(damp(2.0, 5.0, 0.0, 0.016), 5.0);
        assert_eq!(damp(2.0, 5.0, -1.0, 0.016), 5.0);
    }

    #[test]
    fn frame_rate_independent() {
        let one = damp(0.0, 1.0, 0.15, 0.032);
        let two = damp(damp(0.0, 1.0, 0.15, 0.016), 1.0, 0.15, 0.016);
        assert!((one - two).abs() < 1e-5);
    }

    #[test]
    fn vector_damps_per_axis() {
        let v = damp3(Vec3::ZERO, Vec3::new(1.0, -2.0, 4.0), 0.15, 0.1);
        let f = damp_factor(0.15, 0.1);
        assert!((v - Vec3::new(f, -2.0 * f, 4.0 * f)).length() < 1e-6);
    }
}
