//! Distortion / Waveshaping
//!
//! A waveshaper maps every input sample through a transfer curve. The curve
//! is stored as a lookup table sampled uniformly over the input range
//! [-1, 1]; inputs outside that range are clamped to the table's ends, and
//! values in between are linearly interpolated.
//!
//! # The Drive Curve
//!
//! For a drive amount `a` in [0, 1], with `k = 10a`:
//!
//!   f(x) = (π + k)·x / (π + k·|x|)
//!
//! - `a = 0` gives `f(x) = x` (clean)
//! - the curve is linear near zero and compresses toward ±1 as `k` grows
//! - `f(±1) = ±1` for every drive, so full-scale input never exceeds unity
//! - odd-symmetric: `f(-x) = -f(x)`

use std::f32::consts::PI;

/// Table length used by the effects chain.
pub const CURVE_LEN: usize = 2048;

/// Evaluate the drive curve at normalized input `x`.
#[inline]
pub fn drive_curve(x: f32, amount: f32) -> f32 {
    let k = 10.0 * amount.clamp(0.0, 1.0);
    (PI + k) * x / (PI + k * x.abs())
}

/// Fill `curve` with the drive transfer function sampled over [-1, 1].
pub fn fill_drive_curve(curve: &mut [f32], amount: f32) {
    let n = curve.len();
    if n < 2 {
        curve.fill(0.0);
        return;
    }
    let step = 2.0 / (n - 1) as f32;
    for (i, slot) in curve.iter_mut().enumerate() {
        let x = i as f32 * step - 1.0;
        *slot = drive_curve(x, amount);
    }
}

/// Look a sample up in a transfer table.
#[inline]
pub fn shape(sample: f32, curve: &[f32]) -> f32 {
    let n = curve.len();
    if n < 2 {
        return sample;
    }
    let pos = (sample.clamp(-1.0, 1.0) + 1.0) * 0.5 * (n - 1) as f32;
    let idx = (pos.floor() as usize).min(n - 2);
    let frac = pos - idx as f32;
    curve[idx] + (curve[idx + 1] - curve[idx]) * frac
}

/// Shape an entire buffer in place.
pub fn shape_buffer(buffer: &mut [f32], curve: &[f32]) {
    for sample in buffer.iter_mut() {
        *sample = shape(*sample, curve);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_is_odd_and_zero_at_origin() {
        for step in 0..=10 {
            let amount = step as f32 / 10.0;
            assert_eq!(drive_curve(0.0, amount), 0.0);
            for i in 1..=100 {
                let x = i as f32 / 100.0;
                let pos = drive_curve(x, amount);
                let neg = drive_curve(-x, amount);
                assert!((pos + neg).abs() < 1e-6, "a={amount} x={x}");
            }
        }
    }

    #[test]
    fn zero_drive_is_identity() {
        for i in -10..=10 {
            let x = i as f32 / 10.0;
            assert!((drive_curve(x, 0.0) - x).abs() < 1e-6);
        }
    }

    #[test]
    fn full_scale_maps_to_unity() {
        for amount in [0.0, 0.3, 1.0] {
            assert!((drive_curve(1.0, amount) - 1.0).abs() < 1e-6);
            assert!((drive_curve(-1.0, amount) + 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn more_drive_compresses_harder() {
        let soft = drive_curve(0.2, 0.1);
        let hard = drive_curve(0.2, 1.0);
        assert!(hard > soft, "higher drive should lift small inputs toward 1");
    }

    #[test]
    fn table_lookup_matches_formula() {
        let mut curve = vec![0.0f32; CURVE_LEN];
        fill_drive_curve(&mut curve, 0.5);

        for x in [-0.9, -0.33, 0.0, 0.12, 0.75] {
            assert!((shape(x, &curve) - drive_curve(x, 0.5)).abs() < 1e-3);
        }
        // Out-of-range input clamps to the table ends
        assert!((shape(3.0, &curve) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn table_is_odd_symmetric() {
        let mut curve = vec![0.0f32; CURVE_LEN];
        fill_drive_curve(&mut curve, 0.8);
        for i in 0..CURVE_LEN / 2 {
            let j = CURVE_LEN - 1 - i;
            assert!((curve[i] + curve[j]).abs() < 1e-5);
        }
    }
}
