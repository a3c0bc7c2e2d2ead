//! Interpolation policies for sampling a volume at continuous indices.

use crate::error::Error;
use ndarray::ArrayView3;
use std::str::FromStr;

/// How source intensities are sampled during resampling.
///
/// Label volumes are always resampled with [`Interpolation::Nearest`]
/// regardless of the configured policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Round to the nearest voxel. Never invents values; required for labels.
    Nearest,
    /// Trilinear interpolation over the surrounding 2x2x2 cell.
    #[default]
    Linear,
    /// Cubic B-spline kernel over the surrounding 4x4x4 neighborhood.
    BSpline,
}

impl FromStr for Interpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "linear" => Ok(Self::Linear),
            "bspline" => Ok(Self::BSpline),
            other => Err(Error::InvalidConfig(format!(
                "Interpolation must be \"nearest\", \"linear\" or \"bspline\", got \"{}\"",
                other
            ))),
        }
    }
}

/// Sample `source` at a continuous index, returning `default` for
/// coordinates outside the volume extent.
///
/// All policies share one extent predicate, so under a common transform a
/// label volume (nearest) and its paired intensity volume (linear or
/// B-spline) receive the fill value at exactly the same output voxels.
pub(crate) fn sample(
    source: &ArrayView3<'_, f32>,
    index: [f64; 3],
    interpolation: Interpolation,
    default: f32,
) -> f32 {
    if !in_extent(source.shape(), index) {
        return default;
    }
    match interpolation {
        Interpolation::Nearest => sample_nearest(source, index),
        Interpolation::Linear => sample_linear(source, index),
        Interpolation::BSpline => sample_bspline(source, index, default),
    }
}

/// Whether a continuous index lies within `[0, n - 1]` on every axis.
fn in_extent(shape: &[usize], index: [f64; 3]) -> bool {
    (0..3).all(|axis| {
        let max = (shape[axis] - 1) as f64;
        index[axis] >= 0.0 && index[axis] <= max
    })
}

fn sample_nearest(source: &ArrayView3<'_, f32>, index: [f64; 3]) -> f32 {
    let voxel = [
        index[0].round() as usize,
        index[1].round() as usize,
        index[2].round() as usize,
    ];
    source[voxel]
}

fn sample_linear(source: &ArrayView3<'_, f32>, index: [f64; 3]) -> f32 {
    let shape = source.shape();
    let mut lower = [0usize; 3];
    let mut frac = [0.0f64; 3];
    for axis in 0..3 {
        let x = index[axis];
        let max = (shape[axis] - 1) as f64;
        let mut floor = x.floor();
        // Keep the 2-voxel cell inside the array at the upper edge.
        if floor >= max {
            floor = max - 1.0;
        }
        let floor = floor.max(0.0);
        lower[axis] = floor as usize;
        frac[axis] = x - floor;
    }

    let mut value = 0.0f64;
    for corner in 0..8usize {
        let mut weight = 1.0f64;
        let mut voxel = [0usize; 3];
        for axis in 0..3 {
            if corner >> axis & 1 == 1 {
                voxel[axis] = lower[axis] + 1;
                weight *= frac[axis];
            } else {
                voxel[axis] = lower[axis];
                weight *= 1.0 - frac[axis];
            }
        }
        // Zero-weight corners may sit outside singleton axes; never index them.
        if weight == 0.0 {
            continue;
        }
        value += weight * source[[voxel[0], voxel[1], voxel[2]]] as f64;
    }
    value as f32
}

/// Cubic B-spline basis:
/// `2/3 - |x|^2 + |x|^3 / 2` for `|x| < 1`, `(2 - |x|)^3 / 6` for
/// `1 <= |x| < 2`, zero otherwise.
fn cubic_bspline(x: f64) -> f64 {
    let abs_x = x.abs();
    if abs_x < 1.0 {
        (2.0 / 3.0) - abs_x.powi(2) + 0.5 * abs_x.powi(3)
    } else if abs_x < 2.0 {
        (2.0 - abs_x).powi(3) / 6.0
    } else {
        0.0
    }
}

fn sample_bspline(source: &ArrayView3<'_, f32>, index: [f64; 3], default: f32) -> f32 {
    let shape = source.shape();
    let base = [
        index[0].floor() as isize - 1,
        index[1].floor() as isize - 1,
        index[2].floor() as isize - 1,
    ];

    let mut value = 0.0f64;
    let mut weight_sum = 0.0f64;
    for di in 0..4isize {
        let i = base[0] + di;
        let wi = cubic_bspline(index[0] - i as f64);
        let ci = i.clamp(0, shape[0] as isize - 1) as usize;
        for dj in 0..4isize {
            let j = base[1] + dj;
            let wj = cubic_bspline(index[1] - j as f64);
            let cj = j.clamp(0, shape[1] as isize - 1) as usize;
            for dk in 0..4isize {
                let k = base[2] + dk;
                let wk = cubic_bspline(index[2] - k as f64);
                let ck = k.clamp(0, shape[2] as isize - 1) as usize;
                let weight = wi * wj * wk;
                value += weight * source[[ci, cj, ck]] as f64;
                weight_sum += weight;
            }
        }
    }

    if weight_sum > 0.0 {
        (value / weight_sum) as f32
    } else {
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn gradient_volume() -> Array3<f32> {
        Array3::from_shape_fn((5, 5, 5), |(i, j, k)| (i * 25 + j * 5 + k) as f32)
    }

    #[test]
    fn test_parse_interpolation() {
        assert_eq!(
            "nearest".parse::<Interpolation>().unwrap(),
            Interpolation::Nearest
        );
        assert_eq!(
            "Linear".parse::<Interpolation>().unwrap(),
            Interpolation::Linear
        );
        assert_eq!(
            "bspline".parse::<Interpolation>().unwrap(),
            Interpolation::BSpline
        );
        assert!("cubic".parse::<Interpolation>().is_err());
    }

    #[test]
    fn test_nearest_at_integer_coordinates() {
        let volume = gradient_volume();
        let view = volume.view();
        let value = sample(&view, [2.0, 3.0, 4.0], Interpolation::Nearest, -1.0);
        assert_eq!(value, volume[[2, 3, 4]]);
    }

    #[test]
    fn test_nearest_rounds() {
        let volume = gradient_volume();
        let view = volume.view();
        let value = sample(&view, [1.6, 2.4, 3.5], Interpolation::Nearest, -1.0);
        assert_eq!(value, volume[[2, 2, 4]]);
    }

    #[test]
    fn test_linear_exact_at_integer_coordinates() {
        let volume = gradient_volume();
        let view = volume.view();
        let value = sample(&view, [1.0, 2.0, 3.0], Interpolation::Linear, -1.0);
        assert!((value - volume[[1, 2, 3]]).abs() < 1e-5);
    }

    #[test]
    fn test_linear_midpoint() {
        let volume = gradient_volume();
        let view = volume.view();
        // Linear along the last axis: halfway between k=1 and k=2.
        let value = sample(&view, [0.0, 0.0, 1.5], Interpolation::Linear, -1.0);
        assert!((value - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_out_of_bounds_yields_default() {
        let volume = gradient_volume();
        let view = volume.view();
        for interpolation in [
            Interpolation::Nearest,
            Interpolation::Linear,
            Interpolation::BSpline,
        ] {
            assert_eq!(sample(&view, [-1.0, 0.0, 0.0], interpolation, -7.0), -7.0);
            assert_eq!(sample(&view, [0.0, 0.0, 10.0], interpolation, -7.0), -7.0);
        }
    }

    #[test]
    fn test_extent_is_shared_across_policies() {
        // Paired volumes resampled with different policies must agree on
        // where the volume ends: the half-voxel rim just outside the first
        // and last voxel yields the default for every policy, including
        // nearest (no rounding back into the volume).
        let volume = gradient_volume();
        let view = volume.view();
        for interpolation in [
            Interpolation::Nearest,
            Interpolation::Linear,
            Interpolation::BSpline,
        ] {
            assert_eq!(sample(&view, [-0.4, 0.0, 0.0], interpolation, -7.0), -7.0);
            assert_eq!(sample(&view, [2.0, 4.3, 2.0], interpolation, -7.0), -7.0);
            assert_eq!(sample(&view, [0.0, 0.0, 4.4], interpolation, -7.0), -7.0);
        }
    }

    #[test]
    fn test_bspline_reproduces_constant() {
        let volume = Array3::from_elem((6, 6, 6), 3.25f32);
        let view = volume.view();
        let value = sample(&view, [2.3, 3.7, 1.9], Interpolation::BSpline, -1.0);
        assert!((value - 3.25).abs() < 1e-5);
    }

    #[test]
    fn test_bspline_smooths_gradient() {
        let volume = gradient_volume();
        let view = volume.view();
        // On a linear ramp the B-spline kernel reproduces the ramp away
        // from the borders.
        let value = sample(&view, [2.0, 2.0, 2.5], Interpolation::BSpline, -1.0);
        assert!((value - 62.5).abs() < 1e-3);
    }
}
