//! Border statistics used to derive out-of-bounds fill values.
//!
//! When a volume is rotated or scaled, voxels near the edges of the output
//! grid map outside the source extent. Filling them with a border-derived
//! intensity makes the padding blend with the image background instead of
//! introducing a visible constant halo.

use ndarray::{ArrayView3, Axis};

/// Number of histogram bins used for Otsu thresholding.
const OTSU_BINS: usize = 128;

/// Collect the voxel values on the six outer faces of a volume.
///
/// For each spatial axis the full cross-sections at index 0 and index
/// `n - 1` are taken. Voxels on edges and corners belong to several faces
/// and are included once per face.
pub fn border_values(view: &ArrayView3<'_, f32>) -> Vec<f32> {
    if view.is_empty() {
        return Vec::new();
    }
    let mut values = Vec::new();
    for axis in 0..3 {
        let last = view.len_of(Axis(axis)) - 1;
        values.extend(view.index_axis(Axis(axis), 0).iter().copied());
        values.extend(view.index_axis(Axis(axis), last).iter().copied());
    }
    values
}

/// Otsu's threshold: the cutoff maximizing between-class variance of the
/// intensity histogram.
///
/// The returned value is the upper edge of the last background bin, so
/// every value classified as background is strictly below it.
///
/// Degenerate input (empty, or all values equal) returns the minimum value
/// rather than failing.
pub fn otsu_threshold(values: &[f32], bins: usize) -> f32 {
    if values.is_empty() {
        return 0.0;
    }

    let min = values.iter().copied().fold(f32::INFINITY, f32::min) as f64;
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;
    if max - min < f64::EPSILON {
        return min as f32;
    }

    let bin_width = (max - min) / bins as f64;
    let mut histogram = vec![0usize; bins];
    for &v in values {
        let bin = (((v as f64 - min) / bin_width).floor() as usize).min(bins - 1);
        histogram[bin] += 1;
    }

    let total = values.len() as f64;
    let sum_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut sum_background = 0.0;
    let mut weight_background = 0.0;
    let mut max_variance = 0.0;
    let mut best_bin = 0;

    for (bin, &count) in histogram.iter().enumerate() {
        weight_background += count as f64;
        if weight_background == 0.0 {
            continue;
        }
        let weight_foreground = total - weight_background;
        if weight_foreground == 0.0 {
            break;
        }
        sum_background += bin as f64 * count as f64;

        let mean_background = sum_background / weight_background;
        let mean_foreground = (sum_total - sum_background) / weight_foreground;
        let variance =
            weight_background * weight_foreground * (mean_background - mean_foreground).powi(2);
        if variance > max_variance {
            max_variance = variance;
            best_bin = bin;
        }
    }

    (min + (best_bin + 1) as f64 * bin_width).min(max) as f32
}

/// Mean intensity of the six border faces of a volume.
///
/// With `filter_otsu`, only border values strictly below the Otsu threshold
/// of the border set contribute, estimating the background level while
/// discarding bright structures touching the edges. If no value lies below
/// the threshold, the unfiltered mean is returned.
pub fn border_mean(view: &ArrayView3<'_, f32>, filter_otsu: bool) -> f32 {
    let borders = border_values(view);
    if borders.is_empty() {
        return 0.0;
    }
    if !filter_otsu {
        return mean(&borders);
    }
    let threshold = otsu_threshold(&borders, OTSU_BINS);
    let below: Vec<f32> = borders.iter().copied().filter(|&v| v < threshold).collect();
    if below.is_empty() {
        mean(&borders)
    } else {
        mean(&below)
    }
}

fn mean(values: &[f32]) -> f32 {
    let sum: f64 = values.iter().map(|&v| v as f64).sum();
    (sum / values.len() as f64) as f32
}
