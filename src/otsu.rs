//! Global threshold selection with Otsu's method.

use image::{GrayImage, Luma};
use imageproc::map::map_colors;

use crate::errors::{CannyError, Result};
use crate::image_utils::{max_value, FloatImage};

pub const HISTOGRAM_BINS: usize = 256;

/// Bucket counts over 8-bit intensities
pub type Histogram = [u64; HISTOGRAM_BINS];

/// Scale `image` so its maximum maps onto 255 and truncate to 8 bits
pub fn quantize(image: &FloatImage) -> Result<GrayImage> {
    let max = max_value(image);
    if !max.is_finite() || max <= 0.0 {
        return Err(CannyError::DegenerateInput { stage: "otsu quantization" });
    }

    let factor = 255.0 / max;
    Ok(map_colors(image, |p| Luma([(p[0] * factor) as u8])))
}

/// Count how many pixels fall into each of the 256 levels
pub fn histogram(levels: &GrayImage) -> Histogram {
    let mut counts = [0u64; HISTOGRAM_BINS];
    for &value in levels.as_raw() {
        counts[value as usize] += 1;
    }
    counts
}

/// Threshold maximizing the between-class variance of `hist`.
///
/// Every candidate `t` splits the levels into `<= t` and `> t`. Only a
/// strictly larger variance replaces the running best, so ties resolve to the
/// lowest `t`. An empty histogram yields 0.
pub fn otsu_threshold_from_histogram(hist: &Histogram) -> u8 {
    let size: f64 = hist.iter().map(|&c| c as f64).sum();
    let total: f64 = hist
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut threshold = 0u8;
    let mut max_variance = 0.0f64;
    let mut q1 = 0.0f64;
    let mut sum_b = 0.0f64;

    for (t, &count) in hist.iter().enumerate() {
        q1 += count as f64;
        if q1 == 0.0 {
            continue;
        }

        let mut q2 = size - q1;
        sum_b += t as f64 * count as f64;
        let u1 = sum_b / q1;
        // Only the last non-empty level empties the upper class
        if q2 == 0.0 {
            q2 = 1.0;
        }
        let u2 = (total - sum_b) / q2;

        let variance = q1 * q2 * (u1 - u2).powi(2);
        if variance > max_variance {
            threshold = t as u8;
            max_variance = variance;
        }
    }

    threshold
}

/// Otsu threshold of `image` after quantizing it to 8 bits
pub fn otsu_threshold(image: &FloatImage) -> Result<u8> {
    let levels = quantize(image)?;
    Ok(otsu_threshold_from_histogram(&histogram(&levels)))
}
