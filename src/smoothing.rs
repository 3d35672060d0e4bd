use std::f32::consts::PI;

use crate::convolution::{convolve, Kernel};
use crate::errors::{CannyError, Result};
use crate::image_utils::{rescale_by_max, FloatImage};

/// Kernel side grows by this many pixels per unit of sigma
const KERNEL_EXTENT_PER_SIGMA: f32 = 2.54;

const MIN_KERNEL_SIZE: usize = 3;

fn check_sigma(sigma: f32) -> Result<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CannyError::InvalidArgument(format!(
            "sigma must be a positive finite number, got {}",
            sigma
        )));
    }
    Ok(())
}

/// Smallest odd side length >= ceil(2.54 * sigma), never below 3.
/// Saturates at `usize::MAX` for huge sigma.
pub fn kernel_size(sigma: f32) -> usize {
    let extent = (KERNEL_EXTENT_PER_SIGMA * sigma).ceil() as usize;
    let odd = if extent % 2 == 1 { extent } else { extent.saturating_add(1) };
    odd.max(MIN_KERNEL_SIZE)
}

/// Widest kernel side worth building for a `width` x `height` image.
///
/// A radius of `max(width, height)` already reaches every reflected copy of
/// every sample, so larger kernels are clamped to this side.
pub fn max_kernel_size(width: u32, height: u32) -> usize {
    (2 * width.max(height) as usize + 1).max(MIN_KERNEL_SIZE)
}

/// Gaussian kernel for `sigma`, with its side clamped to `max_size`.
///
/// Weights are `exp(-(di² + dj²) / 2σ²) / 2πσ²` and are not normalized to sum
/// to one; `smooth` rescales its output instead.
pub fn gaussian_kernel(sigma: f32, max_size: usize) -> Result<Kernel> {
    check_sigma(sigma)?;

    let size = kernel_size(sigma).min(max_size);
    let two_sigma_sq = 2.0 * sigma * sigma;
    let norm = PI * two_sigma_sq;
    Kernel::from_fn(size, |di, dj| {
        let dist_sq = (di * di + dj * dj) as f32;
        (-dist_sq / two_sigma_sq).exp() / norm
    })
}

/// Blur `image` with a Gaussian of width `sigma` and rescale the result to `[0, 1]`
pub fn smooth(image: &FloatImage, sigma: f32) -> Result<FloatImage> {
    let kernel = gaussian_kernel(sigma, max_kernel_size(image.width(), image.height()))?;
    log::debug!(
        "Smoothing {}x{} image with {}x{} Gaussian (sigma={})",
        image.width(),
        image.height(),
        kernel.size(),
        kernel.size(),
        sigma
    );

    let blurred = convolve(image, &kernel);
    rescale_by_max(&blurred, 1.0, "smoothing")
}
