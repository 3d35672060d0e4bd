use rayon::prelude::*;

use crate::errors::{CannyError, Result};
use crate::image_utils::FloatImage;

/// Square convolution kernel with an odd side length
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

/// Number of weights in a kernel of side `size`, checked for shape and overflow
fn weight_count(size: usize) -> Result<usize> {
    if size < 3 || size % 2 == 0 || size > i32::MAX as usize {
        return Err(CannyError::InvalidArgument(format!(
            "kernel side must be odd and >= 3, got {}",
            size
        )));
    }
    size.checked_mul(size).ok_or_else(|| {
        CannyError::InvalidArgument(format!("kernel side {} is too large", size))
    })
}

impl Kernel {
    /// Build a kernel from row-major weights
    pub fn new(size: usize, weights: Vec<f32>) -> Result<Self> {
        let count = weight_count(size)?;
        if weights.len() != count {
            return Err(CannyError::InvalidArgument(format!(
                "kernel of side {} needs {} weights, got {}",
                size,
                count,
                weights.len()
            )));
        }
        Ok(Self { size, weights })
    }

    /// Build a 3x3 kernel from fixed rows
    pub fn from_rows3(rows: [[f32; 3]; 3]) -> Self {
        Self {
            size: 3,
            weights: rows.iter().flatten().copied().collect(),
        }
    }

    /// Build a kernel by evaluating `f(di, dj)` at every offset from the centre
    pub fn from_fn<F: Fn(i32, i32) -> f32>(size: usize, f: F) -> Result<Self> {
        let count = weight_count(size)?;
        let radius = (size / 2) as i32;
        let mut weights = Vec::with_capacity(count);
        for i in 0..size as i32 {
            for j in 0..size as i32 {
                weights.push(f(i - radius, j - radius));
            }
        }
        Self::new(size, weights)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weight at kernel row `row`, column `col`
    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> f32 {
        self.weights[row * self.size + col]
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

/// Map an out-of-range index back into `0..len` by mirroring about the
/// outer sample edge (`d c b a | a b c d | d c b a`).
#[inline]
pub fn reflect_index(index: isize, len: usize) -> usize {
    let len = len as isize;
    let period = 2 * len;
    let m = index.rem_euclid(period);
    if m < len {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Convolve `image` with `kernel`.
///
/// This is a true convolution (the kernel is flipped), so
/// `out[y][x] = sum K[ky][kx] * in[y + r - ky][x + r - kx]`, with samples
/// outside the image taken from the reflected border. Sums are accumulated in
/// `f64`. Output rows are computed in parallel.
pub fn convolve(image: &FloatImage, kernel: &Kernel) -> FloatImage {
    let (width, height) = image.dimensions();
    let mut output = FloatImage::new(width, height);
    if width == 0 || height == 0 {
        return output;
    }

    let w = width as usize;
    let h = height as usize;
    let r = kernel.radius() as isize;
    let size = kernel.size();
    let src = image.as_raw();

    output
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let mut acc = 0.0f64;
                for ky in 0..size {
                    let sy = reflect_index(y as isize + r - ky as isize, h);
                    let src_row = &src[sy * w..(sy + 1) * w];
                    for kx in 0..size {
                        let sx = reflect_index(x as isize + r - kx as isize, w);
                        acc += kernel.weight(ky, kx) as f64 * src_row[sx] as f64;
                    }
                }
                *out = acc as f32;
            }
        });

    output
}
