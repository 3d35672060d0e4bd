use image::{GrayImage, Luma};
use imageproc::definitions::Image;
use imageproc::map::map_colors;

use crate::errors::{CannyError, Result};

/// Single-channel floating point image shared by every pipeline stage
pub type FloatImage = Image<Luma<f32>>;

/// Offsets `(row, col)` of the 8-connected neighbourhood
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Largest sample in the image (0.0 for an empty image)
pub fn max_value(image: &FloatImage) -> f32 {
    image
        .as_raw()
        .iter()
        .copied()
        .fold(None, |acc: Option<f32>, v| Some(acc.map_or(v, |m| m.max(v))))
        .unwrap_or(0.0)
}

/// Multiply every sample by `scale / max`, mapping the maximum onto `scale`.
///
/// A non-positive (or non-finite) maximum cannot be normalized and is
/// reported as `DegenerateInput` for the given stage.
pub fn rescale_by_max(image: &FloatImage, scale: f32, stage: &'static str) -> Result<FloatImage> {
    let max = max_value(image);
    if !max.is_finite() || max <= 0.0 {
        return Err(CannyError::DegenerateInput { stage });
    }

    let factor = scale / max;
    Ok(map_colors(image, |p| Luma([p[0] * factor])))
}

/// Fail with `InvalidArgument` unless both images share the same dimensions
pub fn ensure_same_shape<A, B>(
    a: &Image<A>,
    b: &Image<B>,
    what: &str,
) -> Result<()>
where
    A: image::Pixel,
    B: image::Pixel,
{
    if a.dimensions() != b.dimensions() {
        return Err(CannyError::InvalidArgument(format!(
            "{}: shape mismatch {:?} vs {:?}",
            what,
            a.dimensions(),
            b.dimensions()
        )));
    }
    Ok(())
}

/// Check if a point is inside the image bounds
#[inline]
pub fn in_bounds(x: i32, y: i32, width: u32, height: u32) -> bool {
    x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height
}

/// True for pixels on the first/last row or column
#[inline]
pub fn is_border(x: u32, y: u32, width: u32, height: u32) -> bool {
    x == 0 || y == 0 || x + 1 >= width || y + 1 >= height
}

/// In-bounds 8-connected neighbours of `(x, y)`
pub fn neighbours8(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    NEIGHBOUR_OFFSETS.iter().filter_map(move |&(dy, dx)| {
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if in_bounds(nx, ny, width, height) {
            Some((nx as u32, ny as u32))
        } else {
            None
        }
    })
}

/// Count pixels carrying a non-zero label
pub fn count_nonzero(image: &GrayImage) -> usize {
    image.as_raw().iter().filter(|&&v| v != 0).count()
}

/// Map a `[0,1]` float image onto 8-bit gray for inspection
pub fn to_display_image(image: &FloatImage) -> GrayImage {
    map_colors(image, |p| Luma([(p[0].clamp(0.0, 1.0) * 255.0).round() as u8]))
}
