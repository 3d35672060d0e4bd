use image::Luma;

use crate::errors::Result;
use crate::image_utils::{ensure_same_shape, rescale_by_max, FloatImage};

/// Fold a direction into `[0, 180]`; edge orientation is line-symmetric
#[inline]
pub fn fold_direction(degrees: f32) -> f32 {
    if degrees < 0.0 {
        degrees + 180.0
    } else {
        degrees
    }
}

/// Neighbour pair `(row, col)` compared against a pixel whose folded gradient
/// direction is `degrees`
pub fn neighbour_offsets(degrees: f32) -> [(i32, i32); 2] {
    if (22.5..67.5).contains(&degrees) {
        [(1, 1), (-1, -1)]
    } else if (67.5..112.5).contains(&degrees) {
        [(-1, 0), (1, 0)]
    } else if (112.5..157.5).contains(&degrees) {
        [(1, -1), (-1, 1)]
    } else {
        // [0, 22.5) and [157.5, 180]
        [(0, -1), (0, 1)]
    }
}

/// Thin gradient ridges to single-pixel width.
///
/// Each interior pixel keeps its magnitude only when it is at least as large
/// as both neighbours along its gradient direction. Border pixels are never
/// candidates and stay 0. The result is rescaled to `[0, 1]`.
pub fn suppress(magnitude: &FloatImage, direction: &FloatImage) -> Result<FloatImage> {
    ensure_same_shape(magnitude, direction, "non-maximum suppression")?;

    let (width, height) = magnitude.dimensions();
    let mut potential_edges = FloatImage::new(width, height);
    let mut kept = 0usize;

    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let value = magnitude.get_pixel(x, y)[0];
            let angle = fold_direction(direction.get_pixel(x, y)[0]);

            let [a, b] = neighbour_offsets(angle).map(|(di, dj)| {
                let ny = (y as i32 + di) as u32;
                let nx = (x as i32 + dj) as u32;
                magnitude.get_pixel(nx, ny)[0]
            });

            if value >= a && value >= b {
                potential_edges.put_pixel(x, y, Luma([value]));
                if value > 0.0 {
                    kept += 1;
                }
            }
        }
    }

    log::debug!("Non-maximum suppression kept {} ridge pixels", kept);
    rescale_by_max(&potential_edges, 1.0, "non-maximum suppression")
}
