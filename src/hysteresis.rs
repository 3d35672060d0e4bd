use std::collections::VecDeque;

use image::{GrayImage, Luma};

use crate::errors::Result;
use crate::image_utils::{ensure_same_shape, neighbours8};
use crate::thresholding::EdgeLabel;

/// Counters gathered while linking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Strong pixels the flood fill started from
    pub seeds: usize,
    /// Weak pixels promoted to edges
    pub promoted: usize,
    /// Weak pixels with no path to a strong pixel
    pub discarded: usize,
}

/// Merge strong and weak maps into one label map; any non-zero sample counts
fn combine(strong: &GrayImage, weak: &GrayImage) -> GrayImage {
    let mut labels = GrayImage::new(strong.width(), strong.height());
    for ((label, s), w) in labels.pixels_mut().zip(strong.pixels()).zip(weak.pixels()) {
        let value = if s[0] != 0 {
            EdgeLabel::Strong
        } else if w[0] != 0 {
            EdgeLabel::Weak
        } else {
            EdgeLabel::None
        };
        *label = Luma([value.value()]);
    }
    labels
}

/// Promote weak pixels 8-connected to strong ones and drop the rest.
///
/// The work queue is an explicit FIFO; a pixel labeled strong is never pushed
/// twice, so every pixel is processed at most once. The result holds only 0
/// and 255.
pub fn link_with_stats(strong: &GrayImage, weak: &GrayImage) -> Result<(GrayImage, LinkStats)> {
    ensure_same_shape(strong, weak, "hysteresis")?;

    let (width, height) = strong.dimensions();
    let mut edges = combine(strong, weak);
    let mut stats = LinkStats::default();

    let mut queue: VecDeque<(u32, u32)> = strong
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] != 0)
        .map(|(x, y, _)| (x, y))
        .collect();
    stats.seeds = queue.len();

    while let Some((x, y)) = queue.pop_front() {
        for (nx, ny) in neighbours8(x, y, width, height) {
            let neighbour = edges.get_pixel_mut(nx, ny);
            if EdgeLabel::from_value(neighbour[0]) == EdgeLabel::Weak {
                *neighbour = Luma([EdgeLabel::Strong.value()]);
                stats.promoted += 1;
                queue.push_back((nx, ny));
            }
        }
    }

    for pixel in edges.pixels_mut() {
        if EdgeLabel::from_value(pixel[0]) == EdgeLabel::Weak {
            *pixel = Luma([EdgeLabel::None.value()]);
            stats.discarded += 1;
        }
    }

    log::debug!(
        "Hysteresis from {} seeds: {} promoted, {} discarded",
        stats.seeds,
        stats.promoted,
        stats.discarded
    );

    Ok((edges, stats))
}

/// Final binary edge map from strong and weak candidates
pub fn link(strong: &GrayImage, weak: &GrayImage) -> Result<GrayImage> {
    link_with_stats(strong, weak).map(|(edges, _)| edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CannyError;

    fn maps(size: u32, strong_at: &[(u32, u32)], weak_at: &[(u32, u32)]) -> (GrayImage, GrayImage) {
        let mut strong = GrayImage::new(size, size);
        let mut weak = GrayImage::new(size, size);
        for &(x, y) in strong_at {
            strong.put_pixel(x, y, Luma([255]));
        }
        for &(x, y) in weak_at {
            weak.put_pixel(x, y, Luma([50]));
        }
        (strong, weak)
    }

    #[test]
    fn promotes_chain_and_drops_isolated_weak() {
        let (strong, weak) = maps(8, &[(2, 2)], &[(3, 3), (4, 4), (5, 3), (6, 6), (1, 6)]);
        let (edges, stats) = link_with_stats(&strong, &weak).unwrap();

        for &(x, y) in &[(2, 2), (3, 3), (4, 4), (5, 3)] {
            assert_eq!(edges.get_pixel(x, y)[0], 255, "({}, {}) should be linked", x, y);
        }
        // (6, 6) is two steps from (4, 4); (1, 6) is far away
        assert_eq!(edges.get_pixel(6, 6)[0], 0);
        assert_eq!(edges.get_pixel(1, 6)[0], 0);

        assert_eq!(stats, LinkStats { seeds: 1, promoted: 3, discarded: 2 });
    }

    #[test]
    fn output_is_binary() {
        let (strong, weak) = maps(6, &[(1, 1), (4, 4)], &[(2, 2), (2, 4), (4, 1)]);
        let edges = link(&strong, &weak).unwrap();
        assert!(edges.as_raw().iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn any_nonzero_weak_value_is_weak() {
        let (mut strong, mut weak) = maps(6, &[], &[]);
        strong.put_pixel(2, 2, Luma([255]));
        weak.put_pixel(2, 3, Luma([30]));
        weak.put_pixel(5, 5, Luma([200]));

        let (edges, stats) = link_with_stats(&strong, &weak).unwrap();
        assert_eq!(edges.get_pixel(2, 3)[0], 255);
        assert_eq!(edges.get_pixel(5, 5)[0], 0);
        assert!(edges.as_raw().iter().all(|&v| v == 0 || v == 255));
        assert_eq!(stats, LinkStats { seeds: 1, promoted: 1, discarded: 1 });
    }

    #[test]
    fn strong_pixels_survive() {
        let (strong, weak) = maps(5, &[(0, 0), (4, 4), (2, 2)], &[]);
        let edges = link(&strong, &weak).unwrap();
        assert_eq!(edges, strong);
    }

    #[test]
    fn weak_without_strong_is_cleared() {
        let (strong, weak) = maps(5, &[], &[(1, 1), (2, 2), (3, 3)]);
        let (edges, stats) = link_with_stats(&strong, &weak).unwrap();
        assert!(edges.as_raw().iter().all(|&v| v == 0));
        assert_eq!(stats.discarded, 3);
    }

    #[test]
    fn corner_seed_stays_in_bounds() {
        let (strong, weak) = maps(4, &[(0, 0)], &[(1, 0), (0, 1), (1, 1), (3, 3)]);
        let edges = link(&strong, &weak).unwrap();
        assert_eq!(edges.get_pixel(1, 1)[0], 255);
        assert_eq!(edges.get_pixel(3, 3)[0], 0);
    }

    #[test]
    fn long_snake_does_not_recurse() {
        // Serpentine weak path covering most of a 64x64 map
        let size = 64;
        let mut weak_at = Vec::new();
        for y in (1..size - 1).step_by(2) {
            for x in 1..size - 1 {
                weak_at.push((x, y));
            }
            let link_x = if (y / 2) % 2 == 0 { size - 2 } else { 1 };
            if y + 1 < size - 1 {
                weak_at.push((link_x, y + 1));
            }
        }
        let (strong, weak) = maps(size, &[(1, 1)], &weak_at[1..]);
        let (edges, stats) = link_with_stats(&strong, &weak).unwrap();

        assert_eq!(stats.discarded, 0);
        assert_eq!(stats.promoted, weak_at.len() - 1);
        assert_eq!(edges.get_pixel(size - 2, size - 3)[0], 255);
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let strong = GrayImage::new(4, 4);
        let weak = GrayImage::new(5, 4);
        assert!(matches!(link(&strong, &weak), Err(CannyError::InvalidArgument(_))));
    }
}
