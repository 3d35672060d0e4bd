use image::{GrayImage, Luma};

use crate::errors::Result;
use crate::image_utils::{count_nonzero, ensure_same_shape, rescale_by_max, FloatImage};
use crate::otsu::otsu_threshold;

/// The lower threshold is the Otsu threshold divided by this
const LOWER_THRESHOLD_DIVISOR: u8 = 3;

/// Tri-state label of a candidate edge pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EdgeLabel {
    None = 0,
    Weak = 50,
    Strong = 255,
}

impl EdgeLabel {
    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Label carried by a combined strong+weak map value
    pub fn from_value(value: u8) -> Self {
        match value {
            v if v == Self::Strong.value() => Self::Strong,
            v if v == Self::Weak.value() => Self::Weak,
            _ => Self::None,
        }
    }
}

/// Thresholds on the `[0, 255]` potential-edge scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub upper: u8,
    pub lower: u8,
}

impl Thresholds {
    /// Derive both thresholds from an Otsu threshold
    pub fn from_upper(upper: u8) -> Self {
        Self {
            upper,
            lower: upper / LOWER_THRESHOLD_DIVISOR,
        }
    }

    /// Label for a potential-edge response on the `[0, 255]` scale.
    ///
    /// A zero response (suppressed or border pixel) is never a candidate.
    pub fn label(&self, value: f32) -> EdgeLabel {
        if value <= 0.0 {
            EdgeLabel::None
        } else if value > self.upper as f32 {
            EdgeLabel::Strong
        } else if value >= self.lower as f32 {
            EdgeLabel::Weak
        } else {
            EdgeLabel::None
        }
    }
}

/// Output of double thresholding
#[derive(Debug, Clone)]
pub struct ClassifiedEdges {
    /// 255 where the pixel is a strong edge, 0 elsewhere
    pub strong: GrayImage,
    /// 50 where the pixel is a weak edge, 0 elsewhere
    pub weak: GrayImage,
    pub thresholds: Thresholds,
}

impl ClassifiedEdges {
    pub fn strong_count(&self) -> usize {
        count_nonzero(&self.strong)
    }

    pub fn weak_count(&self) -> usize {
        count_nonzero(&self.weak)
    }
}

/// Split thinned edges into strong and weak candidates.
///
/// The upper threshold comes from Otsu's method on `potential_edges`; the
/// lower one is a third of it. `magnitude` only fixes the output shape.
pub fn classify(potential_edges: &FloatImage, magnitude: &FloatImage) -> Result<ClassifiedEdges> {
    ensure_same_shape(potential_edges, magnitude, "double threshold")?;

    let thresholds = Thresholds::from_upper(otsu_threshold(potential_edges)?);
    let scaled = rescale_by_max(potential_edges, 255.0, "double threshold")?;

    let (width, height) = magnitude.dimensions();
    let mut strong = GrayImage::new(width, height);
    let mut weak = GrayImage::new(width, height);

    for (x, y, pixel) in scaled.enumerate_pixels() {
        match thresholds.label(pixel[0]) {
            EdgeLabel::Strong => strong.put_pixel(x, y, Luma([EdgeLabel::Strong.value()])),
            EdgeLabel::Weak => weak.put_pixel(x, y, Luma([EdgeLabel::Weak.value()])),
            EdgeLabel::None => {}
        }
    }

    let classified = ClassifiedEdges { strong, weak, thresholds };
    log::debug!(
        "Double threshold upper={} lower={}: {} strong, {} weak",
        thresholds.upper,
        thresholds.lower,
        classified.strong_count(),
        classified.weak_count()
    );

    Ok(classified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CannyError;

    /// 6x6 map: zero border, interior rows of 255, 255, 100 and 20
    fn banded_potential() -> FloatImage {
        FloatImage::from_fn(6, 6, |x, y| {
            if x == 0 || x == 5 {
                return Luma([0.0]);
            }
            Luma([match y {
                1 | 2 => 255.0,
                3 => 100.0,
                4 => 20.0,
                _ => 0.0,
            }])
        })
    }

    #[test]
    fn lower_threshold_is_a_third() {
        assert_eq!(Thresholds::from_upper(100), Thresholds { upper: 100, lower: 33 });
        assert_eq!(Thresholds::from_upper(2).lower, 0);
    }

    #[test]
    fn labels_by_band() {
        let t = Thresholds::from_upper(90);
        assert_eq!(t.label(91.0), EdgeLabel::Strong);
        assert_eq!(t.label(90.0), EdgeLabel::Weak);
        assert_eq!(t.label(30.0), EdgeLabel::Weak);
        assert_eq!(t.label(29.9), EdgeLabel::None);
        assert_eq!(t.label(0.0), EdgeLabel::None);
    }

    #[test]
    fn zero_response_is_never_weak() {
        let t = Thresholds::from_upper(0);
        assert_eq!(t.label(0.0), EdgeLabel::None);
        assert_eq!(t.label(0.5), EdgeLabel::Strong);
    }

    #[test]
    fn classifies_bands() {
        let potential = banded_potential();
        let classified = classify(&potential, &FloatImage::new(6, 6)).unwrap();

        assert_eq!(classified.thresholds, Thresholds { upper: 100, lower: 33 });
        assert_eq!(classified.strong_count(), 8);
        assert_eq!(classified.weak_count(), 4);

        assert_eq!(classified.strong.get_pixel(2, 1)[0], 255);
        assert_eq!(classified.weak.get_pixel(2, 3)[0], 50);
        assert_eq!(classified.strong.get_pixel(2, 3)[0], 0);
        assert_eq!(classified.weak.get_pixel(2, 4)[0], 0);
        assert_eq!(classified.weak.get_pixel(0, 3)[0], 0);
    }

    #[test]
    fn label_values_do_not_collide() {
        assert_eq!(EdgeLabel::from_value(255), EdgeLabel::Strong);
        assert_eq!(EdgeLabel::from_value(50), EdgeLabel::Weak);
        assert_eq!(EdgeLabel::from_value(0), EdgeLabel::None);
        assert_ne!(EdgeLabel::Weak.value(), EdgeLabel::Strong.value());
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        assert!(matches!(
            classify(&banded_potential(), &FloatImage::new(5, 6)),
            Err(CannyError::InvalidArgument(_))
        ));
    }
}
