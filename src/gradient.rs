use image::Luma;

use crate::convolution::{convolve, Kernel};
use crate::errors::Result;
use crate::image_utils::{rescale_by_max, FloatImage};

/// Sobel-style derivative kernel; its response is called `gx`
pub const HORIZONTAL_KERNEL: [[f32; 3]; 3] = [
    [1.0, 2.0, 1.0],
    [0.0, 0.0, 0.0],
    [-1.0, -2.0, -1.0],
];

/// Transpose of `HORIZONTAL_KERNEL` flipped upside down; its response is called `gy`
pub const VERTICAL_KERNEL: [[f32; 3]; 3] = [
    [1.0, 0.0, -1.0],
    [2.0, 0.0, -2.0],
    [1.0, 0.0, -1.0],
];

/// Stand-in for an exactly zero `gy` when computing the direction
const ZERO_RESPONSE_EPSILON: f32 = 1e-6;

/// Per-pixel gradient magnitude and direction
#[derive(Debug, Clone)]
pub struct GradientField {
    /// Magnitude normalized to `[0, 1]`
    pub magnitude: FloatImage,
    /// Direction in degrees, `atan2(gx, gy)`, range (-180, 180]
    pub direction: FloatImage,
}

/// Compute gradient magnitude and direction of a smoothed image
pub fn gradients(image: &FloatImage) -> Result<GradientField> {
    let gx = convolve(image, &Kernel::from_rows3(HORIZONTAL_KERNEL));
    let gy = convolve(image, &Kernel::from_rows3(VERTICAL_KERNEL));

    let (width, height) = image.dimensions();
    let mut magnitude = FloatImage::new(width, height);
    let mut direction = FloatImage::new(width, height);

    for (x, y, pixel) in magnitude.enumerate_pixels_mut() {
        let h = gx.get_pixel(x, y)[0];
        let v = gy.get_pixel(x, y)[0];
        *pixel = Luma([h.hypot(v)]);

        let v = if v == 0.0 { ZERO_RESPONSE_EPSILON } else { v };
        direction.put_pixel(x, y, Luma([h.atan2(v).to_degrees()]));
    }

    let magnitude = rescale_by_max(&magnitude, 1.0, "gradient")?;
    Ok(GradientField { magnitude, direction })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CannyError;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn vertical_kernel_is_flipped_transpose() {
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(VERTICAL_KERNEL[i][j], HORIZONTAL_KERNEL[j][2 - i]);
            }
        }
    }

    #[test]
    fn horizontal_ramp_points_along_zero_degrees() {
        // Intensity grows with the column index
        let image = FloatImage::from_fn(6, 5, |x, _| Luma([x as f32]));
        let field = gradients(&image).unwrap();

        for y in 1..4 {
            for x in 1..5 {
                assert_approx_eq!(field.magnitude.get_pixel(x, y)[0], 1.0, 1e-6);
                assert_approx_eq!(field.direction.get_pixel(x, y)[0], 0.0, 1e-6);
            }
        }
        // The reflected border sees half the step
        assert_approx_eq!(field.magnitude.get_pixel(0, 2)[0], 0.5, 1e-6);
    }

    #[test]
    fn vertical_ramp_points_along_ninety_degrees() {
        // Intensity grows with the row index
        let image = FloatImage::from_fn(5, 6, |_, y| Luma([y as f32]));
        let field = gradients(&image).unwrap();

        for y in 1..5 {
            for x in 0..5 {
                assert_approx_eq!(field.magnitude.get_pixel(x, y)[0], 1.0, 1e-6);
                assert_approx_eq!(field.direction.get_pixel(x, y)[0], 90.0, 1e-3);
            }
        }
    }

    #[test]
    fn decreasing_ramp_gives_negative_direction() {
        let image = FloatImage::from_fn(5, 6, |_, y| Luma([(10 - y) as f32]));
        let field = gradients(&image).unwrap();
        assert_approx_eq!(field.direction.get_pixel(2, 2)[0], -90.0, 1e-3);
    }

    #[test]
    fn uniform_image_has_no_gradient() {
        let image = FloatImage::from_pixel(5, 5, Luma([0.7]));
        assert!(matches!(
            gradients(&image),
            Err(CannyError::DegenerateInput { stage: "gradient" })
        ));
    }
}
