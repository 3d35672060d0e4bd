use std::path::Path;
use std::time::Instant;

use image::GrayImage;

use crate::config::Config;
use crate::errors::{CannyError, Result};
use crate::gradient::{gradients, GradientField};
use crate::hysteresis::{link_with_stats, LinkStats};
use crate::image_io::{save_edge_map, save_float_image, InputImage};
use crate::image_utils::{count_nonzero, FloatImage};
use crate::smoothing::smooth;
use crate::suppression::suppress;
use crate::thresholding::{classify, ClassifiedEdges};

/// Every intermediate produced by one detection run
#[derive(Debug, Clone)]
pub struct EdgeDetection {
    pub smoothed: FloatImage,
    pub gradient: GradientField,
    pub potential_edges: FloatImage,
    pub classified: ClassifiedEdges,
    pub link_stats: LinkStats,
    /// Final binary map, 255 on edges and 0 elsewhere
    pub edges: GrayImage,
}

/// Per-image record written to the run summary
#[derive(Debug, Clone)]
pub struct ImageSummary {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub sigma: f32,
    pub upper_threshold: u8,
    pub lower_threshold: u8,
    pub strong_pixels: usize,
    pub weak_pixels: usize,
    pub promoted_pixels: usize,
    pub edge_pixels: usize,
    pub elapsed_ms: f64,
}

/// Reject inputs the pipeline cannot process before doing any work
pub fn validate_input(image: &FloatImage, sigma: f32) -> Result<()> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CannyError::InvalidArgument(format!(
            "sigma must be a positive finite number, got {}",
            sigma
        )));
    }

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(CannyError::InvalidArgument(format!(
            "image must not be empty, got {}x{}",
            width, height
        )));
    }

    if image.as_raw().iter().any(|v| !v.is_finite()) {
        return Err(CannyError::InvalidArgument(
            "image contains non-finite samples".to_string(),
        ));
    }

    Ok(())
}

/// Run the full pipeline and keep every intermediate
pub fn detect_edges_detailed(image: &FloatImage, sigma: f32) -> Result<EdgeDetection> {
    validate_input(image, sigma)?;

    // Step 1: Gaussian smoothing
    let smoothed = smooth(image, sigma)?;

    // Step 2: Gradient magnitude and direction
    let gradient = gradients(&smoothed)?;

    // Step 3: Thin ridges
    let potential_edges = suppress(&gradient.magnitude, &gradient.direction)?;

    // Step 4: Otsu-driven double threshold
    let classified = classify(&potential_edges, &gradient.magnitude)?;

    // Step 5: Link weak edges to strong ones
    let (edges, link_stats) = link_with_stats(&classified.strong, &classified.weak)?;

    Ok(EdgeDetection {
        smoothed,
        gradient,
        potential_edges,
        classified,
        link_stats,
        edges,
    })
}

/// Binary Canny edge map of `image`, 255 on edges and 0 elsewhere
pub fn detect_edges(image: &FloatImage, sigma: f32) -> Result<GrayImage> {
    detect_edges_detailed(image, sigma).map(|detection| detection.edges)
}

fn save_intermediates(detection: &EdgeDetection, debug_dir: &Path, filename: &str) -> Result<()> {
    std::fs::create_dir_all(debug_dir)?;

    save_float_image(&detection.smoothed, debug_dir.join(format!("{}_smoothed.png", filename)))?;
    save_float_image(
        &detection.gradient.magnitude,
        debug_dir.join(format!("{}_magnitude.png", filename)),
    )?;
    save_float_image(
        &detection.potential_edges,
        debug_dir.join(format!("{}_suppressed.png", filename)),
    )?;
    save_edge_map(&detection.classified.strong, debug_dir.join(format!("{}_strong.png", filename)))?;
    save_edge_map(&detection.classified.weak, debug_dir.join(format!("{}_weak.png", filename)))?;

    Ok(())
}

/// Detect edges in one loaded image and write the results below the output directory
pub fn process_image(input_image: InputImage, config: &Config) -> Result<ImageSummary> {
    let InputImage { image, filename, .. } = input_image;
    let start = Instant::now();

    let detection = detect_edges_detailed(&image, config.sigma)?;

    std::fs::create_dir_all(config.edges_dir())?;
    let edges_path = config.edges_dir().join(format!("{}.png", filename));
    save_edge_map(&detection.edges, &edges_path)?;

    if config.save_intermediates {
        save_intermediates(&detection, &config.debug_dir(), &filename)?;
    }

    let summary = ImageSummary {
        filename,
        width: image.width(),
        height: image.height(),
        sigma: config.sigma,
        upper_threshold: detection.classified.thresholds.upper,
        lower_threshold: detection.classified.thresholds.lower,
        strong_pixels: detection.classified.strong_count(),
        weak_pixels: detection.classified.weak_count(),
        promoted_pixels: detection.link_stats.promoted,
        edge_pixels: count_nonzero(&detection.edges),
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    };

    log::info!(
        "{}: {} edge pixels (thresholds {}/{}) -> {}",
        summary.filename,
        summary.edge_pixels,
        summary.upper_threshold,
        summary.lower_threshold,
        edges_path.display()
    );

    Ok(summary)
}
