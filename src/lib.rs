// src/lib.rs - Library interface for the Canny edge detector

pub mod config;
pub mod convolution;
pub mod errors;
pub mod gradient;
pub mod hysteresis;
pub mod image_io;
pub mod image_utils;
pub mod otsu;
pub mod output;
pub mod pipeline;
pub mod smoothing;
pub mod suppression;
pub mod thresholding;

// Re-export commonly used types and functions
pub use errors::{CannyError, Result};
pub use config::Config;
pub use image_utils::FloatImage;
pub use pipeline::{detect_edges, detect_edges_detailed, process_image, EdgeDetection, ImageSummary};
pub use image_io::{InputImage, load_image, save_edge_map};

// Re-export the individual stages
pub use smoothing::{gaussian_kernel, smooth};
pub use gradient::{gradients, GradientField};
pub use suppression::suppress;
pub use otsu::{otsu_threshold, otsu_threshold_from_histogram};
pub use thresholding::{classify, ClassifiedEdges, EdgeLabel, Thresholds};
pub use hysteresis::{link, link_with_stats, LinkStats};
