use std::path::{Path, PathBuf};
use std::fs;
use image::imageops::FilterType;
use image::{GrayImage, ImageFormat};

use crate::errors::{CannyError, Result};
use crate::image_utils::{to_display_image, FloatImage};

/// File extensions picked up when scanning a directory
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Grayscale input image with its metadata
pub struct InputImage {
    pub image: FloatImage,
    pub path: PathBuf,
    pub filename: String,
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Get all supported image files from a directory (recursively, sorted)
pub fn get_image_files_in_dir<P: AsRef<Path>>(dir_path: P) -> Result<Vec<PathBuf>> {
    let dir_path = dir_path.as_ref();

    if !dir_path.exists() {
        return Err(CannyError::InvalidPath(dir_path.to_path_buf()));
    }

    if !dir_path.is_dir() {
        return Err(CannyError::Config(format!(
            "{} is not a directory", dir_path.display()
        )));
    }

    let mut files = Vec::new();
    find_image_files_recursive(dir_path, &mut files)?;
    files.sort();

    Ok(files)
}

fn find_image_files_recursive(dir_path: &Path, result: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir_path)? {
        let path = entry?.path();

        if path.is_dir() {
            find_image_files_recursive(&path, result)?;
        } else if path.is_file() && is_supported(&path) {
            result.push(path);
        }
    }

    Ok(())
}

/// Load an image as single-channel `f32` intensities, optionally resizing it first
pub fn load_image<P: AsRef<Path>>(path: P, resize: Option<[u32; 2]>) -> Result<InputImage> {
    let path = path.as_ref();

    let filename = path.file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CannyError::InvalidPath(path.to_path_buf()))?
        .to_string();

    let mut img = image::open(path)?;
    if let Some([width, height]) = resize {
        img = img.resize_exact(width, height, FilterType::Triangle);
    }

    Ok(InputImage {
        image: img.to_luma32f(),
        path: path.to_path_buf(),
        filename,
    })
}

/// Save a label or edge map as an 8-bit PNG
pub fn save_edge_map<P: AsRef<Path>>(edges: &GrayImage, path: P) -> Result<()> {
    edges.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a `[0, 1]` float image as an 8-bit PNG
pub fn save_float_image<P: AsRef<Path>>(image: &FloatImage, path: P) -> Result<()> {
    save_edge_map(&to_display_image(image), path)
}
