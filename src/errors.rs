use thiserror::Error;
use std::io;
use std::path::PathBuf;

/// Custom error types for the Canny edge detector
#[derive(Error, Debug)]
pub enum CannyError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration from {path}: {source}")]
    ConfigLoad {
        source: toml::de::Error,
        path: PathBuf,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A stage tried to normalize an array whose maximum is not positive.
    #[error("Degenerate input: maximum value is zero after {stage}")]
    DegenerateInput { stage: &'static str },

    #[error("CSV output error: {0}")]
    CsvOutput(#[from] csv::Error),

    #[error("Invalid input path: {0}")]
    InvalidPath(PathBuf),
}

/// Type alias for Result with our custom error type
pub type Result<T> = std::result::Result<T, CannyError>;
