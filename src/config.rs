use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{CannyError, Result};

/// Configuration for a batch edge-detection run
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub input_path: String,
    pub output_base_dir: String,

    /// Standard deviation of the Gaussian smoothing kernel
    #[serde(default = "default_sigma")]
    pub sigma: f32,

    /// Resize every input to `[width, height]` before detection
    #[serde(default)]
    pub resize_dimensions: Option<[u32; 2]>,

    #[serde(default = "default_parallel")]
    pub use_parallel: bool,

    /// Save smoothed/gradient/suppressed/label images next to the edge map
    #[serde(default)]
    pub save_intermediates: bool,

    #[serde(default = "default_write_summary")]
    pub write_summary: bool,
}

fn default_sigma() -> f32 {
    1.0
}

fn default_parallel() -> bool {
    true
}

fn default_write_summary() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: "./input".to_string(),
            output_base_dir: "./output".to_string(),
            sigma: default_sigma(),
            resize_dimensions: None,
            use_parallel: default_parallel(),
            save_intermediates: false,
            write_summary: default_write_summary(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CannyError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|source| CannyError::ConfigLoad {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Check the detection parameters without touching the filesystem
    pub fn validate_parameters(&self) -> Result<()> {
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(CannyError::Config(format!(
                "sigma must be a positive finite number, got {}",
                self.sigma
            )));
        }

        if let Some([width, height]) = self.resize_dimensions {
            if width == 0 || height == 0 {
                return Err(CannyError::Config(
                    "resize_dimensions must both be > 0".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Validate configuration and prepare the output directories
    pub fn validate(&self) -> Result<()> {
        self.validate_parameters()?;

        let input_path = PathBuf::from(&self.input_path);
        if !input_path.exists() {
            return Err(CannyError::InvalidPath(input_path));
        }

        let base_dir = PathBuf::from(&self.output_base_dir);
        fs::create_dir_all(self.edges_dir())?;
        if self.save_intermediates {
            fs::create_dir_all(self.debug_dir())?;
        }
        log::debug!("Output directories ready under {}", base_dir.display());

        Ok(())
    }

    /// Directory that receives the final edge maps
    pub fn edges_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_base_dir).join("edges")
    }

    /// Directory that receives intermediate stage images
    pub fn debug_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_base_dir).join("debug")
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            CannyError::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content)?;

        Ok(())
    }
}
