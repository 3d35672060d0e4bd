use std::fs;
use std::path::{Path, PathBuf};
use csv::Writer;

use crate::errors::Result;
use crate::pipeline::ImageSummary;

pub const SUMMARY_FILENAME: &str = "summary.csv";

/// Write one row per processed image to `<output_dir>/summary.csv`
pub fn write_summary_csv<P: AsRef<Path>>(
    summaries: &[ImageSummary],
    output_dir: P,
) -> Result<PathBuf> {
    let output_path = output_dir.as_ref().join(SUMMARY_FILENAME);

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = Writer::from_path(&output_path)?;

    writer.write_record([
        "Filename",
        "Width",
        "Height",
        "Sigma",
        "Upper_Threshold",
        "Lower_Threshold",
        "Strong_Pixels",
        "Weak_Pixels",
        "Promoted_Pixels",
        "Edge_Pixels",
        "Elapsed_Ms",
    ])?;

    for summary in summaries {
        writer.write_record(&[
            summary.filename.clone(),
            summary.width.to_string(),
            summary.height.to_string(),
            format!("{:.3}", summary.sigma),
            summary.upper_threshold.to_string(),
            summary.lower_threshold.to_string(),
            summary.strong_pixels.to_string(),
            summary.weak_pixels.to_string(),
            summary.promoted_pixels.to_string(),
            summary.edge_pixels.to_string(),
            format!("{:.3}", summary.elapsed_ms),
        ])?;
    }

    // Flush writer: io::Error goes through csv::Error
    writer.flush().map_err(csv::Error::from)?;

    Ok(output_path)
}
