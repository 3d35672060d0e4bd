use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use rayon::prelude::*;

use canny_edge_rust_lib::image_io::{get_image_files_in_dir, load_image};
use canny_edge_rust_lib::output::write_summary_csv;
use canny_edge_rust_lib::{process_image, Config, ImageSummary};

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "Canny edge detection for grayscale images")]
struct Args {
    /// Path to input file or directory
    #[clap(short, long)]
    input: Option<String>,

    /// Path to output directory
    #[clap(short, long)]
    output: Option<String>,

    /// Path to configuration file (defaults are used if it does not exist)
    #[clap(short, long, default_value = "canny.toml")]
    config: String,

    /// Gaussian smoothing sigma (overwrites config)
    #[clap(short, long)]
    sigma: Option<f32>,

    /// Save intermediate stage images
    #[clap(short, long)]
    debug: bool,

    /// Process files one after another
    #[clap(long)]
    sequential: bool,

    /// Log per-stage details
    #[clap(short, long)]
    verbose: bool,

    /// Write the effective configuration to this path and exit
    #[clap(long)]
    write_config: Option<PathBuf>,
}

fn run_one(path: &Path, config: &Config) -> canny_edge_rust_lib::Result<ImageSummary> {
    log::info!("Processing: {}", path.display());
    let input_image = load_image(path, config.resize_dimensions)?;
    process_image(input_image, config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    // Load configuration
    let config_path = PathBuf::from(&args.config);
    let mut config = if config_path.is_file() {
        Config::from_file(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?
    } else {
        log::warn!("No configuration at {}, using defaults", config_path.display());
        Config::default()
    };

    // Override config with command-line arguments
    if let Some(input) = args.input.clone() {
        config.input_path = input;
    }
    if let Some(output) = args.output.clone() {
        config.output_base_dir = output;
    }
    if let Some(sigma) = args.sigma {
        config.sigma = sigma;
    }
    if args.sequential {
        config.use_parallel = false;
    }
    if args.debug {
        config.save_intermediates = true;
    }

    if let Some(path) = &args.write_config {
        config.validate_parameters()?;
        config.save_to_file(path)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Configuration written to {}", path.display());
        return Ok(());
    }

    config.validate().context("invalid configuration")?;

    let start_time = Instant::now();
    let input_path = PathBuf::from(&config.input_path);

    let files = if input_path.is_file() {
        vec![input_path]
    } else if input_path.is_dir() {
        let files = get_image_files_in_dir(&input_path)?;
        log::info!("Found {} image files in {}", files.len(), input_path.display());
        files
    } else {
        bail!("input path {} is neither a file nor a directory", input_path.display());
    };

    let results: Vec<_> = if config.use_parallel {
        files.par_iter().map(|path| (path, run_one(path, &config))).collect()
    } else {
        files.iter().map(|path| (path, run_one(path, &config))).collect()
    };

    let mut summaries = Vec::with_capacity(results.len());
    let mut failures = 0usize;
    for (path, result) in results {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                log::error!("Failed to process {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if config.write_summary && !summaries.is_empty() {
        let summary_path = write_summary_csv(&summaries, &config.output_base_dir)?;
        log::info!("Summary written to {}", summary_path.display());
    }

    let elapsed = start_time.elapsed();
    log::info!(
        "Processed {} of {} images in {:.2} seconds",
        summaries.len(),
        files.len(),
        elapsed.as_secs_f64()
    );

    if failures > 0 {
        bail!("{} image(s) failed", failures);
    }

    Ok(())
}
