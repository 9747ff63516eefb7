// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Flatscan — document boundary detection and perspective rectification
//
// Entry point. Initialises logging, loads the scan configuration, and runs
// one subcommand against an image file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use flatscan_core::ScanConfig;
use flatscan_core::error::FlatscanError;
use flatscan_core::human_errors::{humanize_error, humanize_not_found};
use flatscan_core::types::{Point, RasterImage};
use flatscan_document::raster::bridge::{raster_from_dynamic, raster_to_dynamic};
use flatscan_document::{DocumentScanner, Rectification};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "flatscan")]
#[command(about = "Find the page in a photograph and flatten it")]
#[command(version)]
struct Cli {
    /// Path to a JSON scan configuration; missing fields take defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the document outline and print it as JSON.
    Detect(DetectArgs),

    /// Detect the document and write it, flattened, to a new image.
    Rectify(RectifyArgs),

    /// Print the default configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct RectifyArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Path for the rectified image; the format follows the extension.
    #[arg(long)]
    out: PathBuf,

    /// Skip detection and use these corners instead, as eight comma-separated
    /// numbers `x1,y1,...,x4,y4` in any corner order.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    corners: Option<Vec<f64>>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let outcome = load_config(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Detect(args) => run_detect(config, args),
        Commands::Rectify(args) => run_rectify(config, args),
        Commands::DefaultConfig => run_default_config(),
    });

    match outcome {
        Ok(code) => code,
        Err(err) => {
            report_error(err.as_ref());
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> CliResult<ScanConfig> {
    let Some(path) = path else {
        return Ok(ScanConfig::default());
    };
    tracing::info!("Loading configuration: {}", path.display());
    let json = std::fs::read_to_string(path).map_err(FlatscanError::from)?;
    Ok(ScanConfig::from_json(&json)?)
}

fn load_image(path: &Path) -> CliResult<RasterImage> {
    tracing::info!("Loading image: {}", path.display());
    let img = image::open(path).map_err(|e| {
        FlatscanError::ImageError(format!("failed to open {}: {}", path.display(), e))
    })?;
    tracing::info!("Image size: {}x{}", img.width(), img.height());
    Ok(raster_from_dynamic(&img))
}

// -- detect -------------------------------------------------------------------

fn run_detect(config: ScanConfig, args: &DetectArgs) -> CliResult<ExitCode> {
    let scanner = DocumentScanner::new(config)?;
    let raster = load_image(&args.image)?;
    let detection = scanner.detect(&raster)?;
    println!("{}", serde_json::to_string_pretty(&detection)?);
    Ok(ExitCode::SUCCESS)
}

// -- rectify ------------------------------------------------------------------

fn run_rectify(config: ScanConfig, args: &RectifyArgs) -> CliResult<ExitCode> {
    let scanner = DocumentScanner::new(config)?;
    let raster = load_image(&args.image)?;

    let page = match &args.corners {
        Some(values) => scanner.rectify_with_corners(&raster, parse_corners(values)?)?,
        None => match scanner.detect_and_rectify(&raster)? {
            Rectification::Rectified(page) => page,
            Rectification::NotFound(reason) => {
                let human = humanize_not_found(reason);
                eprintln!("{}\n  {}", human.message, human.suggestion);
                return Ok(ExitCode::from(2));
            }
        },
    };

    raster_to_dynamic(&page)?.save(&args.out).map_err(|e| {
        FlatscanError::ImageError(format!("failed to write {}: {}", args.out.display(), e))
    })?;
    tracing::info!(
        "Rectified {}x{} page written to {}",
        page.width,
        page.height,
        args.out.display()
    );
    Ok(ExitCode::SUCCESS)
}

fn parse_corners(values: &[f64]) -> CliResult<[Point; 4]> {
    let [x1, y1, x2, y2, x3, y3, x4, y4] = values else {
        return Err(format!("expected 8 corner coordinates, got {}", values.len()).into());
    };
    Ok([
        Point::new(*x1, *y1),
        Point::new(*x2, *y2),
        Point::new(*x3, *y3),
        Point::new(*x4, *y4),
    ])
}

// -- default-config -----------------------------------------------------------

fn run_default_config() -> CliResult<ExitCode> {
    println!("{}", ScanConfig::default().to_json()?);
    Ok(ExitCode::SUCCESS)
}

fn report_error(err: &(dyn std::error::Error + 'static)) {
    match err.downcast_ref::<FlatscanError>() {
        Some(scan_err) => {
            let human = humanize_error(scan_err);
            eprintln!("error: {}\n  {}", human.message, human.suggestion);
            tracing::debug!("{:?}", scan_err);
        }
        None => eprintln!("error: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_parse_in_pairs() {
        let corners = parse_corners(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).unwrap();
        assert_eq!(corners[0], Point::new(1.0, 2.0));
        assert_eq!(corners[3], Point::new(7.0, 8.0));
    }

    #[test]
    fn wrong_corner_count_is_rejected() {
        assert!(parse_corners(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn missing_config_path_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.max_working_height, 800);
    }

    #[test]
    fn cli_parses_rectify_with_corners() {
        let cli = Cli::try_parse_from([
            "flatscan",
            "rectify",
            "--image",
            "in.png",
            "--out",
            "out.png",
            "--corners",
            "0,0,10,0,10,10,0,10",
        ])
        .unwrap();
        let Commands::Rectify(args) = cli.command else {
            panic!("expected rectify");
        };
        assert_eq!(args.corners.map(|c| c.len()), Some(8));
    }
}
