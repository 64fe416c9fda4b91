//! Command-line access to planetary grids.
//!
//! The grid comes from `--config <yaml>` or, without it, from the `GRID_*`
//! environment variables (a `.env` file is loaded first).
//!
//! Usage:
//!   grid-tool --config grid.yaml info --json
//!   GRID_TYPE=reduced_gaussian GRID_NUM_ROWS=64 grid-tool locate --lat 45 --lon 7
//!   grid-tool validate --samples 100000
//!   grid-tool legacy --bin 0
//!   grid-tool --config hrrr.yaml tiles --region=-102.05,36.99,-94.59,40.0 --tile-size 64

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use planetary_grid::validation::{check_center_round_trip, check_legacy_round_trip, check_row_layout, sample_bins};
use planetary_grid::{
    build_grid, build_projected_grid, BoundingBox, GridConfig, LegacyIndexAdapter, PlanetaryGrid,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "grid-tool")]
#[command(about = "Inspect and validate planetary binning grids")]
struct Args {
    /// Grid configuration file (YAML); defaults to GRID_* environment variables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the grid layout
    Info {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Find the bin containing a coordinate
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Print the center of a bin
    Center {
        #[arg(long)]
        bin: u64,
    },
    /// Check the row layout and index round trips
    Validate {
        /// Bins to round-trip (evenly spaced)
        #[arg(long, default_value_t = 10_000)]
        samples: usize,
    },
    /// Convert between native and legacy bin numbers
    Legacy {
        /// Native bin to convert
        #[arg(long, conflicts_with = "reverse", required_unless_present = "reverse")]
        bin: Option<u64>,
        /// Legacy bin to convert back
        #[arg(long, allow_hyphen_values = true)]
        reverse: Option<i32>,
    },
    /// List pixel tiles covering a lon/lat region (projected grids only)
    Tiles {
        /// Region as "min_lon,min_lat,max_lon,max_lat"
        #[arg(long, allow_hyphen_values = true)]
        region: BoundingBox,
        #[arg(long, default_value_t = 256)]
        tile_size: usize,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => GridConfig::from_file(path)
            .with_context(|| format!("Failed to load grid config {}", path.display()))?,
        None => GridConfig::from_env().context("Failed to load grid config from environment")?,
    };
    let grid = build_grid(&config).context("Failed to build grid")?;

    match args.command {
        Command::Info { json } => info_command(grid.as_ref(), json),
        Command::Locate { lat, lon } => locate_command(grid, &config, lat, lon),
        Command::Center { bin } => {
            let center = grid.center_lat_lon(bin)?;
            let row = grid.row_index(bin)?;
            println!("bin {bin}: row {row}, center ({:.6}, {:.6})", center.lat, center.lon);
            Ok(())
        }
        Command::Validate { samples } => validate_command(grid, samples),
        Command::Legacy { bin, reverse } => {
            let adapter = LegacyIndexAdapter::new(grid)?;
            match (bin, reverse) {
                (Some(bin), _) => println!("native {bin} -> legacy {}", adapter.convert_bin(bin)?),
                (None, Some(legacy)) => println!("legacy {legacy} -> native {}", adapter.reverse_bin(legacy)?),
                (None, None) => bail!("either --bin or --reverse is required"),
            }
            Ok(())
        }
        Command::Tiles {
            region,
            tile_size,
            json,
        } => tiles_command(&config, &region, tile_size, json),
    }
}

fn info_command(grid: &dyn PlanetaryGrid, json: bool) -> Result<()> {
    let summary = grid.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Grid:        {}", summary.name);
    println!("Rows:        {}", summary.num_rows);
    println!("Bins:        {}", summary.num_bins);
    if summary.bin_index_bound != summary.num_bins {
        println!("Index bound: {}", summary.bin_index_bound);
    }
    println!("Columns:     {} to {}", summary.min_cols, summary.max_cols);
    Ok(())
}

fn locate_command(grid: Box<dyn PlanetaryGrid>, config: &GridConfig, lat: f64, lon: f64) -> Result<()> {
    let bin = grid.bin_index(lat, lon);
    let row = grid.row_index(bin)?;
    println!("({lat}, {lon}) -> bin {bin}, row {row}");

    if config.legacy_index {
        let adapter = LegacyIndexAdapter::new(grid)?;
        println!("legacy bin {}", adapter.convert_bin(bin)?);
    }
    Ok(())
}

fn validate_command(grid: Box<dyn PlanetaryGrid>, samples: usize) -> Result<()> {
    let start = Instant::now();
    let layout = check_row_layout(grid.as_ref());
    for error in &layout.errors {
        warn!(%error, "Layout error");
    }
    println!(
        "layout: {} rows, {} bins, {}",
        layout.num_rows,
        layout.num_bins,
        if layout.is_ok() { "ok" } else { "FAILED" }
    );

    let dense = grid.bin_index_bound() == grid.num_bins();
    let mut ok = layout.is_ok();

    if dense {
        let bins = sample_bins(grid.num_bins(), samples);
        let centers = check_center_round_trip(grid.as_ref(), &bins);
        for failure in &centers.failures {
            warn!(bin = failure.bin, message = %failure.message, "Center round trip failed");
        }
        println!("centers: {}/{} ok", centers.checked - centers.failed, centers.checked);
        ok &= centers.is_ok();

        match LegacyIndexAdapter::new(grid) {
            Ok(adapter) => {
                let legacy = check_legacy_round_trip(&adapter, &bins);
                println!("legacy:  {}/{} ok", legacy.checked - legacy.failed, legacy.checked);
                ok &= legacy.is_ok();
            }
            Err(e) => println!("legacy:  skipped ({e})"),
        }
    } else {
        println!("centers: skipped (sparse index)");
    }

    info!(elapsed_ms = start.elapsed().as_millis() as u64, "Validation finished");
    if !ok {
        bail!("grid validation failed");
    }
    Ok(())
}

fn tiles_command(config: &GridConfig, region: &BoundingBox, tile_size: usize, json: bool) -> Result<()> {
    let grid = build_projected_grid(config).context("Tiling needs a projected grid")?;
    let tiles = grid.tile_rectangles(region, tile_size)?;
    info!(count = tiles.len(), tile_size, "Computed tile rectangles");

    if json {
        println!("{}", serde_json::to_string_pretty(&tiles)?);
        return Ok(());
    }
    for tile in &tiles {
        println!("x={} y={} width={} height={}", tile.x, tile.y, tile.width, tile.height);
    }
    Ok(())
}
