//! CLI tool to regenerate the packaged Gaussian row tables.
//!
//! Usage:
//!   cargo run --release --bin generate-gaussian-tables -- --output ./resources/gaussian
//!
//! This writes one `n<N>.tsv` per supported Gaussian number.

use anyhow::{Context, Result};
use clap::Parser;
use planetary_grid::gaussian::quadrature::format_table;
use planetary_grid::gaussian::SUPPORTED_N;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "generate-gaussian-tables")]
#[command(about = "Write Gaussian grid row tables")]
struct Args {
    /// Output directory
    #[arg(short, long, default_value = "./resources/gaussian")]
    output: PathBuf,

    /// Gaussian numbers to generate (default: all supported)
    #[arg(short, long, value_delimiter = ',')]
    n: Vec<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let numbers = if args.n.is_empty() { SUPPORTED_N.to_vec() } else { args.n };

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    println!("Gaussian Table Generator");
    println!("========================");
    println!("Output directory: {}", args.output.display());
    println!();

    for n in numbers {
        let start = Instant::now();
        let path = args.output.join(format!("n{n}.tsv"));
        fs::write(&path, format_table(n)).with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "  N{:<4} {} rows -> {} ({:.2}s)",
            n,
            2 * n,
            path.display(),
            start.elapsed().as_secs_f64()
        );
    }

    println!("\nDone!");
    Ok(())
}
