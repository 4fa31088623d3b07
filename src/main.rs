//! Entry point for nc_histogram.
//! Parses the command line, configures logging and the thread pool, then runs the histogram loop.

use clap::Parser;
use nc_histogram::cli::Args;
use nc_histogram::parallel::ParallelConfig;
use nc_histogram::processing::process_file;
use std::process;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(level)
        .init();

    if !args.input_file.exists() {
        eprintln!(
            "Error: Input file '{}' not found.",
            args.input_file.display()
        );
        process::exit(1);
    }

    let config = args.into_config();
    config.validate()?;
    ParallelConfig::new(config.threads).setup_global_pool()?;

    let summary = process_file(&config)?;

    println!(
        "Processing complete. {} variables processed.",
        summary.processed_count()
    );
    if summary.failed_count() > 0 {
        println!("⚠ {} variables failed", summary.failed_count());
    }

    Ok(())
}
