use anyhow::{Context, Result};
use clap::Parser;

use jbig2_pdf_optimizer::cli::Args;
use jbig2_pdf_optimizer::config::Settings;
use jbig2_pdf_optimizer::{Jbig2Process, OptimizeOutcome, Optimizer};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    // Validate everything before the PDF is opened
    let settings = Settings::from_args(&args);
    let encoder = settings
        .preflight(&args.input)
        .with_context(|| "Invalid arguments")?;
    if let Some(warning) = settings.threshold_warning() {
        log::warn!("{}", warning);
    }

    let optimizer = Optimizer::new(settings, Jbig2Process::new(encoder));
    let outcome = optimizer
        .optimize(&args.input, &args.output)
        .with_context(|| format!("Failed to optimize {}", args.input.display()))?;

    match outcome {
        OptimizeOutcome::NoEligibleImages => println!("no 1-bit images found"),
        OptimizeOutcome::Optimized(summary) => {
            log::info!(
                "Recompressed {} images in {} chunks",
                summary.records.len(),
                summary.chunk_count
            );
            println!("{}", summary.sizes);
            println!("Successfully wrote PDF to {}", args.output.display());
        }
    }

    Ok(())
}
