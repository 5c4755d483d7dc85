pub mod cli;
pub mod config;
pub mod encode;
pub mod error;
pub mod model;
pub mod pdf;
pub mod pipeline;
pub mod raster;
pub mod report;

use std::path::Path;

pub use config::Settings;
pub use encode::{Jbig2Encoder, Jbig2Process};
pub use error::{ConfigError, EncodeError, OptimizeError, ScanError};
pub use model::{Chunk, EncodedChunk, ImageRecord};
pub use pipeline::{OptimizeOutcome, OptimizeSummary, Optimizer};

/// High-level API for recompressing a PDF's 1-bit images.
///
/// This is the recommended entry point for library consumers. It checks
/// the settings, finds the `jbig2` encoder on the search path and runs the
/// whole pipeline. Nothing is written when the document has no eligible
/// images.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use jbig2_pdf_optimizer::{optimize_pdf, OptimizeOutcome, Settings};
///
/// let settings = Settings {
///     threshold: 0.85,
///     ..Default::default()
/// };
///
/// match optimize_pdf(Path::new("scan.pdf"), Path::new("scan.opt.pdf"), &settings).unwrap() {
///     OptimizeOutcome::Optimized(summary) => println!("{}", summary.sizes),
///     OptimizeOutcome::NoEligibleImages => println!("no 1-bit images found"),
/// }
/// ```
pub fn optimize_pdf(
    input: &Path,
    output: &Path,
    settings: &Settings,
) -> Result<OptimizeOutcome, OptimizeError> {
    let encoder = settings.preflight(input)?;
    if let Some(warning) = settings.threshold_warning() {
        log::warn!("{}", warning);
    }

    Optimizer::new(settings.clone(), Jbig2Process::new(encoder)).optimize(input, output)
}
