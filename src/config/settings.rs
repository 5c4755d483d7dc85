use std::path::{Path, PathBuf};

use crate::cli::Args;
use crate::error::ConfigError;

use super::defaults::*;
use super::executable::find_executable;

/// Runtime settings for an optimize run
#[derive(Debug, Clone)]
pub struct Settings {
    /// JBIG2 similarity threshold passed to the encoder
    pub threshold: f32,
    /// Images per shared symbol dictionary
    pub chunk_size: usize,
    /// Encoder executable, bare name or path
    pub encoder: PathBuf,
    /// Linearize the saved PDF with qpdf when available
    pub linearize: bool,
    /// Draw progress bars on stderr
    pub show_progress: bool,
    /// Where to write per-image diagnostic records
    pub diag_csv: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
            encoder: PathBuf::from(DEFAULT_ENCODER),
            linearize: true,
            show_progress: true,
            diag_csv: None,
        }
    }
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_args(args: &Args) -> Self {
        Self {
            threshold: args.threshold,
            chunk_size: args.chunk,
            encoder: args.encoder.clone(),
            linearize: !args.no_linearize,
            show_progress: !args.quiet,
            diag_csv: args.diag_csv.clone(),
        }
    }

    /// Check the numeric settings. Does not touch the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange {
                value: self.threshold,
                min: MIN_THRESHOLD,
                max: MAX_THRESHOLD,
            });
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        Ok(())
    }

    /// Resolve the encoder executable on the search path
    pub fn resolve_encoder(&self) -> Result<PathBuf, ConfigError> {
        find_executable(&self.encoder)
            .ok_or_else(|| ConfigError::EncoderNotFound(self.encoder.display().to_string()))
    }

    /// Everything that must hold before the PDF is opened: valid numbers,
    /// an encoder on the search path and an existing input file.
    ///
    /// Returns the resolved encoder path.
    pub fn preflight(&self, input: &Path) -> Result<PathBuf, ConfigError> {
        self.validate()?;
        let encoder = self.resolve_encoder()?;
        if !input.is_file() {
            return Err(ConfigError::InputNotFound(input.to_path_buf()));
        }
        Ok(encoder)
    }

    /// Advisory message for thresholds prone to symbol substitution
    pub fn threshold_warning(&self) -> Option<String> {
        (self.threshold <= SUBSTITUTION_WARNING_THRESHOLD).then(|| {
            format!(
                "JBIG2 threshold {:.2} is at or below {:.2}: similar glyphs may be substituted \
                 for one another (e.g. 6 and 8). Check the output carefully.",
                self.threshold, SUBSTITUTION_WARNING_THRESHOLD
            )
        })
    }
}
