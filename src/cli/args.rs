use clap::Parser;
use std::path::PathBuf;

use crate::config::defaults::{DEFAULT_CHUNK_SIZE, DEFAULT_ENCODER, DEFAULT_THRESHOLD};

#[derive(Parser, Debug)]
#[command(name = "jbig2-pdf-optimizer")]
#[command(
    author,
    version,
    about = "Recompress 1-bit images in PDFs with global dictionary JBIG2 images"
)]
pub struct Args {
    /// Input PDF file path
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output PDF file path
    #[arg(required = true)]
    pub output: PathBuf,

    /// JBIG2 similarity threshold (0.4 to 0.97)
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f32,

    /// Number of images per JBIG2 global dictionary
    #[arg(short, long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk: usize,

    /// Write per-image diagnostic records to this CSV file
    #[arg(long)]
    pub diag_csv: Option<PathBuf>,

    /// JBIG2 encoder executable
    #[arg(long, default_value = DEFAULT_ENCODER)]
    pub encoder: PathBuf,

    /// Skip linearizing the output with qpdf
    #[arg(long)]
    pub no_linearize: bool,

    /// Hide progress bars
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
