//! Debug tool listing the images a run would recompress
//! Run with: cargo run --bin scan_images -- input.pdf

use anyhow::{Context, Result};
use clap::Parser;
use lopdf::Document;
use std::path::PathBuf;

use jbig2_pdf_optimizer::pdf::locate_images;
use jbig2_pdf_optimizer::pdf::objects::filter_names;
use jbig2_pdf_optimizer::raster::decode_bitmap;

#[derive(Parser, Debug)]
#[command(name = "scan-images", about = "List eligible 1-bit images in a PDF")]
struct Args {
    /// PDF file to inspect
    input: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let doc = Document::load(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    println!("{:>10} {:>12} {:>24} {:>10}  status", "object", "size", "filter", "raw_bytes");

    let mut eligible = 0;
    let mut total_raw = 0;
    for candidate in locate_images(&doc) {
        let filters = filter_names(&doc, &candidate.stream.dict)
            .map(|names| {
                names
                    .iter()
                    .map(|n| String::from_utf8_lossy(n).into_owned())
                    .collect::<Vec<_>>()
                    .join("+")
            })
            .unwrap_or_else(|_| "?".to_string());
        let filters = if filters.is_empty() { "none".to_string() } else { filters };

        let (size, status) = match decode_bitmap(&doc, candidate.stream) {
            Ok(bitmap) => {
                eligible += 1;
                total_raw += candidate.stream.content.len();
                (format!("{}x{}", bitmap.width, bitmap.height), "ok".to_string())
            }
            Err(e) => ("-".to_string(), format!("skipped: {e}")),
        };

        println!(
            "{:>10} {:>12} {:>24} {:>10}  {}",
            format!("{} {}", candidate.id.0, candidate.id.1),
            size,
            filters,
            candidate.stream.content.len(),
            status
        );
    }

    println!();
    println!("{} images can be recompressed ({} raw bytes)", eligible, total_raw);
    Ok(())
}
