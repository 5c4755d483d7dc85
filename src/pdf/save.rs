//! Writing the optimized document
//!
//! The output is pruned of unreferenced objects, its flate streams are
//! recompressed, and it is written with generated object streams and a
//! cross-reference stream. Linearization is delegated to qpdf.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::Command;

use lopdf::{Document, Object, SaveOptions, Stream};

use crate::config::defaults::LINEARIZER;
use crate::config::find_executable;
use crate::error::OptimizeError;

/// Save `doc` to `path` with the fixed optimization options.
pub fn save_optimized(doc: &mut Document, path: &Path, linearize: bool) -> Result<(), OptimizeError> {
    let pruned = doc.prune_objects();
    log::info!("Pruned {} unreferenced objects", pruned.len());

    let recompressed = recompress_flate(doc);
    log::debug!("Decoded {} flate streams for recompression", recompressed);
    doc.compress();

    let options = SaveOptions::builder()
        .use_object_streams(true)
        .use_xref_streams(true)
        .build();

    let mut writer = BufWriter::new(File::create(path)?);
    doc.save_with_options(&mut writer, options)?;
    writer.flush()?;
    drop(writer);

    if linearize {
        match find_executable(Path::new(LINEARIZER)) {
            Some(qpdf) => linearize_or_discard(&qpdf, path)?,
            None => log::warn!("{} not found, saving without linearization", LINEARIZER),
        }
    }

    Ok(())
}

/// Decode plain flate streams so the following `compress` pass
/// re-encodes them.
fn recompress_flate(doc: &mut Document) -> usize {
    let mut count = 0;
    for (id, object) in doc.objects.iter_mut() {
        let Object::Stream(stream) = object else {
            continue;
        };
        if !is_plain_flate(stream) {
            continue;
        }
        match stream.decompressed_content() {
            Ok(data) => {
                stream.dict.remove(b"Filter");
                stream.set_content(data);
                count += 1;
            }
            Err(e) => log::debug!("Leaving stream {} {} as is: {}", id.0, id.1, e),
        }
    }
    count
}

/// A compressible stream whose only filter is FlateDecode without predictors
fn is_plain_flate(stream: &Stream) -> bool {
    if !stream.allows_compression || stream.dict.has(b"DecodeParms") {
        return false;
    }
    if matches!(stream.dict.get(b"Type"), Ok(Object::Name(t)) if t == b"ObjStm" || t == b"XRef") {
        return false;
    }
    matches!(stream.dict.get(b"Filter"), Ok(Object::Name(f)) if f == b"FlateDecode")
}

/// Linearize the saved output, deleting it if qpdf fails so a failed run
/// leaves no file behind.
fn linearize_or_discard(qpdf: &Path, path: &Path) -> Result<(), OptimizeError> {
    let result = linearize_in_place(qpdf, path);
    if result.is_err() {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("Could not remove {}: {}", path.display(), e);
        }
    }
    result
}

/// Linearize a PDF in place with qpdf.
fn linearize_in_place(qpdf: &Path, path: &Path) -> Result<(), OptimizeError> {
    let output = Command::new(qpdf)
        .arg("--linearize")
        .arg("--replace-input")
        .arg(path)
        .output()
        .map_err(|e| OptimizeError::Linearize(format!("failed to execute {}: {e}", qpdf.display())))?;

    // qpdf exits with 3 when it succeeded with warnings
    match output.status.code() {
        Some(0) => Ok(()),
        Some(3) => {
            log::warn!(
                "qpdf reported warnings: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            Ok(())
        }
        code => Err(OptimizeError::Linearize(format!(
            "qpdf failed (exit code {}): {}",
            code.map_or_else(|| "unknown".to_string(), |c| c.to_string()),
            String::from_utf8_lossy(&output.stderr).trim()
        ))),
    }
}
