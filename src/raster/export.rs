use std::io;
use std::path::Path;

use lopdf::Document;

use super::{decode_bitmap, write_pbm};
use crate::model::ImageRecord;
use crate::pdf::Candidate;

/// Raster file name for the image at `index`.
///
/// The fixed width keeps lexical order equal to discovery order.
pub fn raster_file_name(index: usize) -> String {
    format!("img_{index:06}.pbm")
}

/// Write every candidate as a PBM file in `dir` and build its record.
///
/// Candidates that cannot be decoded are skipped like any other scan
/// error; indices stay contiguous over the exported images. Failing to
/// write a file is fatal.
pub fn export_images<'a>(
    doc: &'a Document,
    candidates: impl IntoIterator<Item = Candidate<'a>>,
    dir: &Path,
) -> io::Result<Vec<ImageRecord>> {
    let mut records = Vec::new();

    for candidate in candidates {
        let (num, gen) = candidate.id;
        let bitmap = match decode_bitmap(doc, candidate.stream) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                log::warn!("Skipping image {} {}: {}", num, gen, e);
                continue;
            }
        };

        let index = records.len();
        let raster_path = dir.join(raster_file_name(index));
        write_pbm(&raster_path, &bitmap)?;
        log::debug!(
            "Exported image {} {} ({}x{}) to {}",
            num,
            gen,
            bitmap.width,
            bitmap.height,
            raster_path.display()
        );

        records.push(ImageRecord::new(
            index,
            candidate.id,
            raster_path,
            bitmap.width,
            bitmap.height,
            candidate.stream.content.len(),
        ));
    }

    Ok(records)
}
