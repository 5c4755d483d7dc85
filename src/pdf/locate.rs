//! Finding 1-bit image streams in the object table

use lopdf::{Document, ObjectId, Stream};

use super::objects::{filter_names, get, get_bool, get_int, get_name};
use crate::error::ScanError;

/// An image stream that passed the eligibility checks
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub id: ObjectId,
    pub stream: &'a Stream,
}

/// Lazily walk the object table in object-number order, yielding every
/// eligible 1-bit image stream.
///
/// Objects that fail inspection are skipped; the walk never stops early.
pub fn locate_images(doc: &Document) -> impl Iterator<Item = Candidate<'_>> + '_ {
    doc.objects.iter().filter_map(move |(&id, object)| {
        let stream = object.as_stream().ok()?;
        match is_eligible(doc, stream) {
            Ok(true) => Some(Candidate { id, stream }),
            Ok(false) => None,
            Err(e) => {
                log::debug!("Skipping object {} {}: {}", id.0, id.1, e);
                None
            }
        }
    })
}

/// Check whether a stream is a 1-bit image we may recompress.
///
/// Images with a `/Decode` array are left alone so their photometric
/// interpretation is never altered. Streams that are already JBIG2 are
/// not eligible either.
pub fn is_eligible(doc: &Document, stream: &Stream) -> Result<bool, ScanError> {
    let dict = &stream.dict;

    if get_name(doc, dict, "Subtype")? != Some(b"Image".as_slice()) {
        return Ok(false);
    }

    let image_mask = get_bool(doc, dict, "ImageMask")?.unwrap_or(false);
    let bits = match get_int(doc, dict, "BitsPerComponent")? {
        Some(bits) => bits,
        None if image_mask => 1,
        None => return Err(ScanError::BadKey("BitsPerComponent")),
    };
    if bits != 1 {
        return Ok(false);
    }

    if get(doc, dict, b"Decode")?.is_some() {
        return Ok(false);
    }

    if filter_names(doc, dict)?.contains(&b"JBIG2Decode".as_slice()) {
        return Ok(false);
    }

    Ok(true)
}
