//! Decoding image streams into bitmaps

use lopdf::{Dictionary, Document, Object, Stream};

use super::bitmap::{checked_len, Bitmap};
use super::ccitt::{decode_ccitt, CcittParams};
use crate::error::ScanError;
use crate::pdf::objects::{decode_parms, filter_names, get, get_bool, get_int};

/// Filters lopdf can undo for us
const GENERIC_FILTERS: [&[u8]; 4] = [b"FlateDecode", b"Fl", b"LZWDecode", b"LZW"];

/// Decode a 1-bit image stream into a bitmap with set bits for black.
pub fn decode_bitmap(doc: &Document, stream: &Stream) -> Result<Bitmap, ScanError> {
    let dict = &stream.dict;
    let width = dimension(doc, dict, "Width")?;
    let height = dimension(doc, dict, "Height")?;
    checked_len(width, height)?;

    if !get_bool(doc, dict, "ImageMask")?.unwrap_or(false) {
        check_color_space(doc, dict)?;
    }

    let filters = filter_names(doc, dict)?;
    if filters.is_empty() {
        return Ok(Bitmap::from_gray_samples(width, height, stream.content.clone()));
    }

    if filters == [b"CCITTFaxDecode".as_slice()] || filters == [b"CCF".as_slice()] {
        let params = CcittParams::from_dict(doc, decode_parms(doc, dict)?)?;
        return decode_ccitt(&stream.content, width, height, &params);
    }

    if filters.iter().all(|f| GENERIC_FILTERS.contains(f)) {
        let samples = stream
            .decompressed_content()
            .map_err(|e| ScanError::Decode(e.to_string()))?;
        return Ok(Bitmap::from_gray_samples(width, height, samples));
    }

    Err(ScanError::Unsupported(format!(
        "filter chain [{}]",
        filters
            .iter()
            .map(|f| String::from_utf8_lossy(f))
            .collect::<Vec<_>>()
            .join(" ")
    )))
}

fn dimension(doc: &Document, dict: &Dictionary, key: &'static str) -> Result<u32, ScanError> {
    get_int(doc, dict, key)?
        .and_then(|v| u32::try_from(v).ok())
        .filter(|&v| v > 0)
        .ok_or(ScanError::BadKey(key))
}

/// Only gray color spaces have a fixed black/white meaning for 1-bit samples
fn check_color_space(doc: &Document, dict: &Dictionary) -> Result<(), ScanError> {
    let family = match get(doc, dict, b"ColorSpace")? {
        None => return Ok(()),
        Some(Object::Name(name)) => name.as_slice(),
        Some(Object::Array(items)) => match items.first() {
            Some(first) => crate::pdf::objects::resolve(doc, first)?
                .as_name()
                .map_err(|_| ScanError::BadKey("ColorSpace"))?,
            None => return Err(ScanError::BadKey("ColorSpace")),
        },
        Some(_) => return Err(ScanError::BadKey("ColorSpace")),
    };

    match family {
        b"DeviceGray" | b"CalGray" | b"G" => Ok(()),
        other => Err(ScanError::Unsupported(format!(
            "color space {}",
            String::from_utf8_lossy(other)
        ))),
    }
}
