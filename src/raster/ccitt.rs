//! CCITT Group 3/4 decoding of fax-encoded image streams.
//!
//! Group 4 data goes through the `fax` crate; Group 3 data through
//! `group3`. Both report each scan line as a list of color transitions
//! starting from white. Any decoding failure rejects the whole image.

use lopdf::{Dictionary, Document};

use super::bitmap::{checked_len, invert, Bitmap};
use super::group3::{decode_group3, Group3Options};
use crate::error::ScanError;
use crate::pdf::objects::{get_bool, get_int};

/// `/DecodeParms` of a CCITTFaxDecode filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CcittParams {
    /// K < 0 is Group 4, K = 0 Group 3 1D, K > 0 Group 3 mixed 1D/2D
    pub k: i64,
    pub columns: u32,
    /// `None` when absent or zero
    pub rows: Option<u32>,
    pub black_is_1: bool,
    pub end_of_line: bool,
    pub byte_align: bool,
}

impl Default for CcittParams {
    fn default() -> Self {
        Self {
            k: 0,
            columns: 1728,
            rows: None,
            black_is_1: false,
            end_of_line: false,
            byte_align: false,
        }
    }
}

impl CcittParams {
    pub fn from_dict(doc: &Document, parms: Option<&Dictionary>) -> Result<Self, ScanError> {
        let mut params = Self::default();
        let Some(parms) = parms else {
            return Ok(params);
        };

        if let Some(k) = get_int(doc, parms, "K")? {
            params.k = k;
        }
        if let Some(columns) = get_int(doc, parms, "Columns")? {
            params.columns = u32::try_from(columns).map_err(|_| ScanError::BadKey("Columns"))?;
        }
        if let Some(rows) = get_int(doc, parms, "Rows")? {
            let rows = u32::try_from(rows).map_err(|_| ScanError::BadKey("Rows"))?;
            params.rows = (rows > 0).then_some(rows);
        }
        if let Some(black_is_1) = get_bool(doc, parms, "BlackIs1")? {
            params.black_is_1 = black_is_1;
        }
        if let Some(end_of_line) = get_bool(doc, parms, "EndOfLine")? {
            params.end_of_line = end_of_line;
        }
        if let Some(byte_align) = get_bool(doc, parms, "EncodedByteAlign")? {
            params.byte_align = byte_align;
        }
        Ok(params)
    }

    pub fn is_group_4(&self) -> bool {
        self.k < 0
    }
}

/// Decode a fax stream into a bitmap of `width` x `height` pixels.
pub fn decode_ccitt(
    data: &[u8],
    width: u32,
    height: u32,
    params: &CcittParams,
) -> Result<Bitmap, ScanError> {
    let len = checked_len(width, height)?;
    let columns = u16::try_from(params.columns)
        .ok()
        .filter(|&c| c > 0)
        .ok_or_else(|| ScanError::Unsupported(format!("{} fax columns", params.columns)))?;
    let rows = params.rows.unwrap_or(height);

    let mut data_rows: Vec<u8> = Vec::with_capacity(len);
    let mut decoded_rows = 0u32;
    let mut on_line = |transitions: &[u16]| {
        if decoded_rows < height {
            data_rows.extend(transitions_to_row(transitions, width as usize));
        }
        decoded_rows += 1;
    };

    if params.is_group_4() {
        if params.byte_align {
            return Err(ScanError::Unsupported(
                "byte-aligned Group 4 fax data".to_string(),
            ));
        }
        let finished = fax::decoder::decode_g4(
            data.iter().copied(),
            columns,
            u16::try_from(rows).ok(),
            &mut on_line,
        );
        if finished.is_none() {
            return Err(ScanError::Decode(format!(
                "invalid Group 4 fax data after {} of {} rows",
                decoded_rows, rows
            )));
        }
    } else {
        let options = Group3Options {
            columns,
            rows,
            two_dimensional: params.k > 0,
            end_of_line: params.end_of_line,
            byte_align: params.byte_align,
        };
        decode_group3(data, &options, &mut on_line)?;
    }

    if decoded_rows < rows.min(height) {
        return Err(ScanError::Decode(format!(
            "fax data ended after {} of {} rows",
            decoded_rows, rows
        )));
    }

    // Coded black is visually black unless BlackIs1 flips the samples
    if params.black_is_1 {
        invert(&mut data_rows);
    }
    Ok(Bitmap::from_black_rows(width, height, data_rows))
}

/// Pack one line of color transitions into bytes with set bits for black.
fn transitions_to_row(transitions: &[u16], width: usize) -> Vec<u8> {
    let mut row = vec![0u8; width.div_ceil(8)];
    let mut fill = |from: usize, to: usize| {
        for x in from..to {
            row[x / 8] |= 0x80 >> (x % 8);
        }
    };

    // Runs alternate white, black, white, ... starting at column 0
    let mut black = false;
    let mut start = 0;
    for &t in transitions {
        let end = (t as usize).min(width);
        if black {
            fill(start, end);
        }
        black = !black;
        start = end;
    }
    if black {
        fill(start, width);
    }
    row
}
