//! Group 3 (T.4) fax decoding.
//!
//! Handles pure one-dimensional coding (K = 0) and mixed coding (K > 0)
//! where a tag bit before each line selects 1D or 2D. Lines may be framed
//! by EOL markers and may start on byte boundaries. Code tables come from
//! the `fax` crate; lines are tracked as a reference line and a coding line
//! of pixels.

use fax::maps::{self, Mode};
use fax::BitReader;

use crate::error::ScanError;

/// EOL is eleven zero bits followed by a one
const EOL_BITS: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group3Options {
    pub columns: u16,
    pub rows: u32,
    /// K > 0: lines carry a tag bit, 1 for 1D and 0 for 2D
    pub two_dimensional: bool,
    pub end_of_line: bool,
    pub byte_align: bool,
}

/// Decode `options.rows` lines, reporting each as a list of color
/// transitions starting from white.
///
/// Fewer lines than requested is an error: a partially decoded image is
/// never handed on.
pub fn decode_group3(
    data: &[u8],
    options: &Group3Options,
    mut on_line: impl FnMut(&[u16]),
) -> Result<(), ScanError> {
    // Trailing zeros let the code tables peek past the last short code
    let mut padded = Vec::with_capacity(data.len() + 2);
    padded.extend_from_slice(data);
    padded.extend_from_slice(&[0, 0]);
    let mut reader = fax::slice_reader(&padded);

    let width = options.columns as usize;
    let mut reference = vec![false; width];
    let mut coding = vec![false; width];
    let mut transitions = Vec::new();

    for row in 0..options.rows {
        if options.byte_align && !options.end_of_line {
            align(&mut reader);
        }
        skip_eol(&mut reader);
        if options.byte_align {
            align(&mut reader);
        }
        if reader.peek(EOL_BITS).is_none() {
            return Err(ScanError::Decode(format!(
                "fax data ended after {} of {} rows",
                row, options.rows
            )));
        }

        let one_dimensional = !options.two_dimensional || read_bit(&mut reader) == Some(1);
        coding.fill(false);
        let decoded = if one_dimensional {
            decode_1d(&mut reader, &mut coding)
        } else {
            decode_2d(&mut reader, &reference, &mut coding)
        };
        if decoded.is_none() {
            return Err(ScanError::Decode(format!("invalid fax code in row {row}")));
        }

        changes(&coding, &mut transitions);
        on_line(&transitions);
        std::mem::swap(&mut reference, &mut coding);
    }
    Ok(())
}

/// Skip fill bits and an EOL marker if one comes next
fn skip_eol(reader: &mut impl BitReader) {
    while reader.peek(EOL_BITS) == Some(0) {
        let _ = reader.consume(1);
    }
    if reader.peek(EOL_BITS) == Some(1) {
        let _ = reader.consume(EOL_BITS);
    }
}

fn align(reader: &mut impl BitReader) {
    let skip = reader.bits_to_byte_boundary();
    if skip > 0 {
        let _ = reader.consume(skip);
    }
}

fn read_bit(reader: &mut impl BitReader) -> Option<u16> {
    let bit = reader.peek(1)?;
    let _ = reader.consume(1);
    Some(bit)
}

/// One run length: any makeup codes followed by a terminating code
fn read_run(reader: &mut impl BitReader, is_black: bool) -> Option<usize> {
    let mut total = 0usize;
    loop {
        let code = if is_black {
            maps::black::decode(reader)?
        } else {
            maps::white::decode(reader)?
        };
        total = total.checked_add(code as usize)?;
        if code < 64 {
            return Some(total);
        }
    }
}

fn decode_1d(reader: &mut impl BitReader, line: &mut [bool]) -> Option<()> {
    let width = line.len();
    let mut a0 = 0;
    let mut is_black = false;
    while a0 < width {
        let end = a0.checked_add(read_run(reader, is_black)?)?;
        if end > width {
            return None;
        }
        line[a0..end].fill(is_black);
        a0 = end;
        is_black = !is_black;
    }
    Some(())
}

fn decode_2d(reader: &mut impl BitReader, reference: &[bool], line: &mut [bool]) -> Option<()> {
    let width = line.len();
    // None is the imaginary element left of the first pixel
    let mut a0: Option<usize> = None;
    let mut is_black = false;

    loop {
        let start = a0.unwrap_or(0);
        if start >= width {
            return Some(());
        }
        let b1 = find_b1(reference, a0, is_black);

        match maps::mode::decode(reader)? {
            Mode::Pass => {
                let b2 = next_change(reference, b1);
                line[start..b2].fill(is_black);
                a0 = Some(b2);
            }
            Mode::Horizontal => {
                let a1 = start.checked_add(read_run(reader, is_black)?)?;
                let a2 = a1.checked_add(read_run(reader, !is_black)?)?;
                if a2 > width {
                    return None;
                }
                line[start..a1].fill(is_black);
                line[a1..a2].fill(!is_black);
                a0 = Some(a2);
            }
            Mode::Vertical(delta) => {
                let a1 = b1.checked_add_signed(delta as isize)?;
                if a1 > width || a1 < start {
                    return None;
                }
                line[start..a1].fill(is_black);
                a0 = Some(a1);
                is_black = !is_black;
            }
            Mode::Extension | Mode::EOF => return None,
        }
    }
}

/// Whether pixel `i` differs from its left neighbour, with white before
/// the first pixel
fn is_change(line: &[bool], i: usize) -> bool {
    let previous = i.checked_sub(1).is_some_and(|p| line[p]);
    line[i] != previous
}

/// First changing element on the reference line right of `a0` whose
/// color is opposite to the current run
fn find_b1(reference: &[bool], a0: Option<usize>, is_black: bool) -> usize {
    let start = a0.map_or(0, |a| a + 1);
    (start..reference.len())
        .find(|&i| reference[i] != is_black && is_change(reference, i))
        .unwrap_or(reference.len())
}

fn next_change(line: &[bool], from: usize) -> usize {
    (from + 1..line.len())
        .find(|&i| is_change(line, i))
        .unwrap_or(line.len())
}

fn changes(line: &[bool], out: &mut Vec<u16>) {
    out.clear();
    out.extend(
        (0..line.len())
            .filter(|&i| is_change(line, i))
            .map(|i| i as u16),
    );
}
