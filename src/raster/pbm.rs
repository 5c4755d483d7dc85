//! Binary PBM (P4) output

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::Bitmap;

/// Serialize a bitmap as binary PBM. PBM uses 1 for black, like `Bitmap`.
pub fn encode_pbm(bitmap: &Bitmap) -> Vec<u8> {
    let mut out = format!("P4\n{} {}\n", bitmap.width, bitmap.height).into_bytes();
    out.extend_from_slice(&bitmap.data);
    out
}

pub fn write_pbm(path: &Path, bitmap: &Bitmap) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&encode_pbm(bitmap))?;
    writer.flush()
}
