use crate::config::defaults::MAX_RASTER_BYTES;
use crate::error::ScanError;

/// A packed one-bit image, rows padded to whole bytes, MSB leftmost.
///
/// A set bit is a black pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Build from packed rows where set bits are black, padding missing
    /// rows with white and dropping extra ones.
    pub fn from_black_rows(width: u32, height: u32, mut data: Vec<u8>) -> Self {
        data.resize(row_bytes(width) * height as usize, 0);
        Self {
            width,
            height,
            data,
        }
    }

    /// Build from PDF gray samples, where a clear bit is black.
    pub fn from_gray_samples(width: u32, height: u32, mut samples: Vec<u8>) -> Self {
        samples.truncate(row_bytes(width) * height as usize);
        invert(&mut samples);
        Self::from_black_rows(width, height, samples)
    }

    pub fn row_bytes(&self) -> usize {
        row_bytes(self.width)
    }

    /// Whether the pixel at (x, y) is black
    pub fn is_black(&self, x: u32, y: u32) -> bool {
        let byte = self.data[y as usize * self.row_bytes() + x as usize / 8];
        byte & (0x80 >> (x % 8)) != 0
    }
}

pub fn row_bytes(width: u32) -> usize {
    (width as usize).div_ceil(8)
}

/// Packed size of a `width` x `height` bitmap.
///
/// Dimensions come straight from the image dictionary, so anything that
/// overflows or exceeds `MAX_RASTER_BYTES` is refused before allocating.
pub fn checked_len(width: u32, height: u32) -> Result<usize, ScanError> {
    row_bytes(width)
        .checked_mul(height as usize)
        .filter(|&len| len <= MAX_RASTER_BYTES)
        .ok_or_else(|| ScanError::Unsupported(format!("{width}x{height} image is too large")))
}

pub fn invert(data: &mut [u8]) {
    for byte in data.iter_mut() {
        *byte = !*byte;
    }
}
