use std::ops::Range;

/// A contiguous run of image records sharing one symbol dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub id: usize,
    /// Indices into the record list
    pub range: Range<usize>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Working directory name for this chunk's encoder run
    pub fn dir_name(&self) -> String {
        format!("chunk_{}", self.id)
    }
}

/// Encoder output for one chunk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedChunk {
    /// Shared JBIG2 symbol dictionary
    pub globals: Vec<u8>,
    /// One page fragment per submitted raster, in submission order
    pub fragments: Vec<Vec<u8>>,
}
