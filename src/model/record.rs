use lopdf::ObjectId;
use std::path::PathBuf;

/// One eligible image found in the document.
///
/// Records are kept in discovery order; each pipeline stage fills in its
/// own fields in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    /// Position in discovery order, contiguous from zero
    pub index: usize,
    /// Handle of the image stream in the document's object table
    pub object_id: ObjectId,
    /// Exported one-bit raster file fed to the encoder
    pub raster_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Length of the stream's raw (still encoded) payload before splicing
    pub orig_size: usize,

    // Filled in by later stages
    pub chunk_id: Option<usize>,
    pub fragment_size: Option<usize>,
    pub globals_size: Option<usize>,
}

impl ImageRecord {
    pub fn new(
        index: usize,
        object_id: ObjectId,
        raster_path: PathBuf,
        width: u32,
        height: u32,
        orig_size: usize,
    ) -> Self {
        Self {
            index,
            object_id,
            raster_path,
            width,
            height,
            orig_size,
            chunk_id: None,
            fragment_size: None,
            globals_size: None,
        }
    }

    /// Returns true once the encoder results have been recorded
    pub fn is_encoded(&self) -> bool {
        self.fragment_size.is_some() && self.globals_size.is_some()
    }
}
