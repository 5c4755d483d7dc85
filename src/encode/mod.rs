//! The external JBIG2 encoder and running it chunk by chunk

pub mod invoke;
pub mod process;

use std::path::{Path, PathBuf};

use crate::error::EncodeError;
use crate::model::EncodedChunk;

pub use invoke::run_chunk;
pub use process::{fragment_file_name, read_artifacts, Jbig2Process};

/// Something that turns one-bit rasters into a shared symbol dictionary
/// plus one JBIG2 fragment per raster.
pub trait Jbig2Encoder {
    /// Encode `rasters` in order, using `workdir` as scratch space.
    ///
    /// `on_progress` is called once per finished image as the encoder
    /// reports it. Fragments come back in the order of `rasters`.
    fn encode(
        &self,
        threshold: f32,
        rasters: &[PathBuf],
        workdir: &Path,
        on_progress: &mut dyn FnMut(),
    ) -> Result<EncodedChunk, EncodeError>;
}
