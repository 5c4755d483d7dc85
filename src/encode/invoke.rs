use std::fs;
use std::path::{Path, PathBuf};

use super::Jbig2Encoder;
use crate::error::{EncodeError, OptimizeError};
use crate::model::{Chunk, EncodedChunk, ImageRecord};

/// Encode one chunk in its own working directory under `root`.
///
/// `on_tick` fires exactly once per member: encoder progress is capped at
/// the member count and topped up after a successful run. On success each
/// member's `fragment_size` and `globals_size` are filled in.
pub fn run_chunk<E: Jbig2Encoder + ?Sized>(
    encoder: &E,
    chunk: &Chunk,
    records: &mut [ImageRecord],
    threshold: f32,
    root: &Path,
    on_tick: &mut dyn FnMut(),
) -> Result<EncodedChunk, OptimizeError> {
    let fail = |source: EncodeError| OptimizeError::Chunk {
        chunk: chunk.id,
        source,
    };

    let members = &mut records[chunk.range.clone()];
    let expected = members.len();
    let workdir = root.join(chunk.dir_name());
    fs::create_dir(&workdir).map_err(|e| fail(EncodeError::Io(e)))?;

    let rasters: Vec<PathBuf> = members.iter().map(|r| r.raster_path.clone()).collect();
    log::info!("Encoding chunk {} ({} images)", chunk.id, expected);

    let mut ticks = 0;
    let encoded = encoder
        .encode(threshold, &rasters, &workdir, &mut || {
            if ticks < expected {
                ticks += 1;
                on_tick();
            }
        })
        .map_err(fail)?;

    if encoded.fragments.len() != expected {
        return Err(fail(EncodeError::FragmentCount {
            expected,
            found: encoded.fragments.len(),
        }));
    }
    for _ in ticks..expected {
        on_tick();
    }

    for (record, fragment) in members.iter_mut().zip(&encoded.fragments) {
        record.fragment_size = Some(fragment.len());
        record.globals_size = Some(encoded.globals.len());
    }
    log::debug!(
        "Chunk {}: {} byte dictionary, {} fragment bytes",
        chunk.id,
        encoded.globals.len(),
        encoded.fragments.iter().map(Vec::len).sum::<usize>()
    );

    Ok(encoded)
}
