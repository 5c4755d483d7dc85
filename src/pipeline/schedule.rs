//! Partitioning images into chunks that share a symbol dictionary

use crate::model::{Chunk, ImageRecord};

/// Split `n` records into `ceil(n / chunk_size)` contiguous chunks.
///
/// Sizes are as equal as possible: the first `n % groups` chunks get one
/// extra record, so no two chunks differ by more than one. 300 images at
/// a chunk size of 128 become three chunks of 100.
///
/// # Panics
///
/// Panics if `chunk_size` is zero; settings validation rejects that.
pub fn plan_chunks(n: usize, chunk_size: usize) -> Vec<Chunk> {
    assert!(chunk_size > 0, "chunk size must be positive");
    if n == 0 {
        return Vec::new();
    }

    let groups = n.div_ceil(chunk_size);
    let base = n / groups;
    let extra = n % groups;

    let mut start = 0;
    (0..groups)
        .map(|id| {
            let len = base + usize::from(id < extra);
            let chunk = Chunk {
                id,
                range: start..start + len,
            };
            start += len;
            chunk
        })
        .collect()
}

/// Record each image's chunk membership
pub fn assign_chunks(records: &mut [ImageRecord], chunks: &[Chunk]) {
    for chunk in chunks {
        for record in &mut records[chunk.range.clone()] {
            debug_assert!(record.chunk_id.is_none(), "chunk already assigned");
            record.chunk_id = Some(chunk.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sizes(chunks: &[Chunk]) -> Vec<usize> {
        chunks.iter().map(Chunk::len).collect()
    }

    #[test]
    fn test_no_images_no_chunks() {
        assert!(plan_chunks(0, 128).is_empty());
    }

    #[test]
    fn test_single_image() {
        let chunks = plan_chunks(1, 128);
        assert_eq!(chunks, vec![Chunk { id: 0, range: 0..1 }]);
    }

    #[test]
    fn test_even_split_of_300() {
        assert_eq!(sizes(&plan_chunks(300, 128)), vec![100, 100, 100]);
    }

    #[test]
    fn test_uneven_split_front_loaded() {
        assert_eq!(sizes(&plan_chunks(10, 4)), vec![4, 3, 3]);
        assert_eq!(sizes(&plan_chunks(129, 128)), vec![65, 64]);
        assert_eq!(sizes(&plan_chunks(128, 128)), vec![128]);
    }

    #[test]
    fn test_partition_properties() {
        for n in 0..200 {
            for c in 1..40 {
                let chunks = plan_chunks(n, c);
                assert_eq!(chunks.len(), n.div_ceil(c));
                assert_eq!(chunks.iter().map(Chunk::len).sum::<usize>(), n);

                let mut next = 0;
                for (i, chunk) in chunks.iter().enumerate() {
                    assert_eq!(chunk.id, i);
                    assert_eq!(chunk.range.start, next);
                    assert!(chunk.len() <= c);
                    next = chunk.range.end;
                }

                if let (Some(max), Some(min)) = (
                    chunks.iter().map(Chunk::len).max(),
                    chunks.iter().map(Chunk::len).min(),
                ) {
                    assert!(max - min <= 1, "n={n} c={c}");
                }
            }
        }
    }

    #[test]
    fn test_assign_chunks() {
        let mut records: Vec<_> = (0..5)
            .map(|i| ImageRecord::new(i, (i as u32 + 1, 0), PathBuf::new(), 1, 1, 0))
            .collect();
        assign_chunks(&mut records, &plan_chunks(5, 2));
        let ids: Vec<_> = records.iter().map(|r| r.chunk_id.unwrap()).collect();
        assert_eq!(ids, vec![0, 0, 1, 1, 2]);
    }
}
