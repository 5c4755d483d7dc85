//! Rewriting image streams to reference JBIG2 fragments

use std::collections::BTreeSet;

use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::error::OptimizeError;

/// Keys describing the old encoding that must not survive the rewrite
const STALE_KEYS: [&[u8]; 3] = [b"CCITTFaxDecode", b"BlackIs1", b"DL"];

/// Rewrites image streams in place, at most once per object.
#[derive(Debug, Default)]
pub struct Splicer {
    spliced: BTreeSet<ObjectId>,
}

impl Splicer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a chunk's symbol dictionary as a new indirect stream
    pub fn add_globals(&self, doc: &mut Document, globals: Vec<u8>) -> ObjectId {
        doc.add_object(Stream::new(dictionary! {}, globals))
    }

    /// Replace the payload of `id` with a JBIG2 fragment decoded against
    /// the shared `globals` stream.
    ///
    /// The object keeps its id, so every reference to it stays valid.
    pub fn splice(
        &mut self,
        doc: &mut Document,
        id: ObjectId,
        fragment: Vec<u8>,
        globals: ObjectId,
    ) -> Result<(), OptimizeError> {
        if self.spliced.contains(&id) {
            return Err(OptimizeError::AlreadySpliced(id));
        }

        let stream = doc.get_object_mut(id)?.as_stream_mut()?;
        for key in STALE_KEYS {
            stream.dict.remove(key);
        }
        stream.dict.set("Filter", Object::Name(b"JBIG2Decode".to_vec()));
        stream
            .dict
            .set("DecodeParms", dictionary! { "JBIG2Globals" => globals });
        stream.set_content(fragment);
        stream.allows_compression = false;

        self.spliced.insert(id);
        Ok(())
    }

    pub fn spliced_count(&self) -> usize {
        self.spliced.len()
    }
}
