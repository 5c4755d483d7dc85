pub mod chunk;
pub mod record;

pub use chunk::{Chunk, EncodedChunk};
pub use record::ImageRecord;
