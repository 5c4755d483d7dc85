//! Turning image streams into one-bit raster files for the encoder

pub mod bitmap;
pub mod ccitt;
pub mod decode;
pub mod export;
pub mod group3;
pub mod pbm;

pub use bitmap::Bitmap;
pub use decode::decode_bitmap;
pub use export::{export_images, raster_file_name};
pub use pbm::write_pbm;
