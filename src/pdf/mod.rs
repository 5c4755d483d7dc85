//! Reading and rewriting the PDF object graph

pub mod locate;
pub mod objects;
pub mod save;
pub mod splice;

pub use locate::{locate_images, Candidate};
pub use save::save_optimized;
pub use splice::Splicer;
