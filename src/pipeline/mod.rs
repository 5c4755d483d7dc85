//! The optimize pipeline: locate, export, schedule, encode, splice, save

pub mod optimizer;
pub mod schedule;

pub use optimizer::{OptimizeOutcome, OptimizeSummary, Optimizer};
pub use schedule::{assign_chunks, plan_chunks};
