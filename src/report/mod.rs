//! Size comparison and per-image diagnostics

pub mod diagnostics;
pub mod summary;

pub use diagnostics::{diagnostic_rows, write_csv, DiagnosticRow};
pub use summary::SizeReport;
