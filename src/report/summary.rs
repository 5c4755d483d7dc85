use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Input and output file sizes as found on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeReport {
    pub original: u64,
    pub optimized: u64,
}

impl SizeReport {
    /// Measure the files after saving, since save-time compression
    /// changes sizes.
    pub fn measure(input: &Path, output: &Path) -> io::Result<Self> {
        Ok(Self {
            original: fs::metadata(input)?.len(),
            optimized: fs::metadata(output)?.len(),
        })
    }

    /// Bytes saved; negative when the output grew
    pub fn diff(&self) -> i64 {
        self.original as i64 - self.optimized as i64
    }

    pub fn percent(&self) -> f64 {
        if self.original == 0 {
            return 0.0;
        }
        self.diff() as f64 / self.original as f64 * 100.0
    }
}

fn kb(bytes: f64) -> String {
    format!("{:.1} kb", bytes / 1024.0)
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12} {:>12} {:>12} {:>8}", "orig_kb", "opt_kb", "diff_kb", "diff_pc")?;
        write!(
            f,
            "{:>12} {:>12} {:>12} {:>8}",
            kb(self.original as f64),
            kb(self.optimized as f64),
            kb(self.diff() as f64),
            format!("{:.2}%", self.percent())
        )
    }
}
