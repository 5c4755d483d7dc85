//! Per-image estimated savings, optionally written as CSV

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::model::ImageRecord;

const CSV_HEADER: &str = "chunk_id,pbm_path,orig_size,jb2_lsize,jb2_gsize,est_size,est_saving_pc";

/// One image's share of the savings.
///
/// `est_size` charges each image an equal share of its chunk's symbol
/// dictionary, so it is an approximation rather than an exact figure.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticRow {
    pub chunk_id: usize,
    pub pbm_path: PathBuf,
    pub orig_size: usize,
    pub jb2_lsize: usize,
    pub jb2_gsize: usize,
    pub est_size: f64,
    pub est_saving_pc: f64,
}

/// Build a row for every encoded record, in record order
pub fn diagnostic_rows(records: &[ImageRecord]) -> Vec<DiagnosticRow> {
    // chunk id -> (sum of dictionary sizes, member count)
    let mut chunks: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
    for record in records {
        if let (Some(chunk), Some(gsize)) = (record.chunk_id, record.globals_size) {
            let entry = chunks.entry(chunk).or_default();
            entry.0 += gsize;
            entry.1 += 1;
        }
    }

    records
        .iter()
        .filter_map(|record| {
            let chunk_id = record.chunk_id?;
            let jb2_lsize = record.fragment_size?;
            let jb2_gsize = record.globals_size?;
            let (gsum, members) = chunks[&chunk_id];

            let mean_globals = gsum as f64 / members as f64;
            let est_size = jb2_lsize as f64 + mean_globals / members as f64;
            let est_saving_pc = if record.orig_size == 0 {
                0.0
            } else {
                (record.orig_size as f64 - est_size) / record.orig_size as f64 * 100.0
            };

            Some(DiagnosticRow {
                chunk_id,
                pbm_path: record.raster_path.clone(),
                orig_size: record.orig_size,
                jb2_lsize,
                jb2_gsize,
                est_size,
                est_saving_pc,
            })
        })
        .collect()
}

fn csv_escape(input: &str) -> String {
    if input.contains(',') || input.contains('"') || input.contains('\n') || input.contains('\r') {
        format!("\"{}\"", input.replace('"', "\"\""))
    } else {
        input.to_string()
    }
}

pub fn to_csv_lines(rows: &[DiagnosticRow]) -> Vec<String> {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for row in rows {
        let fields = [
            row.chunk_id.to_string(),
            csv_escape(&row.pbm_path.display().to_string()),
            row.orig_size.to_string(),
            row.jb2_lsize.to_string(),
            row.jb2_gsize.to_string(),
            format!("{:.1}", row.est_size),
            format!("{:.2}", row.est_saving_pc),
        ];
        lines.push(fields.join(","));
    }
    lines
}

pub fn write_csv(path: &Path, rows: &[DiagnosticRow]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for line in to_csv_lines(rows) {
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}
