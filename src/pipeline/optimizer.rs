use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use lopdf::Document;

use super::schedule::{assign_chunks, plan_chunks};
use crate::config::Settings;
use crate::encode::{run_chunk, Jbig2Encoder};
use crate::error::OptimizeError;
use crate::model::{Chunk, ImageRecord};
use crate::pdf::{locate_images, save_optimized, Splicer};
use crate::raster::export_images;
use crate::report::{diagnostic_rows, write_csv, SizeReport};

/// Result of an optimize run
#[derive(Debug)]
pub enum OptimizeOutcome {
    /// Nothing to recompress; no output file was written
    NoEligibleImages,
    Optimized(OptimizeSummary),
}

#[derive(Debug)]
pub struct OptimizeSummary {
    /// Every recompressed image, in discovery order
    pub records: Vec<ImageRecord>,
    pub chunk_count: usize,
    pub sizes: SizeReport,
}

/// Recompresses the 1-bit images of one PDF with shared-dictionary JBIG2
pub struct Optimizer<E> {
    settings: Settings,
    encoder: E,
}

impl<E: Jbig2Encoder> Optimizer<E> {
    pub fn new(settings: Settings, encoder: E) -> Self {
        Self { settings, encoder }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the whole pipeline from `input` to `output`.
    ///
    /// Any chunk failure aborts the run before anything is written. The
    /// scratch directory is removed on every exit path.
    pub fn optimize(&self, input: &Path, output: &Path) -> Result<OptimizeOutcome, OptimizeError> {
        self.settings.validate()?;

        let workdir = tempfile::Builder::new().prefix("jbig2-pdf-").tempdir()?;
        let mut doc = Document::load(input).map_err(OptimizeError::Load)?;
        log::info!("Loaded {} ({} objects)", input.display(), doc.objects.len());

        let mut records = self.extract_images(&doc, workdir.path())?;
        if records.is_empty() {
            log::info!("No eligible 1-bit images in {}", input.display());
            return Ok(OptimizeOutcome::NoEligibleImages);
        }
        log::info!("Found {} eligible images", records.len());

        let chunks = plan_chunks(records.len(), self.settings.chunk_size);
        assign_chunks(&mut records, &chunks);
        self.compress_and_replace(&mut doc, &mut records, &chunks, workdir.path())?;

        save_optimized(&mut doc, output, self.settings.linearize)?;
        workdir.close()?;

        let sizes = SizeReport::measure(input, output)?;
        if let Some(ref csv_path) = self.settings.diag_csv {
            write_csv(csv_path, &diagnostic_rows(&records))?;
            log::info!("Wrote diagnostics to {}", csv_path.display());
        }

        Ok(OptimizeOutcome::Optimized(OptimizeSummary {
            records,
            chunk_count: chunks.len(),
            sizes,
        }))
    }

    fn extract_images(&self, doc: &Document, dir: &Path) -> Result<Vec<ImageRecord>, OptimizeError> {
        let bar = self.progress_bar(None, "extracting images");
        let records = export_images(doc, locate_images(doc).inspect(|_| bar.inc(1)), dir)?;
        bar.finish_and_clear();
        Ok(records)
    }

    /// Encode chunk by chunk, splicing each chunk's results before the
    /// next one starts.
    fn compress_and_replace(
        &self,
        doc: &mut Document,
        records: &mut [ImageRecord],
        chunks: &[Chunk],
        root: &Path,
    ) -> Result<(), OptimizeError> {
        let bar = self.progress_bar(Some(records.len() as u64), "encoding jbig2 images");
        let mut splicer = Splicer::new();

        for chunk in chunks {
            let encoded = run_chunk(
                &self.encoder,
                chunk,
                records,
                self.settings.threshold,
                root,
                &mut || bar.inc(1),
            )?;

            let globals = splicer.add_globals(doc, encoded.globals);
            for (record, fragment) in records[chunk.range.clone()].iter().zip(encoded.fragments) {
                splicer.splice(doc, record.object_id, fragment, globals)?;
            }
        }

        bar.finish_and_clear();
        log::info!(
            "Replaced {} images using {} symbol dictionaries",
            splicer.spliced_count(),
            chunks.len()
        );
        Ok(())
    }

    fn progress_bar(&self, len: Option<u64>, message: &'static str) -> ProgressBar {
        if !self.settings.show_progress {
            return ProgressBar::hidden();
        }

        let (bar, template) = match len {
            Some(len) => (
                ProgressBar::new(len),
                "{msg} {pos}/{len} [{elapsed_precise}] [{wide_bar}]",
            ),
            None => (ProgressBar::new_spinner(), "{spinner} {msg} {pos}"),
        };
        if let Ok(style) = ProgressStyle::with_template(template) {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.set_message(message);
        bar
    }
}
