//! Running the jbig2enc command-line encoder

use std::ffi::OsString;
use std::fs;
use std::io::{self, BufRead, BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::Jbig2Encoder;
use crate::config::defaults::{FRAGMENT_PREFIX, PROGRESS_TOKEN, SYMBOL_FILE};
use crate::error::EncodeError;
use crate::model::EncodedChunk;

/// The `jbig2` executable, run once per chunk in symbol mode
#[derive(Debug, Clone)]
pub struct Jbig2Process {
    program: PathBuf,
}

impl Jbig2Process {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `-s` symbol mode, `-p` PDF fragments, `-t` threshold, `-v` verbose
    pub fn arguments(&self, threshold: f32, rasters: &[PathBuf]) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-s", "-p", "-t"].iter().map(OsString::from).collect();
        args.push(format!("{threshold:.2}").into());
        args.push("-v".into());
        args.extend(rasters.iter().map(|p| p.as_os_str().to_owned()));
        args
    }
}

impl Jbig2Encoder for Jbig2Process {
    fn encode(
        &self,
        threshold: f32,
        rasters: &[PathBuf],
        workdir: &Path,
        on_progress: &mut dyn FnMut(),
    ) -> Result<EncodedChunk, EncodeError> {
        log::debug!(
            "Running {} on {} images in {}",
            self.program.display(),
            rasters.len(),
            workdir.display()
        );

        let mut child = Command::new(&self.program)
            .args(self.arguments(threshold, rasters))
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EncodeError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        // jbig2enc reports progress on stderr
        if let Some(stderr) = child.stderr.take() {
            if let Err(e) = count_progress(stderr, on_progress) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(EncodeError::Io(e));
            }
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(EncodeError::ProcessFailed(status));
        }

        read_artifacts(workdir, rasters.len())
    }
}

/// Tick once for every progress line in the encoder's diagnostic output
fn count_progress(output: impl Read, on_progress: &mut dyn FnMut()) -> io::Result<()> {
    for line in BufReader::new(output).split(b'\n') {
        let line = line?;
        if line.starts_with(PROGRESS_TOKEN.as_bytes()) {
            on_progress();
        } else {
            log::trace!("jbig2: {}", String::from_utf8_lossy(&line).trim_end());
        }
    }
    Ok(())
}

/// Name of the fragment file for the `index`-th submitted raster
pub fn fragment_file_name(index: usize) -> String {
    format!("{FRAGMENT_PREFIX}.{index:04}")
}

/// Read the symbol dictionary and `count` fragments written in `workdir`.
pub fn read_artifacts(workdir: &Path, count: usize) -> Result<EncodedChunk, EncodeError> {
    let globals = read_artifact(&workdir.join(SYMBOL_FILE))?;
    let fragments = (0..count)
        .map(|i| read_artifact(&workdir.join(fragment_file_name(i))))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(EncodedChunk { globals, fragments })
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, EncodeError> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => EncodeError::MissingArtifact(path.to_path_buf()),
        _ => EncodeError::Io(e),
    })
}
