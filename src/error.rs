use std::path::PathBuf;

use lopdf::ObjectId;
use thiserror::Error;

/// Problems with user-supplied settings, detected before the PDF is opened.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JBIG2 similarity threshold must be between {min} and {max}, got {value}")]
    ThresholdOutOfRange { value: f32, min: f32, max: f32 },

    #[error("Chunk size must be at least 1")]
    InvalidChunkSize,

    #[error("{0} executable not found. See https://ocrmypdf.readthedocs.io/en/latest/jbig2.html")]
    EncoderNotFound(String),

    #[error("Input does not exist: {0}")]
    InputNotFound(PathBuf),
}

/// Reasons an object is skipped while scanning for images.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Missing or malformed /{0}")]
    BadKey(&'static str),

    #[error("Unsupported image: {0}")]
    Unsupported(String),

    #[error("Failed to decode image data: {0}")]
    Decode(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Encoder exited with {0}")]
    ProcessFailed(std::process::ExitStatus),

    #[error("Missing encoder output {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("Expected {expected} fragments, encoder produced {found}")]
    FragmentCount { expected: usize, found: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal errors that abort an optimize run.
#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to open PDF: {0}")]
    Load(#[source] lopdf::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Chunk {chunk} failed: {source}")]
    Chunk {
        chunk: usize,
        #[source]
        source: EncodeError,
    },

    #[error("Object {} {} was already spliced", .0.0, .0.1)]
    AlreadySpliced(ObjectId),

    #[error("Linearization failed: {0}")]
    Linearize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
