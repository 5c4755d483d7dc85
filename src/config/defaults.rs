/// Default JBIG2 similarity threshold
pub const DEFAULT_THRESHOLD: f32 = 0.8;

/// Lowest accepted similarity threshold
pub const MIN_THRESHOLD: f32 = 0.4;

/// Highest accepted similarity threshold
pub const MAX_THRESHOLD: f32 = 0.97;

/// Thresholds at or below this value risk visible symbol substitution
pub const SUBSTITUTION_WARNING_THRESHOLD: f32 = 0.8;

/// Default number of images sharing one symbol dictionary
pub const DEFAULT_CHUNK_SIZE: usize = 128;

/// Name of the JBIG2 encoder executable (jbig2enc)
pub const DEFAULT_ENCODER: &str = "jbig2";

/// Name of the executable used to linearize the saved PDF
pub const LINEARIZER: &str = "qpdf";

/// Encoder diagnostic lines starting with this token mark one finished image
pub const PROGRESS_TOKEN: &str = "thresholded";

/// Shared symbol dictionary written by the encoder in symbol mode
pub const SYMBOL_FILE: &str = "output.sym";

/// Prefix of per-image fragment files (`output.0000`, `output.0001`, ...)
pub const FRAGMENT_PREFIX: &str = "output";


/// Largest packed raster accepted from an image dictionary (256 MiB)
pub const MAX_RASTER_BYTES: usize = 256 * 1024 * 1024;
