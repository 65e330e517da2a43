use thiserror::Error;

/// Errors surfaced by a single conversion attempt.
///
/// Nothing here is fatal to the process: every variant is recovered at the
/// UI (or CLI) boundary and reported as a user-visible message.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Decode failure or unreadable image file.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Out-of-range scale, palette shorter than 2 characters, bad crop.
    /// Rejected before the pipeline runs.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// File write failure on save/export. Does not affect the in-memory
    /// artifact.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
