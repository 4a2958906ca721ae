//! Error types shared by the matcher, resolver and scanner.

use std::path::PathBuf;
use thiserror::Error;

pub type DetectResult<T> = Result<T, DetectError>;

/// Detection errors.
///
/// Failures scoped to a single file (`TooSmall`, `Read`, `Other`) are
/// absorbed at that file's boundary during a batch scan; `ReadDir` aborts
/// the whole scan.
#[derive(Error, Debug)]
pub enum DetectError {
    /// The matcher needs at least one byte to work with.
    ///
    /// The message is a compatibility contract: callers and tests match on
    /// it verbatim.
    #[error("file must be at least 1 byte in size")]
    TooSmall,

    #[error("Failed to read file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read directory: {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Escape hatch for custom [`SignatureMatcher`](crate::SignatureMatcher)
    /// implementations.
    #[error(transparent)]
    Other(anyhow::Error),
}
