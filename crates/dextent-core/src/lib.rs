//! # dextent-core
//!
//! Detection engine for recovering a file's original extension from its
//! magic number instead of trusting its name.
//!
//! The pipeline has three layers:
//! - [`SignatureMatcher`]: sniffs a file's bytes into confidence-ranked
//!   extension candidates (built-in: [`MagicMatcher`]).
//! - [`detect`]: reduces candidates to a [`Detection`] — every extension
//!   tied at the top confidence, or the file name's own suffix when no
//!   signature matched.
//! - [`scan_directory`]: applies detection to every regular file directly
//!   inside a directory, isolating per-file failures.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let detection = dextent_core::detect(Path::new("download.bin"))?;
//! if detection.is_ambiguous() {
//!     println!("could be any of: {}", detection.extensions().join(", "));
//! }
//! # Ok::<(), dextent_core::DetectError>(())
//! ```

pub mod error;
pub mod matcher;
pub mod resolver;
pub mod scanner;
mod signatures;

pub use error::{DetectError, DetectResult};
pub use matcher::{Candidate, MagicMatcher, SignatureMatcher};
pub use resolver::{Detection, detect, detect_with_matcher};
pub use scanner::{FileReport, ScanReport, scan_directory, scan_directory_with_matcher};
