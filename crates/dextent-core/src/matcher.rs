//! Signature matching: the sniffing contract and its built-in implementation.
//!
//! [`SignatureMatcher`] abstracts the byte-sniffing step so the resolver and
//! scanner can be driven by canned matchers in tests, or by an alternative
//! signature source without touching the resolution logic.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{DetectError, DetectResult};
use crate::signatures::{MAX_HEADER_LEN, SIGNATURES};

/// Patterns this long are specific enough to outrank the common short ones.
const STRONG_MAGIC_LEN: usize = 9;
const CONFIDENCE_STRONG: f32 = 0.9;
const CONFIDENCE_NORMAL: f32 = 0.8;

/// A single (extension, confidence) match reported by a matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Extension with its leading dot, or empty when the format has none.
    pub extension: String,
    /// Match strength; equal values mean genuine ambiguity.
    pub confidence: f32,
}

impl Candidate {
    pub fn new(extension: impl Into<String>, confidence: f32) -> Self {
        Self {
            extension: extension.into(),
            confidence,
        }
    }
}

/// A source of signature matches for a file.
///
/// Implementors read the file at `path` and report every signature it
/// carries, ordered by descending confidence. An empty vector means "no
/// signature recognized" and is not an error; failures are reserved for
/// unreadable or sub-minimum-size input.
///
/// # Object Safety
///
/// The trait is object-safe so callers can hold `&dyn SignatureMatcher`,
/// and `Send + Sync` so one matcher can serve a parallel scan.
pub trait SignatureMatcher: Send + Sync {
    /// Sniff `path` and return candidates in descending confidence order.
    fn sniff(&self, path: &Path) -> DetectResult<Vec<Candidate>>;

    /// Human-readable name for this matcher (used in logging).
    ///
    /// Defaults to the short (unqualified) type name.
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

/// Built-in matcher backed by the curated signature table.
///
/// Confidence scoring is length-based: long patterns score
/// [`CONFIDENCE_STRONG`], everything else [`CONFIDENCE_NORMAL`]. Equal
/// scores are genuine ambiguity for the resolver to report.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicMatcher;

impl MagicMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureMatcher for MagicMatcher {
    fn sniff(&self, path: &Path) -> DetectResult<Vec<Candidate>> {
        let header = read_header(path)?;
        if header.is_empty() {
            return Err(DetectError::TooSmall);
        }

        let mut candidates: Vec<Candidate> = SIGNATURES
            .iter()
            .filter(|sig| sig.matches(&header))
            .inspect(|sig| debug!("{}: {}", path.display(), sig.description))
            .map(|sig| Candidate::new(sig.extension, confidence_for(sig.magic.len())))
            .collect();

        // Stable sort: table order breaks ties within a confidence band.
        candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        Ok(candidates)
    }

    fn name(&self) -> &str {
        "MagicMatcher"
    }
}

const fn confidence_for(magic_len: usize) -> f32 {
    if magic_len >= STRONG_MAGIC_LEN {
        CONFIDENCE_STRONG
    } else {
        CONFIDENCE_NORMAL
    }
}

/// Read at most [`MAX_HEADER_LEN`] bytes; shorter files yield what they have.
fn read_header(path: &Path) -> DetectResult<Vec<u8>> {
    let file = File::open(path).map_err(|e| DetectError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut header = Vec::with_capacity(MAX_HEADER_LEN);
    file.take(MAX_HEADER_LEN as u64)
        .read_to_end(&mut header)
        .map_err(|e| DetectError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(header)
}
