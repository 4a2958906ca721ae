//! Extension resolution: reduce raw signature candidates to a verdict.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::error::DetectResult;
use crate::matcher::{MagicMatcher, SignatureMatcher};

/// The resolved verdict for one file.
///
/// `Matched` is a confident detection backed by at least one signature;
/// `NameFallback` means no signature matched and the value is whatever the
/// file name already implied. Callers that care which of the two they got
/// (output formatting, scripting) branch on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Every extension tied at the top confidence, deduplicated. Non-empty.
    Matched(BTreeSet<String>),
    /// The file name's own suffix, dot included; empty when the name has
    /// no suffix.
    NameFallback(String),
}

impl Detection {
    /// All extensions this detection stands for, in deterministic order.
    ///
    /// A fallback with no suffix contributes nothing; a matched set may
    /// still contain the empty string for formats with no conventional
    /// suffix (check [`is_known`](Self::is_known)).
    pub fn extensions(&self) -> Vec<&str> {
        match self {
            Detection::Matched(set) => set.iter().map(String::as_str).collect(),
            Detection::NameFallback(suffix) if suffix.is_empty() => Vec::new(),
            Detection::NameFallback(suffix) => vec![suffix.as_str()],
        }
    }

    /// Whether at least one non-empty extension was determined.
    pub fn is_known(&self) -> bool {
        self.extensions().iter().any(|ext| !ext.is_empty())
    }

    /// Whether several distinct extensions tied for the top confidence.
    pub fn is_ambiguous(&self) -> bool {
        match self {
            Detection::Matched(set) => set.len() > 1,
            Detection::NameFallback(_) => false,
        }
    }

    /// Whether this verdict came from a signature match rather than the
    /// file name.
    pub fn from_signature(&self) -> bool {
        matches!(self, Detection::Matched(_))
    }
}

/// Resolve one file with the built-in matcher.
pub fn detect(path: &Path) -> DetectResult<Detection> {
    detect_with_matcher(path, &MagicMatcher)
}

/// Resolve one file with a caller-supplied matcher.
///
/// Matcher failures propagate untouched; an empty candidate list falls
/// back to the file name's own suffix. Otherwise every candidate tied with
/// the top confidence is collected, deduplicated by extension.
pub fn detect_with_matcher(
    path: &Path,
    matcher: &dyn SignatureMatcher,
) -> DetectResult<Detection> {
    let candidates = matcher.sniff(path)?;

    let Some(first) = candidates.first() else {
        let suffix = name_suffix(path);
        debug!(
            "{} ({}): no signature, name suffix {:?}",
            path.display(),
            matcher.name(),
            suffix
        );
        return Ok(Detection::NameFallback(suffix));
    };

    let best = first.confidence;
    let tied: BTreeSet<String> = candidates
        .iter()
        .filter(|c| c.confidence == best)
        .map(|c| c.extension.clone())
        .collect();

    // A misbehaving matcher (NaN confidence) leaves the band empty.
    if tied.is_empty() {
        return Ok(Detection::NameFallback(name_suffix(path)));
    }

    Ok(Detection::Matched(tied))
}

/// Suffix of the file name itself, dot included (`archive.tar.gz` -> `.gz`).
///
/// Dotfiles and names ending in a dot have no suffix.
fn name_suffix(path: &Path) -> String {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return String::new();
    };
    match name.rfind('.') {
        Some(i) if i > 0 && i < name.len() - 1 => name[i..].to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectError;
    use crate::matcher::mock::{FailingMatcher, StaticMatcher};
    use proptest::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn extensions(detection: &Detection) -> Vec<String> {
        detection
            .extensions()
            .into_iter()
            .map(String::from)
            .collect()
    }

    // ===== Tie-band collection =====

    #[test]
    fn test_unique_top_candidate_is_singleton() {
        let matcher = StaticMatcher::new()
            .with_candidate(".png", 0.8)
            .with_candidate(".bmp", 0.5);

        let detection = detect_with_matcher(Path::new("img"), &matcher).unwrap();
        assert_eq!(extensions(&detection), vec![".png"]);
        assert!(!detection.is_ambiguous());
        assert!(detection.from_signature());
    }

    #[test]
    fn test_tied_candidates_are_all_reported() {
        let matcher = StaticMatcher::new()
            .with_candidate(".docx", 0.8)
            .with_candidate(".zip", 0.8)
            .with_candidate(".jar", 0.3);

        let detection = detect_with_matcher(Path::new("doc"), &matcher).unwrap();
        assert_eq!(extensions(&detection), vec![".docx", ".zip"]);
        assert!(detection.is_ambiguous());
    }

    #[test]
    fn test_lower_confidence_candidates_are_discarded() {
        let matcher = StaticMatcher::new()
            .with_candidate(".sqlite", 0.9)
            .with_candidate(".tar", 0.8)
            .with_candidate(".exe", 0.8);

        let detection = detect_with_matcher(Path::new("db"), &matcher).unwrap();
        assert_eq!(extensions(&detection), vec![".sqlite"]);
    }

    #[test]
    fn test_duplicate_extensions_collapse() {
        let matcher = StaticMatcher::new()
            .with_candidate(".jpg", 0.8)
            .with_candidate(".jpg", 0.8);

        let detection = detect_with_matcher(Path::new("photo"), &matcher).unwrap();
        assert_eq!(extensions(&detection), vec![".jpg"]);
        assert!(!detection.is_ambiguous());
    }

    // ===== Name fallback =====

    #[test]
    fn test_no_candidates_falls_back_to_name_suffix() {
        let matcher = StaticMatcher::new();

        let detection = detect_with_matcher(Path::new("notes.txt"), &matcher).unwrap();
        assert_eq!(detection, Detection::NameFallback(".txt".to_string()));
        assert!(!detection.from_signature());
        assert!(detection.is_known());
    }

    #[test]
    fn test_no_candidates_and_no_suffix_is_unknown() {
        let matcher = StaticMatcher::new();

        let detection = detect_with_matcher(Path::new("README"), &matcher).unwrap();
        assert_eq!(detection, Detection::NameFallback(String::new()));
        assert!(!detection.is_known());
        assert!(detection.extensions().is_empty());
    }

    #[test]
    fn test_nan_confidence_falls_back_to_name_suffix() {
        let matcher = StaticMatcher::new().with_candidate(".gif", f32::NAN);

        let detection = detect_with_matcher(Path::new("broken.bin"), &matcher).unwrap();
        assert_eq!(detection, Detection::NameFallback(".bin".to_string()));
    }

    #[test]
    fn test_matched_empty_extension_is_not_known() {
        let matcher = StaticMatcher::new().with_candidate("", 0.8);

        let detection = detect_with_matcher(Path::new("a.out"), &matcher).unwrap();
        assert!(detection.from_signature());
        assert!(!detection.is_known());
        assert_eq!(extensions(&detection), vec![""]);
    }

    // ===== Failure propagation =====

    #[test]
    fn test_matcher_failure_propagates() {
        let matcher = FailingMatcher("sniffing went sideways");

        let err = detect_with_matcher(Path::new("x"), &matcher).unwrap_err();
        assert!(err.to_string().contains("sniffing went sideways"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let temp = TempDir::new().unwrap();
        let err = detect(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, DetectError::Read { .. }));
    }

    // ===== name_suffix() =====

    #[test]
    fn test_name_suffix_plain() {
        assert_eq!(name_suffix(Path::new("photo.txt")), ".txt");
        assert_eq!(name_suffix(Path::new("dir/photo.txt")), ".txt");
    }

    #[test]
    fn test_name_suffix_takes_last_dot() {
        assert_eq!(name_suffix(Path::new("archive.tar.gz")), ".gz");
    }

    #[test]
    fn test_name_suffix_none_for_bare_name() {
        assert_eq!(name_suffix(Path::new("README")), "");
    }

    #[test]
    fn test_name_suffix_none_for_dotfile() {
        assert_eq!(name_suffix(Path::new(".bashrc")), "");
    }

    #[test]
    fn test_name_suffix_none_for_trailing_dot() {
        assert_eq!(name_suffix(Path::new("file.")), "");
    }

    // ===== End-to-end with the builtin matcher =====

    #[test]
    fn test_detect_gif_bytes_with_misleading_name() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("photo.txt");
        fs::write(&path, b"GIF89a\x01\x00\x01\x00").unwrap();

        let detection = detect(&path).unwrap();
        assert_eq!(extensions(&detection), vec![".gif"]);
        assert!(detection.from_signature());
    }

    #[test]
    fn test_detect_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report");
        fs::write(&path, b"PK\x03\x04\x14\x00\x06\x00payload").unwrap();

        let first = detect(&path).unwrap();
        let second = detect(&path).unwrap();
        assert_eq!(first, second);
    }

    // ===== Properties =====

    proptest! {
        #[test]
        fn prop_top_band_survives_any_tail(
            top in proptest::collection::btree_set("[a-z]{1,4}", 1..4),
            tail in proptest::collection::vec("[a-z]{1,4}", 0..6),
        ) {
            let mut matcher = StaticMatcher::new();
            for ext in &top {
                matcher = matcher.with_candidate(&format!(".{ext}"), 0.9);
            }
            for ext in &tail {
                matcher = matcher.with_candidate(&format!(".{ext}"), 0.5);
            }

            let detection = detect_with_matcher(Path::new("sample"), &matcher).unwrap();
            let expected: BTreeSet<String> = top.iter().map(|e| format!(".{e}")).collect();
            prop_assert_eq!(detection, Detection::Matched(expected));
        }

        #[test]
        fn prop_repeated_top_extension_collapses(
            ext in "[a-z]{1,4}",
            copies in 2usize..5,
        ) {
            let dotted = format!(".{ext}");
            let mut matcher = StaticMatcher::new();
            for _ in 0..copies {
                matcher = matcher.with_candidate(&dotted, 0.8);
            }

            let detection = detect_with_matcher(Path::new("sample"), &matcher).unwrap();
            prop_assert_eq!(
                detection,
                Detection::Matched(BTreeSet::from([dotted]))
            );
        }
    }
}
