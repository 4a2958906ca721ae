//! Directory scanning: per-file resolution with failure isolation.
//!
//! A scan enumerates the regular files directly inside one directory and
//! resolves each of them independently. One unreadable file never aborts
//! the rest of the batch; only directory-level enumeration failures do.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::{DetectError, DetectResult};
use crate::matcher::{MagicMatcher, SignatureMatcher};
use crate::resolver::{Detection, detect_with_matcher};

/// Outcome for one file inside a scanned directory.
#[derive(Debug)]
pub struct FileReport {
    /// File name relative to the scanned directory.
    pub name: String,
    /// Resolution verdict, or the per-file failure that was isolated.
    pub outcome: DetectResult<Detection>,
}

/// Result of scanning a directory, in enumeration order.
///
/// An empty report (the directory held no regular files) is a distinct,
/// non-failure state; check [`is_empty`](Self::is_empty).
#[derive(Debug, Default)]
pub struct ScanReport {
    pub files: Vec<FileReport>,
    /// Wall-clock time spent scanning, in milliseconds.
    pub scan_time_ms: Option<u64>,
}

impl ScanReport {
    pub fn new(files: Vec<FileReport>) -> Self {
        Self {
            files,
            scan_time_ms: None,
        }
    }

    /// Set the wall-clock scan time (builder pattern).
    pub fn with_timing(mut self, ms: u64) -> Self {
        self.scan_time_ms = Some(ms);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files that resolved to a verdict (including name fallbacks).
    pub fn resolved_count(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_ok()).count()
    }

    /// Files whose resolution failed.
    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_err()).count()
    }
}

/// Scan a directory with the built-in matcher.
pub fn scan_directory(path: &Path) -> DetectResult<ScanReport> {
    scan_directory_with_matcher(path, &MagicMatcher)
}

/// Scan a directory with a caller-supplied matcher.
///
/// Only direct children that are regular files are analyzed; symlinks are
/// followed, so a link to a regular file counts. Enumeration order is
/// preserved as the filesystem yields it.
pub fn scan_directory_with_matcher(
    path: &Path,
    matcher: &dyn SignatureMatcher,
) -> DetectResult<ScanReport> {
    let started = Instant::now();
    let entries = list_regular_files(path)?;
    let files = resolve_all(&entries, matcher);

    let report = ScanReport::new(files).with_timing(started.elapsed().as_millis() as u64);
    debug!(
        "scanned {}: {} resolved, {} failed",
        path.display(),
        report.resolved_count(),
        report.failed_count()
    );
    Ok(report)
}

fn list_regular_files(dir: &Path) -> DetectResult<Vec<(String, PathBuf)>> {
    let read_dir = fs::read_dir(dir).map_err(|e| DetectError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| DetectError::ReadDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
        if !is_regular_file(&entry) {
            debug!("skipping non-regular entry {}", entry.path().display());
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        files.push((name, entry.path()));
    }
    Ok(files)
}

/// Follows symlinks, so a link to a regular file is treated as that file.
/// Entries that vanish before they can be stat'ed are skipped.
fn is_regular_file(entry: &fs::DirEntry) -> bool {
    let Ok(file_type) = entry.file_type() else {
        return false;
    };
    if file_type.is_symlink() {
        return fs::metadata(entry.path())
            .map(|meta| meta.is_file())
            .unwrap_or(false);
    }
    file_type.is_file()
}

#[cfg(feature = "parallel")]
fn resolve_all(entries: &[(String, PathBuf)], matcher: &dyn SignatureMatcher) -> Vec<FileReport> {
    use rayon::prelude::*;

    // Indexed parallel iteration keeps enumeration order in the output.
    entries
        .par_iter()
        .map(|(name, path)| resolve_entry(name, path, matcher))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn resolve_all(entries: &[(String, PathBuf)], matcher: &dyn SignatureMatcher) -> Vec<FileReport> {
    entries
        .iter()
        .map(|(name, path)| resolve_entry(name, path, matcher))
        .collect()
}

fn resolve_entry(name: &str, path: &Path, matcher: &dyn SignatureMatcher) -> FileReport {
    let outcome = detect_with_matcher(path, matcher);
    if let Err(err) = &outcome {
        warn!("failed to analyze {}: {}", path.display(), err);
    }
    FileReport {
        name: name.to_string(),
        outcome,
    }
}
