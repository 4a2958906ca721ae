//! Result rendering: human text and machine-readable JSON.
//!
//! The text strings are a compatibility surface; scripts match on them
//! verbatim, so wording changes are breaking changes.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use dextent_core::{DetectResult, Detection, ScanReport, detect};

/// One file in JSON output. Exactly one of `extensions`/`error` is set.
#[derive(Serialize)]
struct FileEntry {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ScanOutput {
    directory: String,
    files: Vec<FileEntry>,
    scanned: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    scan_time_ms: Option<u64>,
}

impl FileEntry {
    fn from_outcome(file: String, outcome: &DetectResult<Detection>) -> Self {
        match outcome {
            Ok(detection) => Self {
                file,
                extensions: Some(known_extensions(detection)),
                source: Some(if detection.from_signature() {
                    "signature"
                } else {
                    "filename"
                }),
                error: None,
            },
            Err(err) => Self {
                file,
                extensions: None,
                source: None,
                error: Some(err.to_string()),
            },
        }
    }
}

pub fn print_file_text(path: &Path) {
    match detect(path) {
        Ok(detection) => print_detection(&detection),
        Err(err) => {
            println!("{}", format!("Error analyzing file: {err}").red());
            println!("Could not determine file type");
        }
    }
}

fn print_detection(detection: &Detection) {
    let known = known_extensions(detection);
    match known.as_slice() {
        [] => println!("Could not determine file type"),
        [ext] => println!("The file's original extension is {ext}"),
        _ => {
            println!(
                "{}",
                "Ambiguity detected. Possible original extensions: ".yellow()
            );
            println!("{}", known.join(", "));
        }
    }
}

pub fn print_file_json(path: &Path) {
    let outcome = detect(path);
    let entry = FileEntry::from_outcome(path.display().to_string(), &outcome);
    print_json(&entry);
}

pub fn print_scan_text(report: &ScanReport) {
    if report.is_empty() {
        println!("no files to analyze");
        return;
    }

    for file in &report.files {
        match &file.outcome {
            Ok(detection) => {
                let known = known_extensions(detection);
                if known.is_empty() {
                    println!("{}: unknown", file.name);
                } else {
                    println!("{}: {}", file.name, known.join(", "));
                }
            }
            Err(err) => println!("{}: {}", file.name, err.to_string().red()),
        }
    }
}

pub fn print_scan_json(dir: &Path, report: &ScanReport) {
    let files: Vec<FileEntry> = report
        .files
        .iter()
        .map(|f| FileEntry::from_outcome(f.name.clone(), &f.outcome))
        .collect();

    let output = ScanOutput {
        directory: dir.display().to_string(),
        scanned: files.len(),
        files,
        scan_time_ms: report.scan_time_ms,
    };
    print_json(&output);
}

/// Extensions worth reporting: the empty "no conventional suffix" entry
/// renders as unknown, not as an extension.
fn known_extensions(detection: &Detection) -> Vec<String> {
    detection
        .extensions()
        .into_iter()
        .filter(|ext| !ext.is_empty())
        .map(String::from)
        .collect()
}

fn print_json(value: &impl Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize output: {err}"),
    }
}
