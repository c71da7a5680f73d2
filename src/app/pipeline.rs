// mailsift - app/pipeline.rs
//
// Batch lifecycle: read every discovered file, extract per file, merge,
// deduplicate, classify, summarise.
//
// Architecture:
//   - Per-file reading + extraction runs on the rayon pool; the indexed
//     collect keeps results in input order, so the merged address stream
//     (and therefore the final EmailGroups) is deterministic regardless
//     of scheduling.
//   - All per-file errors are non-fatal; the batch continues to the next
//     file and the failure is surfaced as a warning.
//   - Transient I/O errors are retried with capped backoff.

use crate::core::classify::classify;
use crate::core::extract::{dedup_emails, extract_emails};
use crate::core::model::{
    BatchSummary, DiscoveredFile, EmailAddress, EmailGroups, FileReport, SourceFormat,
};
use crate::util::error::ReadError;
use rayon::prelude::*;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

/// Retry limits for transient I/O errors.
const MAX_RETRIES: u32 = 3;
const RETRY_DELAYS_MS: [u64; 3] = [50, 100, 200];

/// Outcome of one batch run.
#[derive(Debug)]
pub struct BatchResult {
    /// The classified result, ready for export.
    pub groups: EmailGroups,

    /// Batch statistics for the summary printer.
    pub summary: BatchSummary,

    /// Non-fatal per-file problems, in input order.
    pub warnings: Vec<String>,
}

/// Run the full pipeline over `files`:
/// read → extract (parallel) → merge → dedup → classify.
pub fn run_batch(files: &[DiscoveredFile]) -> BatchResult {
    let start = Instant::now();

    // Extraction is CPU-only string scanning once the bytes are in memory,
    // so one task per file parallelises cleanly. Collect is index-ordered.
    let per_file: Vec<Result<Vec<EmailAddress>, ReadError>> = files
        .par_iter()
        .map(|file| {
            read_source(file).map(|content| {
                let found = extract_emails(&content);
                tracing::debug!(
                    file = %file.path.display(),
                    matches = found.len(),
                    "File extracted"
                );
                found
            })
        })
        .collect();

    // Sequential merge in input order keeps first-occurrence dedup stable.
    let mut all_matches: Vec<EmailAddress> = Vec::new();
    let mut file_reports: Vec<FileReport> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut files_with_errors = 0usize;

    for (file, outcome) in files.iter().zip(per_file) {
        match outcome {
            Ok(found) => {
                file_reports.push(FileReport {
                    path: file.path.clone(),
                    matches: found.len(),
                });
                all_matches.extend(found);
            }
            Err(e) => {
                files_with_errors += 1;
                tracing::warn!(error = %e, "File read failed");
                warnings.push(e.to_string());
            }
        }
    }

    let total_matches = all_matches.len();
    let unique = dedup_emails(all_matches);
    let groups = classify(&unique);

    let summary = BatchSummary {
        files_processed: files.len(),
        files_with_errors,
        total_matches,
        unique_addresses: unique.len(),
        file_reports,
        duration: start.elapsed(),
    };

    tracing::info!(
        files = summary.files_processed,
        errors = summary.files_with_errors,
        matches = summary.total_matches,
        unique = summary.unique_addresses,
        "Batch complete"
    );

    BatchResult {
        groups,
        summary,
        warnings,
    }
}

// =============================================================================
// File reading
// =============================================================================

/// Read one source file into the string form the extractor consumes.
///
/// Plain text is decoded lossily so a stray non-UTF-8 byte never sinks the
/// file. PDF gets the same lossy byte decode on purpose: addresses that
/// appear literally in uncompressed content surface, and anything inside
/// compressed streams is out of contract (there is no real PDF text
/// extraction here).
fn read_source(file: &DiscoveredFile) -> Result<String, ReadError> {
    let bytes = read_bytes(&file.path, file.is_large).map_err(|e| ReadError::Io {
        path: file.path.clone(),
        source: e,
    })?;

    match file.format {
        SourceFormat::PlainText => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        SourceFormat::Pdf => {
            tracing::debug!(
                file = %file.path.display(),
                bytes = bytes.len(),
                "Scanning PDF bytes without text extraction"
            );
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// Read the raw bytes of a file.
///
/// For large files, uses `memmap2` which avoids copying the entire file
/// into heap memory twice. Small files use `fs::read` with retry for
/// transient I/O errors.
fn read_bytes(path: &Path, is_large: bool) -> io::Result<Vec<u8>> {
    if is_large {
        read_large_file(path)
    } else {
        read_small_file_with_retry(path)
    }
}

/// Read using `memmap2` for large files.
fn read_large_file(path: &Path) -> io::Result<Vec<u8>> {
    let file = std::fs::File::open(path)?;
    // SAFETY: the file is read-only and we do not mutate the map. External
    // modification during the map's lifetime is an accepted risk for a tool
    // reading already-written input files.
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    Ok(mmap.to_vec())
}

/// Read a small file with transient-error retries.
fn read_small_file_with_retry(path: &Path) -> io::Result<Vec<u8>> {
    let mut last_err: Option<io::Error> = None;

    for attempt in 0..MAX_RETRIES {
        match std::fs::read(path) {
            Ok(bytes) => return Ok(bytes),
            Err(e) if is_transient_error(&e) => {
                tracing::debug!(
                    file = %path.display(),
                    attempt = attempt + 1,
                    error = %e,
                    "Transient I/O error, retrying"
                );
                std::thread::sleep(Duration::from_millis(RETRY_DELAYS_MS[attempt as usize]));
                last_err = Some(e);
            }
            Err(e) => return Err(e), // Permanent error; do not retry.
        }
    }

    Err(last_err.unwrap_or_else(|| io::Error::other("Unknown read error")))
}

/// Returns true for transient I/O errors that are worth retrying.
fn is_transient_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::discovery::{discover_files, DiscoveryConfig};
    use crate::core::model::Category;
    use std::fs;

    fn discovered(dir: &Path) -> Vec<DiscoveredFile> {
        let (files, warnings) = discover_files(dir, &DiscoveryConfig::default()).unwrap();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        files
    }

    #[test]
    fn test_batch_merges_and_dedups_across_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a.txt"),
            "x@gmail.com appears here, also b@mycompany.io",
        )
        .unwrap();
        fs::write(
            dir.path().join("b.txt"),
            "x@gmail.com again, plus a@university.edu",
        )
        .unwrap();

        let result = run_batch(&discovered(dir.path()));

        assert_eq!(result.summary.files_processed, 2);
        assert_eq!(result.summary.total_matches, 4);
        assert_eq!(result.summary.unique_addresses, 3);
        assert_eq!(result.groups.count(Category::Personal), 1);
        assert_eq!(result.groups.count(Category::Corporate), 1);
        assert_eq!(result.groups.count(Category::Educational), 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_pdf_bytes_yield_literal_addresses() {
        let dir = tempfile::tempdir().unwrap();
        // Email sits literally between binary-ish PDF syntax.
        let mut bytes = b"%PDF-1.4\n1 0 obj\n<< /Contents (reach me at ops@acme.io) >>\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, 0x00]);
        fs::write(dir.path().join("doc.pdf"), bytes).unwrap();

        let result = run_batch(&discovered(dir.path()));
        assert!(result.groups.corporate.contains_key("acme.io"));
    }

    #[test]
    fn test_missing_file_is_nonfatal_warning() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.txt"), "c@d.org").unwrap();

        let mut files = discovered(dir.path());
        files.push(DiscoveredFile {
            path: dir.path().join("vanished.txt"),
            size: 0,
            modified: None,
            format: SourceFormat::PlainText,
            is_large: false,
        });

        let result = run_batch(&files);
        assert_eq!(result.summary.files_with_errors, 1);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.summary.unique_addresses, 1);
    }

    #[test]
    fn test_empty_batch() {
        let result = run_batch(&[]);
        assert!(result.groups.is_empty());
        assert_eq!(result.summary.files_processed, 0);
        assert_eq!(result.summary.total_matches, 0);
    }

    #[test]
    fn test_report_order_matches_input_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "one@x.com two@x.com").unwrap();
        fs::write(dir.path().join("b.txt"), "three@x.com").unwrap();

        let result = run_batch(&discovered(dir.path()));
        let reports: Vec<(String, usize)> = result
            .summary
            .file_reports
            .iter()
            .map(|r| {
                (
                    r.path.file_name().unwrap().to_str().unwrap().to_string(),
                    r.matches,
                )
            })
            .collect();
        assert_eq!(
            reports,
            vec![("a.txt".to_string(), 2), ("b.txt".to_string(), 1)]
        );
    }
}
