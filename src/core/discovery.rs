// mailsift - core/discovery.rs
//
// Recursive directory traversal and source file discovery.
//
// Architecture note: this module uses `walkdir` for directory traversal as
// an OS abstraction (similar to using std::path::Path). It reads only file
// *metadata* (size, mtime, extension), never file *contents* -- that
// boundary is owned by the app layer (app::pipeline).
//
//   - Per-file I/O errors are non-fatal and collected as warnings.
//   - max_files is enforced with an explicit named-constant upper bound.
//   - Exclude patterns short-circuit directory descent via filter_entry so
//     excluded subtrees (e.g. node_modules/) are never traversed at all.

use crate::core::model::{DiscoveredFile, SourceFormat};
use crate::util::error::{DiscoveryError, ReadError};
use chrono::{DateTime, Utc};
use std::path::Path;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a discovery operation.
///
/// All limits reference named constants from `util::constants` so they are
/// auditable in a single place.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum directory recursion depth.
    pub max_depth: usize,

    /// Maximum number of matching files to return before stopping.
    pub max_files: usize,

    /// Glob patterns (filename-only) that a file MUST match to be included.
    /// An empty list means "include everything that is not excluded".
    pub include_patterns: Vec<String>,

    /// Glob patterns matched against filenames AND directory component names.
    /// Matching files are skipped; matching directories are not descended into.
    pub exclude_patterns: Vec<String>,

    /// File size (bytes) above which the `is_large` flag is set and the
    /// reader switches to memory mapping.
    pub large_file_threshold: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            max_files: constants::DEFAULT_MAX_FILES,
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            exclude_patterns: constants::DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            large_file_threshold: constants::DEFAULT_LARGE_FILE_THRESHOLD,
        }
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// Discover source files under `root`, applying include/exclude globs.
///
/// Traversal order is sorted by file name so a batch over the same tree is
/// reproducible.
///
/// # Non-fatal errors
/// Files/directories that cannot be accessed due to permission or I/O
/// errors are recorded as human-readable strings in the returned warnings
/// vector and do NOT cause the function to return `Err`.
///
/// # Fatal errors
/// Returns `Err` only if the root path is invalid (`RootNotFound`,
/// `PermissionDenied`) or the file cap is hit (`MaxFilesExceeded`).
pub fn discover_files(
    root: &Path,
    config: &DiscoveryConfig,
) -> Result<(Vec<DiscoveredFile>, Vec<String>), DiscoveryError> {
    // Pre-flight: fs::metadata rather than Path::exists(), because exists()
    // maps ALL errors -- including PermissionDenied -- to false, making an
    // access-denied root indistinguishable from a missing one.
    if let Err(e) = std::fs::metadata(root) {
        return Err(match e.kind() {
            std::io::ErrorKind::PermissionDenied => DiscoveryError::PermissionDenied {
                path: root.to_path_buf(),
                source: e,
            },
            _ => DiscoveryError::RootNotFound {
                path: root.to_path_buf(),
            },
        });
    }

    let mut warnings: Vec<String> = Vec::new();

    let include = compile_patterns(&config.include_patterns, "include", &mut warnings);
    let exclude = compile_patterns(&config.exclude_patterns, "exclude", &mut warnings);

    let mut files: Vec<DiscoveredFile> = Vec::new();

    let walker = walkdir::WalkDir::new(root)
        .max_depth(config.max_depth)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !matches_any(entry.file_name().to_string_lossy().as_ref(), &exclude));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                warnings.push(format!("Cannot access '{}': {e}", path.display()));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if !include.is_empty() && !matches_any(file_name.as_ref(), &include) {
            continue;
        }

        // Only extensions with a known source format are processable;
        // anything else slipping through a custom include pattern is noted
        // rather than silently dropped.
        let Some(format) = format_for_path(entry.path()) else {
            warnings.push(format!(
                "'{}': unsupported extension, file skipped",
                entry.path().display()
            ));
            continue;
        };

        if files.len() >= config.max_files {
            return Err(DiscoveryError::MaxFilesExceeded {
                max: config.max_files,
            });
        }

        match entry.metadata() {
            Ok(meta) => {
                let size = meta.len();
                files.push(DiscoveredFile {
                    path: entry.path().to_path_buf(),
                    size,
                    modified: meta.modified().ok().map(DateTime::<Utc>::from),
                    format,
                    is_large: size > config.large_file_threshold,
                });
            }
            Err(e) => {
                warnings.push(format!(
                    "Cannot read metadata for '{}': {e}",
                    entry.path().display()
                ));
            }
        }
    }

    tracing::debug!(
        root = %root.display(),
        files = files.len(),
        warnings = warnings.len(),
        "Discovery complete"
    );

    Ok((files, warnings))
}

/// Build a `DiscoveredFile` for an explicitly-named input file.
///
/// Unlike directory discovery, naming a file with an unsupported extension
/// is an error the user should see, not a silent skip.
pub fn inspect_file(path: &Path, config: &DiscoveryConfig) -> Result<DiscoveredFile, ReadError> {
    let Some(format) = format_for_path(path) else {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Err(ReadError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        });
    };

    let meta = std::fs::metadata(path).map_err(|e| ReadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let size = meta.len();
    Ok(DiscoveredFile {
        path: path.to_path_buf(),
        size,
        modified: meta.modified().ok().map(DateTime::<Utc>::from),
        format,
        is_large: size > config.large_file_threshold,
    })
}

// =============================================================================
// Helpers
// =============================================================================

/// Source format for a path, by (case-insensitive) extension.
fn format_for_path(path: &Path) -> Option<SourceFormat> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(SourceFormat::from_extension)
}

/// Compile glob patterns, recording invalid ones as warnings.
fn compile_patterns(
    patterns: &[String],
    kind: &str,
    warnings: &mut Vec<String>,
) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|raw| match glob::Pattern::new(raw) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warnings.push(format!("Invalid {kind} pattern '{raw}': {e}"));
                None
            }
        })
        .collect()
}

/// Case-insensitive filename match against a compiled pattern list.
fn matches_any(name: &str, patterns: &[glob::Pattern]) -> bool {
    let lower = name.to_ascii_lowercase();
    patterns.iter().any(|p| p.matches(&lower))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discovers_supported_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::write(root.join("notes.txt"), "a@b.com").unwrap();
        fs::write(root.join("report.PDF"), b"%PDF-1.4").unwrap();
        fs::write(root.join("image.png"), b"\x89PNG").unwrap();

        let (files, warnings) = discover_files(root, &DiscoveryConfig::default()).unwrap();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["notes.txt", "report.PDF"]);
        assert_eq!(files[0].format, SourceFormat::PlainText);
        assert_eq!(files[1].format, SourceFormat::Pdf);
    }

    #[test]
    fn test_nonexistent_root_returns_error() {
        let result = discover_files(
            Path::new("/nonexistent/mailsift-test-path"),
            &DiscoveryConfig::default(),
        );
        assert!(
            matches!(result, Err(DiscoveryError::RootNotFound { .. })),
            "expected RootNotFound, got {result:?}"
        );
    }

    #[test]
    fn test_max_files_exceeded_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.txt"), "x").unwrap();
        fs::write(dir.path().join("two.txt"), "y").unwrap();

        let config = DiscoveryConfig {
            max_files: 1,
            ..Default::default()
        };
        let result = discover_files(dir.path(), &config);
        assert!(
            matches!(result, Err(DiscoveryError::MaxFilesExceeded { max: 1 })),
            "expected MaxFilesExceeded, got {result:?}"
        );
    }

    #[test]
    fn test_excluded_directory_is_not_descended() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::write(root.join("keep.txt"), "x").unwrap();
        let excluded = root.join("node_modules");
        fs::create_dir(&excluded).unwrap();
        fs::write(excluded.join("dep.txt"), "y").unwrap();

        let (files, _) = discover_files(root, &DiscoveryConfig::default()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("keep.txt"));
    }

    #[test]
    fn test_large_flag_follows_threshold() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("big.txt"), vec![b'x'; 2048]).unwrap();

        let config = DiscoveryConfig {
            large_file_threshold: 1024,
            ..Default::default()
        };
        let (files, _) = discover_files(dir.path(), &config).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].is_large);
    }

    #[test]
    fn test_inspect_file_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.docx");
        fs::write(&path, "x").unwrap();

        let result = inspect_file(&path, &DiscoveryConfig::default());
        assert!(
            matches!(result, Err(ReadError::UnsupportedFormat { .. })),
            "expected UnsupportedFormat, got {result:?}"
        );
    }

    #[test]
    fn test_inspect_file_accepts_txt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt");
        fs::write(&path, "a@b.com").unwrap();

        let file = inspect_file(&path, &DiscoveryConfig::default()).unwrap();
        assert_eq!(file.format, SourceFormat::PlainText);
        assert_eq!(file.size, 7);
    }
}
