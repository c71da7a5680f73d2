// mailsift - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "mailsift";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "mailsift";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Extraction
// =============================================================================

/// Pattern matched against file content to find email-like substrings.
///
/// Best-effort heuristic: local part `[A-Za-z0-9._-]+`, domain
/// `[A-Za-z0-9.-]+` ending in a 2-6 letter TLD. Deliberately not an
/// RFC 5321 validator -- no quoting rules, no IDN, no length limits.
pub const EMAIL_PATTERN: &str = r"[A-Za-z0-9._-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,6}";

// =============================================================================
// Classification tables
// =============================================================================

/// Consumer webmail domains. An exact (lowercased) domain match lands the
/// address in the personal group before any other rule runs.
pub const PERSONAL_DOMAINS: &[&str] = &[
    "gmail.com",
    "hotmail.com",
    "yahoo.com",
    "outlook.com",
    "icloud.com",
    "aol.com",
    "protonmail.com",
    "mail.com",
    "zoho.com",
    "yandex.com",
];

/// Substrings that mark a domain as educational (`.edu`, `.ac.`, `.edu.`).
///
/// Containment, not suffix match -- `xyz.eduardo.com` matches `.edu`.
/// Known imprecision, kept as-is.
pub const EDUCATIONAL_MARKERS: &[&str] = &[".edu", ".ac.", ".edu."];

// =============================================================================
// Discovery limits
// =============================================================================

/// Maximum directory recursion depth during discovery.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Minimum sensible value for the max-files limit.
pub const MIN_MAX_FILES: usize = 1;

/// Maximum number of files to discover in a single scan.
pub const DEFAULT_MAX_FILES: usize = 500;

/// Hard upper bound on max files (prevents configuration mistakes).
pub const ABSOLUTE_MAX_FILES: usize = 10_000;

/// Hard upper bound on max depth (prevents infinite traversal).
pub const ABSOLUTE_MAX_DEPTH: usize = 50;

/// File size in bytes above which the reader switches to memory mapping.
pub const DEFAULT_LARGE_FILE_THRESHOLD: u64 = 32 * 1024 * 1024; // 32 MB

/// Minimum user-configurable large-file threshold.
pub const MIN_LARGE_FILE_THRESHOLD: u64 = 64 * 1024; // 64 KB

/// Maximum user-configurable large-file threshold.
pub const MAX_LARGE_FILE_THRESHOLD: u64 = 1024 * 1024 * 1024; // 1 GB

// =============================================================================
// File discovery patterns
// =============================================================================

/// Default include glob patterns for source file discovery.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.txt", "*.pdf"];

/// Default exclude glob patterns for source file discovery.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "*.gz",
    "*.zip",
    "*.bak",
    "*.tmp",
    "node_modules",
    ".git",
    "__pycache__",
];

// =============================================================================
// Export
// =============================================================================

/// Column headers for the per-address CSV export.
pub const CSV_HEADER: &[&str] = &["Category", "Domain", "Email"];

/// Default file-name stem for export files (`emails.csv`, `emails.json`, ...).
pub const DEFAULT_EXPORT_STEM: &str = "emails";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
