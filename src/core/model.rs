// mailsift - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// An email address as matched by the extraction pattern.
///
/// Plain string on purpose: the pattern is a heuristic, not a validator,
/// and every consumer treats addresses as opaque text.
pub type EmailAddress = String;

/// Mapping from lowercase domain to the addresses at that domain.
///
/// Address order within a domain is first-seen input order. Domain keys
/// are unique and iterate in lexicographic order, which keeps every
/// export deterministic.
pub type DomainGroup = BTreeMap<String, Vec<EmailAddress>>;

// =============================================================================
// Category
// =============================================================================

/// The four classification buckets, in canonical display/export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Personal,
    Corporate,
    Educational,
    Others,
}

impl Category {
    /// Returns all variants in canonical export order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Personal,
            Category::Corporate,
            Category::Educational,
            Category::Others,
        ]
    }

    /// Human-readable label, also used as the CSV `Category` column value.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Corporate => "Corporate",
            Category::Educational => "Educational",
            Category::Others => "Others",
        }
    }

    /// Inverse of [`label`](Self::label), used when re-reading exported CSV.
    pub fn from_label(label: &str) -> Option<Category> {
        match label {
            "Personal" => Some(Category::Personal),
            "Corporate" => Some(Category::Corporate),
            "Educational" => Some(Category::Educational),
            "Others" => Some(Category::Others),
            _ => None,
        }
    }

    /// Sheet title used by the spreadsheet-style exports.
    pub fn sheet_title(&self) -> &'static str {
        match self {
            Category::Personal => "Personal emails",
            Category::Corporate => "Corporate emails",
            Category::Educational => "Educational emails",
            Category::Others => "Other emails",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// EmailGroups (classification result)
// =============================================================================

/// The four-category classification result.
///
/// Every classified address appears in exactly one group, under exactly one
/// domain key. The `others` group is never populated by the current
/// classification rules but stays a first-class container so future rules
/// (e.g. malformed-domain detection) can fill it without a shape change,
/// and so every serialisation always carries all four keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailGroups {
    pub personal: DomainGroup,
    pub corporate: DomainGroup,
    pub educational: DomainGroup,
    pub others: DomainGroup,
}

impl EmailGroups {
    /// Borrow the group for a category.
    pub fn group(&self, category: Category) -> &DomainGroup {
        match category {
            Category::Personal => &self.personal,
            Category::Corporate => &self.corporate,
            Category::Educational => &self.educational,
            Category::Others => &self.others,
        }
    }

    /// Mutably borrow the group for a category.
    pub fn group_mut(&mut self, category: Category) -> &mut DomainGroup {
        match category {
            Category::Personal => &mut self.personal,
            Category::Corporate => &mut self.corporate,
            Category::Educational => &mut self.educational,
            Category::Others => &mut self.others,
        }
    }

    /// Append `address` under `domain` in the given category, creating the
    /// domain key if absent. Insertion order within a domain is call order.
    pub fn insert(&mut self, category: Category, domain: &str, address: EmailAddress) {
        self.group_mut(category)
            .entry(domain.to_string())
            .or_default()
            .push(address);
    }

    /// Number of addresses in one category.
    pub fn count(&self, category: Category) -> usize {
        self.group(category).values().map(Vec::len).sum()
    }

    /// Total number of addresses across all four categories.
    pub fn total(&self) -> usize {
        Category::all().iter().map(|c| self.count(*c)).sum()
    }

    /// True when no category holds any address.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate `(category, domain, address)` in canonical export order:
    /// group-by-group, domain-by-domain, address-by-address.
    pub fn iter_rows(&self) -> impl Iterator<Item = (Category, &str, &str)> {
        Category::all().iter().flat_map(move |category| {
            self.group(*category).iter().flat_map(move |(domain, addresses)| {
                addresses
                    .iter()
                    .map(move |address| (*category, domain.as_str(), address.as_str()))
            })
        })
    }

    /// All addresses in canonical export order, ungrouped.
    pub fn flatten(&self) -> Vec<EmailAddress> {
        self.iter_rows()
            .map(|(_, _, address)| address.to_string())
            .collect()
    }
}

// =============================================================================
// Source format
// =============================================================================

/// Supported input formats, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Plain UTF-8 (or close enough) text, read lossily.
    PlainText,

    /// PDF, scanned as raw bytes. Addresses that appear literally in
    /// uncompressed content are found; everything else is out of contract.
    Pdf,
}

impl SourceFormat {
    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(extension: &str) -> Option<SourceFormat> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Some(SourceFormat::PlainText),
            "pdf" => Some(SourceFormat::Pdf),
            _ => None,
        }
    }
}

// =============================================================================
// Discovered file (output of discovery phase)
// =============================================================================

/// Metadata about a file found during input scanning, before reading.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file.
    pub path: PathBuf,

    /// File size in bytes.
    pub size: u64,

    /// Last modification timestamp.
    pub modified: Option<DateTime<Utc>>,

    /// Input format, derived from the extension.
    pub format: SourceFormat,

    /// Whether this file exceeds the large file threshold (read via mmap).
    pub is_large: bool,
}

// =============================================================================
// Batch summary
// =============================================================================

/// Per-file extraction statistics.
#[derive(Debug, Clone)]
pub struct FileReport {
    /// File path.
    pub path: PathBuf,

    /// Raw pattern matches found in this file (duplicates included).
    pub matches: usize,
}

/// Summary statistics for a completed batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Files handed to the pipeline.
    pub files_processed: usize,

    /// Files that could not be read (permissions, etc.).
    pub files_with_errors: usize,

    /// Raw matches across all files, before deduplication.
    pub total_matches: usize,

    /// Unique addresses after deduplication.
    pub unique_addresses: usize,

    /// Per-file breakdown, in input order.
    pub file_reports: Vec<FileReport>,

    /// Wall-clock batch duration.
    pub duration: std::time::Duration,
}
