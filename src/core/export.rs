// mailsift - core/export.rs
//
// Serialisation of classification results: per-address CSV, structural
// JSON, and the two spreadsheet-style grid layouts.
// Core layer: writes to any Write trait object; the caller owns file
// creation and naming.

use crate::core::model::{Category, DomainGroup, EmailGroups};
use crate::util::constants;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export one row per address: `Category,Domain,Email`.
///
/// Rows follow the canonical order of [`EmailGroups::iter_rows`]:
/// group-by-group, domain-by-domain, address-by-address. Returns the
/// number of data rows written.
pub fn export_csv<W: Write>(
    groups: &EmailGroups,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(constants::CSV_HEADER)
        .map_err(|e| ExportError::Csv {
            path: export_path.to_path_buf(),
            source: e,
        })?;

    let mut count = 0;
    for (category, domain, address) in groups.iter_rows() {
        csv_writer
            .write_record([category.label(), domain, address])
            .map_err(|e| ExportError::Csv {
                path: export_path.to_path_buf(),
                source: e,
            })?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export the full structure as pretty-printed JSON.
///
/// Direct structural serialisation: mapping of mapping of list-of-string,
/// all four groups present even when empty. Returns the address count.
pub fn export_json<W: Write>(
    groups: &EmailGroups,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, groups).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(groups.total())
}

// =============================================================================
// Spreadsheet-style grids
// =============================================================================

/// A named grid of cells -- one spreadsheet tab, rendered as CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    /// Human-readable sheet name; the caller derives a file name from it.
    pub name: String,

    /// Row-major cells. The first row is the header.
    pub rows: Vec<Vec<String>>,
}

/// Build the by-domain grid for a single category: one column per domain
/// (header row = domain names), addresses filled downwards and padded
/// with empty cells to the longest column.
///
/// Returns `None` when the category holds no domains, so empty categories
/// produce no sheet.
fn domain_grid(group: &DomainGroup, name: &str) -> Option<Sheet> {
    if group.is_empty() {
        return None;
    }

    let header: Vec<String> = group.keys().cloned().collect();
    let depth = group.values().map(Vec::len).max().unwrap_or(0);

    let mut rows = Vec::with_capacity(depth + 1);
    rows.push(header);
    for i in 0..depth {
        rows.push(
            group
                .values()
                .map(|addresses| addresses.get(i).cloned().unwrap_or_default())
                .collect(),
        );
    }

    Some(Sheet {
        name: name.to_string(),
        rows,
    })
}

/// The by-domain layout: one sheet per non-empty category, each with
/// domains as columns.
pub fn sheets_by_domain(groups: &EmailGroups) -> Vec<Sheet> {
    Category::all()
        .iter()
        .filter_map(|category| domain_grid(groups.group(*category), category.sheet_title()))
        .collect()
}

/// The by-category layout: a single sheet with one column per category
/// (all four always present), addresses flattened across domains and
/// padded to the longest column.
pub fn sheet_by_category(groups: &EmailGroups) -> Sheet {
    let columns: Vec<Vec<String>> = Category::all()
        .iter()
        .map(|category| {
            groups
                .group(*category)
                .values()
                .flatten()
                .cloned()
                .collect()
        })
        .collect();

    let depth = columns.iter().map(Vec::len).max().unwrap_or(0);

    let mut rows = Vec::with_capacity(depth + 1);
    rows.push(
        Category::all()
            .iter()
            .map(|c| c.sheet_title().to_string())
            .collect(),
    );
    for i in 0..depth {
        rows.push(
            columns
                .iter()
                .map(|column| column.get(i).cloned().unwrap_or_default())
                .collect(),
        );
    }

    Sheet {
        name: "Emails by category".to_string(),
        rows,
    }
}

/// Render a sheet through the CSV writer. Returns the number of rows
/// written, header included.
pub fn write_sheet_csv<W: Write>(
    sheet: &Sheet,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for row in &sheet.rows {
        csv_writer.write_record(row).map_err(|e| ExportError::Csv {
            path: export_path.to_path_buf(),
            source: e,
        })?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(sheet.rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classify::classify;
    use std::path::PathBuf;

    fn sample_groups() -> EmailGroups {
        classify(&[
            "x@gmail.com".to_string(),
            "y@gmail.com".to_string(),
            "z@aol.com".to_string(),
            "a@university.edu".to_string(),
            "b@mycompany.io".to_string(),
        ])
    }

    #[test]
    fn test_csv_export_header_and_order() {
        let groups = sample_groups();
        let mut buf = Vec::new();
        let count = export_csv(&groups, &mut buf, &PathBuf::from("out.csv")).unwrap();
        assert_eq!(count, 5);

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Category,Domain,Email");
        // Personal rows first (aol before gmail), then corporate, then educational.
        assert_eq!(lines[1], "Personal,aol.com,z@aol.com");
        assert_eq!(lines[2], "Personal,gmail.com,x@gmail.com");
        assert_eq!(lines[3], "Personal,gmail.com,y@gmail.com");
        assert_eq!(lines[4], "Corporate,mycompany.io,b@mycompany.io");
        assert_eq!(lines[5], "Educational,university.edu,a@university.edu");
    }

    #[test]
    fn test_csv_round_trip_reconstructs_groups() {
        let groups = sample_groups();
        let mut buf = Vec::new();
        export_csv(&groups, &mut buf, &PathBuf::from("out.csv")).unwrap();

        let mut reader = csv::Reader::from_reader(buf.as_slice());
        let mut rebuilt = EmailGroups::default();
        for record in reader.records() {
            let record = record.unwrap();
            let category = Category::from_label(&record[0]).unwrap();
            rebuilt.insert(category, &record[1], record[2].to_string());
        }

        assert_eq!(rebuilt, groups);
    }

    #[test]
    fn test_json_export_contains_all_groups() {
        let groups = sample_groups();
        let mut buf = Vec::new();
        let count = export_json(&groups, &mut buf, &PathBuf::from("out.json")).unwrap();
        assert_eq!(count, 5);

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["personal"]["gmail.com"][0], "x@gmail.com");
        assert_eq!(value["others"], serde_json::json!({}));

        // Structural round trip.
        let parsed: EmailGroups = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, groups);
    }

    #[test]
    fn test_sheets_by_domain_skips_empty_categories() {
        let groups = sample_groups();
        let sheets = sheets_by_domain(&groups);
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        // `others` is empty and must not produce a sheet.
        assert_eq!(
            names,
            vec!["Personal emails", "Corporate emails", "Educational emails"]
        );
    }

    #[test]
    fn test_domain_sheet_pads_columns() {
        let groups = sample_groups();
        let sheets = sheets_by_domain(&groups);
        let personal = &sheets[0];

        // Header: aol.com, gmail.com. gmail has two addresses, aol one.
        assert_eq!(personal.rows[0], vec!["aol.com", "gmail.com"]);
        assert_eq!(personal.rows[1], vec!["z@aol.com", "x@gmail.com"]);
        assert_eq!(personal.rows[2], vec!["", "y@gmail.com"]);
        assert_eq!(personal.rows.len(), 3);
    }

    #[test]
    fn test_category_sheet_always_has_four_columns() {
        let groups = sample_groups();
        let sheet = sheet_by_category(&groups);

        assert_eq!(
            sheet.rows[0],
            vec![
                "Personal emails",
                "Corporate emails",
                "Educational emails",
                "Other emails"
            ]
        );
        // Three personal addresses drive the depth; other columns padded.
        assert_eq!(sheet.rows.len(), 4);
        assert_eq!(sheet.rows[1][3], "");
        assert_eq!(sheet.rows[3], vec!["y@gmail.com", "", "", ""]);
    }

    #[test]
    fn test_category_sheet_on_empty_groups_is_header_only() {
        let sheet = sheet_by_category(&EmailGroups::default());
        assert_eq!(sheet.rows.len(), 1);
    }

    #[test]
    fn test_write_sheet_csv() {
        let groups = sample_groups();
        let sheet = sheet_by_category(&groups);
        let mut buf = Vec::new();
        let rows = write_sheet_csv(&sheet, &mut buf, &PathBuf::from("sheet.csv")).unwrap();
        assert_eq!(rows, sheet.rows.len());

        let output = String::from_utf8(buf).unwrap();
        assert!(output.starts_with("Personal emails,Corporate emails"));
        assert!(output.contains("x@gmail.com"));
    }
}
