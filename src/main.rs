// mailsift - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Input resolution (explicit files + recursive directory discovery)
// 4. Batch pipeline, export writing, terminal summary

use clap::{Parser, ValueEnum};
use std::collections::HashSet;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use mailsift::app::pipeline::{self, BatchResult};
use mailsift::core::discovery::{self, DiscoveryConfig};
use mailsift::core::export;
use mailsift::core::model::{Category, DiscoveredFile, EmailGroups};
use mailsift::platform::config::{load_config, PlatformPaths};
use mailsift::util::constants;
use mailsift::util::error::{ExportError, MailsiftError, Result};
use mailsift::util::logging;

/// Export formats the CLI can produce. Repeat --format for several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
enum ExportFormat {
    /// One row per address: Category,Domain,Email.
    Csv,

    /// Structural JSON of the four classification groups.
    Json,

    /// One CSV grid per non-empty category, domains as columns.
    DomainSheets,

    /// A single CSV grid with one column per category.
    CategorySheet,
}

/// mailsift - extract and classify email addresses from text and PDF files.
///
/// Point mailsift at files or directories; it scans them for email
/// addresses, groups each address by domain into personal, corporate,
/// educational and other categories, and writes the result as export files.
#[derive(Parser, Debug)]
#[command(name = "mailsift", version, about)]
struct Cli {
    /// Files and/or directories to process.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory export files are written into.
    #[arg(short = 'o', long = "output", default_value = ".")]
    output: PathBuf,

    /// Export format(s) to write.
    #[arg(short = 'f', long = "format", value_enum, default_value = "csv")]
    formats: Vec<ExportFormat>,

    /// File-name stem for export files (e.g. `emails` -> emails.csv).
    #[arg(long = "stem", default_value = constants::DEFAULT_EXPORT_STEM)]
    stem: String,

    /// Alternative config.toml path (default: platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is loaded before logging is initialised so the [logging]
    // level can take effect; resolver debug events before init are dropped.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file());
    let (config, config_warnings) = load_config(&config_path);

    logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "mailsift starting"
    );

    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config validation warning");
        eprintln!("Warning: {warning}");
    }

    let discovery_config = config.discovery_config();

    let (files, input_warnings) = match collect_inputs(&cli.inputs, &discovery_config) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!(error = %e, "Input resolution failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    for warning in &input_warnings {
        eprintln!("Warning: {warning}");
    }

    if files.is_empty() {
        eprintln!("Error: no supported input files found (.txt, .pdf).");
        std::process::exit(1);
    }

    let result = pipeline::run_batch(&files);
    for warning in &result.warnings {
        eprintln!("Warning: {warning}");
    }

    let written = match write_exports(&result.groups, &cli.formats, &cli.output, &cli.stem) {
        Ok(written) => written,
        Err(e) => {
            tracing::error!(error = %e, "Export failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    print_summary(&result, &written);
}

// =============================================================================
// Input resolution
// =============================================================================

/// Resolve CLI inputs into a flat, ordered list of discovered files.
///
/// Directories are scanned recursively with the configured patterns;
/// explicit files are inspected directly so an unsupported extension is
/// surfaced as a warning rather than silently dropped.
fn collect_inputs(
    inputs: &[PathBuf],
    config: &DiscoveryConfig,
) -> Result<(Vec<DiscoveredFile>, Vec<String>)> {
    let mut files: Vec<DiscoveredFile> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let (found, mut dir_warnings) = discovery::discover_files(input, config)
                .map_err(MailsiftError::Discovery)?;
            if found.is_empty() {
                warnings.push(format!(
                    "'{}': no supported files found",
                    input.display()
                ));
            }
            files.extend(found);
            warnings.append(&mut dir_warnings);
        } else {
            // Explicit file (or a path that does not exist -- inspect_file
            // reports either problem as a per-input warning).
            match discovery::inspect_file(input, config) {
                Ok(file) => files.push(file),
                Err(e) => warnings.push(e.to_string()),
            }
        }
    }

    Ok((files, warnings))
}

// =============================================================================
// Export writing
// =============================================================================

/// Write every requested export format, returning the paths written.
fn write_exports(
    groups: &EmailGroups,
    formats: &[ExportFormat],
    output_dir: &Path,
    stem: &str,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir).map_err(|e| MailsiftError::Io {
        path: output_dir.to_path_buf(),
        operation: "create output directory",
        source: e,
    })?;

    let mut written: Vec<PathBuf> = Vec::new();
    let mut seen: HashSet<ExportFormat> = HashSet::new();

    for format in formats {
        if !seen.insert(*format) {
            continue; // Repeated --format values are harmless.
        }

        match format {
            ExportFormat::Csv => {
                let path = output_dir.join(format!("{stem}.csv"));
                let rows = export::export_csv(groups, create_export_file(&path)?, &path)?;
                tracing::info!(path = %path.display(), rows, "CSV export written");
                written.push(path);
            }
            ExportFormat::Json => {
                let path = output_dir.join(format!("{stem}.json"));
                let count = export::export_json(groups, create_export_file(&path)?, &path)?;
                tracing::info!(path = %path.display(), addresses = count, "JSON export written");
                written.push(path);
            }
            ExportFormat::DomainSheets => {
                for sheet in export::sheets_by_domain(groups) {
                    let path = output_dir.join(format!("{stem}_{}.csv", slugify(&sheet.name)));
                    let rows = export::write_sheet_csv(&sheet, create_export_file(&path)?, &path)?;
                    tracing::info!(path = %path.display(), rows, "Domain sheet written");
                    written.push(path);
                }
            }
            ExportFormat::CategorySheet => {
                let path = output_dir.join(format!("{stem}_by_category.csv"));
                let sheet = export::sheet_by_category(groups);
                let rows = export::write_sheet_csv(&sheet, create_export_file(&path)?, &path)?;
                tracing::info!(path = %path.display(), rows, "Category sheet written");
                written.push(path);
            }
        }
    }

    Ok(written)
}

/// Create a buffered export file, mapping failure to the typed error.
fn create_export_file(path: &Path) -> Result<BufWriter<std::fs::File>> {
    std::fs::File::create(path)
        .map(BufWriter::new)
        .map_err(|e| {
            MailsiftError::Export(ExportError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })
}

/// Sheet name to file-name fragment: lowercase, non-alphanumerics to `_`.
fn slugify(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

// =============================================================================
// Terminal summary
// =============================================================================

/// Human-readable batch summary on stdout.
fn print_summary(result: &BatchResult, written: &[PathBuf]) {
    let summary = &result.summary;

    println!(
        "Processed {} file(s) in {:.2?}",
        summary.files_processed, summary.duration
    );
    for report in &summary.file_reports {
        println!("  {}: {} match(es)", report.path.display(), report.matches);
    }
    if summary.files_with_errors > 0 {
        println!("  {} file(s) could not be read", summary.files_with_errors);
    }

    println!();
    println!(
        "{} unique address(es) from {} raw match(es)",
        summary.unique_addresses, summary.total_matches
    );
    for category in Category::all() {
        println!(
            "  {:<12} {:>6}  in {} domain(s)",
            category.label(),
            result.groups.count(*category),
            result.groups.group(*category).len()
        );
    }

    println!();
    for path in written {
        println!("Wrote {}", path.display());
    }
}
