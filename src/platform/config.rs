// mailsift - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::discovery::DiscoveryConfig;
use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for mailsift configuration and data.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/mailsift/ or %APPDATA%\mailsift\)
    pub config_dir: PathBuf,

    /// Data directory for logs, caches, etc.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[extraction]` section.
    pub extraction: ExtractionSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Maximum directory recursion depth.
    pub max_depth: Option<usize>,
    /// Maximum files to discover per scan.
    pub max_files: Option<usize>,
    /// Include glob patterns.
    pub include_patterns: Option<Vec<String>>,
    /// Exclude glob patterns.
    pub exclude_patterns: Option<Vec<String>>,
}

/// `[extraction]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExtractionSection {
    /// File size in bytes above which files are memory-mapped.
    pub large_file_threshold_bytes: Option<u64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time.
/// Invalid values produce actionable warnings and fall back to defaults.
///
/// The classification tables (personal-domain allow-list, educational
/// markers) are fixed constants and deliberately not configurable.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Maximum directory recursion depth.
    pub max_depth: usize,
    /// Maximum files to discover per scan.
    pub max_files: usize,
    /// Include glob patterns.
    pub include_patterns: Vec<String>,
    /// Exclude glob patterns.
    pub exclude_patterns: Vec<String>,
    /// Memory-mapping threshold in bytes.
    pub large_file_threshold: u64,
    /// Logging level string (consumed before tracing is initialised).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
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
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Project this config onto the discovery layer's own config type.
    pub fn discovery_config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            max_depth: self.max_depth,
            max_files: self.max_files,
            include_patterns: self.include_patterns.clone(),
            exclude_patterns: self.exclude_patterns.clone(),
            large_file_threshold: self.large_file_threshold,
        }
    }
}

/// Load and validate config.toml from `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal
/// warnings. If the file does not exist, returns defaults with no warnings
/// (first-run). If the file is unparseable, returns defaults with an error
/// warning -- the tool still runs but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            warnings.push(format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            warnings.push(format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return (AppConfig::default(), warnings);
        }
    };

    // Validate each field against named constants, accumulating all errors.
    let mut config = AppConfig::default();

    // -- Discovery: max_depth --
    if let Some(depth) = raw.discovery.max_depth {
        if (1..=constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
            config.max_depth = depth;
        } else {
            warnings.push(format!(
                "[discovery] max_depth = {depth} is out of range (1-{}). Using default ({}).",
                constants::ABSOLUTE_MAX_DEPTH,
                constants::DEFAULT_MAX_DEPTH,
            ));
        }
    }

    // -- Discovery: max_files --
    if let Some(files) = raw.discovery.max_files {
        if (constants::MIN_MAX_FILES..=constants::ABSOLUTE_MAX_FILES).contains(&files) {
            config.max_files = files;
        } else {
            warnings.push(format!(
                "[discovery] max_files = {files} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_FILES,
                constants::ABSOLUTE_MAX_FILES,
                constants::DEFAULT_MAX_FILES,
            ));
        }
    }

    // -- Discovery: patterns (validated lazily at discovery time; any glob
    //    syntax error there becomes a per-pattern warning) --
    if let Some(patterns) = raw.discovery.include_patterns {
        config.include_patterns = patterns;
    }
    if let Some(patterns) = raw.discovery.exclude_patterns {
        config.exclude_patterns = patterns;
    }

    // -- Extraction: large_file_threshold_bytes --
    if let Some(threshold) = raw.extraction.large_file_threshold_bytes {
        if (constants::MIN_LARGE_FILE_THRESHOLD..=constants::MAX_LARGE_FILE_THRESHOLD)
            .contains(&threshold)
        {
            config.large_file_threshold = threshold;
        } else {
            warnings.push(format!(
                "[extraction] large_file_threshold_bytes = {threshold} is out of range ({}-{}). \
                 Using default ({}).",
                constants::MIN_LARGE_FILE_THRESHOLD,
                constants::MAX_LARGE_FILE_THRESHOLD,
                constants::DEFAULT_LARGE_FILE_THRESHOLD,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    (config, warnings)
}
