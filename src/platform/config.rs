// IssueTag - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for IssueTag data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/issuetag/ or %APPDATA%\IssueTag\config\)
    pub config_dir: PathBuf,

    /// Data directory holding the profile store and last-used marker.
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
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[extractor]` section.
    pub extractor: ExtractorSection,
    /// `[watch]` section.
    pub watch: WatchSection,
    /// `[output]` section.
    pub output: OutputSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[extractor]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExtractorSection {
    /// Extra path fragments whose lines are always ignored.
    pub ignore_paths: Option<Vec<String>>,
    /// Extra case-insensitive keywords that mark a line as an issue.
    pub keywords: Option<Vec<String>>,
}

/// `[watch]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct WatchSection {
    /// Clipboard poll interval in ms.
    pub poll_interval_ms: Option<u64>,
    /// Delay between detecting a paste and converting it, in ms.
    pub settle_delay_ms: Option<u64>,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Also print converted text to stdout.
    pub print: Option<bool>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Extractor --
    /// Extra ignore fragments appended to the built-in list.
    pub extra_ignore_paths: Vec<String>,
    /// Extra issue keywords appended to the built-in list.
    pub extra_keywords: Vec<String>,

    // -- Watch --
    /// Clipboard poll interval in ms.
    pub poll_interval_ms: u64,
    /// Settle delay in ms.
    pub settle_delay_ms: u64,

    // -- Output --
    /// Print converted text to stdout as well as copying it.
    pub print: bool,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            extra_ignore_paths: Vec::new(),
            extra_keywords: Vec::new(),
            poll_interval_ms: constants::DEFAULT_POLL_INTERVAL_MS,
            settle_delay_ms: constants::DEFAULT_SETTLE_DELAY_MS,
            print: false,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate a config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with one warning
/// so the tool still runs but the user is informed.
///
/// Note: this runs before logging is initialised (the config selects the log
/// level), so warnings are returned rather than only logged.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<ConfigError>) {
    let mut warnings: Vec<ConfigError> = Vec::new();

    if !config_path.exists() {
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            warnings.push(ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            });
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            warnings.push(ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            });
            return (AppConfig::default(), warnings);
        }
    };

    let config = validate(raw, &mut warnings);
    (config, warnings)
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<ConfigError>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Extractor: ignore_paths / keywords --
    if let Some(list) = raw.extractor.ignore_paths {
        config.extra_ignore_paths = validate_rule_list("extractor.ignore_paths", list, warnings);
    }
    if let Some(list) = raw.extractor.keywords {
        config.extra_keywords = validate_rule_list("extractor.keywords", list, warnings);
    }

    // -- Watch: poll_interval_ms --
    if let Some(ms) = raw.watch.poll_interval_ms {
        if (constants::MIN_POLL_INTERVAL_MS..=constants::MAX_POLL_INTERVAL_MS).contains(&ms) {
            config.poll_interval_ms = ms;
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "watch.poll_interval_ms".to_string(),
                value: ms.to_string(),
                expected: format!(
                    "{}-{} (using default {})",
                    constants::MIN_POLL_INTERVAL_MS,
                    constants::MAX_POLL_INTERVAL_MS,
                    constants::DEFAULT_POLL_INTERVAL_MS,
                ),
            });
        }
    }

    // -- Watch: settle_delay_ms --
    if let Some(ms) = raw.watch.settle_delay_ms {
        if ms <= constants::MAX_SETTLE_DELAY_MS {
            config.settle_delay_ms = ms;
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "watch.settle_delay_ms".to_string(),
                value: ms.to_string(),
                expected: format!(
                    "0-{} (using default {})",
                    constants::MAX_SETTLE_DELAY_MS,
                    constants::DEFAULT_SETTLE_DELAY_MS,
                ),
            });
        }
    }

    // -- Output: print --
    if let Some(print) = raw.output.print {
        config.print = print;
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(ConfigError::ValueOutOfRange {
                field: "logging.level".to_string(),
                value: level,
                expected: format!(
                    "one of {} (using default {})",
                    constants::VALID_LOG_LEVELS.join(", "),
                    constants::DEFAULT_LOG_LEVEL,
                ),
            });
        }
    }

    // -- Logging: file --
    if let Some(file) = raw.logging.file {
        if !file.trim().is_empty() {
            config.log_file = Some(PathBuf::from(file));
        }
    }

    config
}

/// Drop blank entries and cap the list length.
fn validate_rule_list(
    field: &str,
    list: Vec<String>,
    warnings: &mut Vec<ConfigError>,
) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(list.len());
    for entry in list {
        if entry.trim().is_empty() {
            warnings.push(ConfigError::ValueOutOfRange {
                field: field.to_string(),
                value: format!("{entry:?}"),
                expected: "a non-blank string (entry ignored)".to_string(),
            });
        } else {
            kept.push(entry);
        }
    }

    if kept.len() > constants::MAX_EXTRA_RULES {
        warnings.push(ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value: format!("{} entries", kept.len()),
            expected: format!(
                "at most {} entries (extra entries ignored)",
                constants::MAX_EXTRA_RULES
            ),
        });
        kept.truncate(constants::MAX_EXTRA_RULES);
    }

    kept
}
