// IssueTag - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "IssueTag";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "IssueTag";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Extraction rules
// =============================================================================

/// Path fragments of installed tooling and system libraries. A line containing
/// any of these is noise, even when it also carries a diagnostic keyword.
/// Matched case-sensitively.
pub const DEFAULT_IGNORED_PATH_FRAGMENTS: &[&str] = &["Xcode.app", "/Applications/", "/Library/"];

/// Diagnostic keywords that mark a line as an issue. Matched
/// case-insensitively; keep these lowercase.
pub const DEFAULT_ISSUE_KEYWORDS: &[&str] = &[
    "no such module",
    "failed",
    "error:",
    "warning:",
    "fatal error:",
    "undefined symbol",
];

/// Leading character of an absolute path in "path: message" lines.
pub const PATH_PREFIX: char = '/';

/// Separator between the location and the message in "path: message" lines.
pub const PATH_MESSAGE_SEPARATOR: &str = ": ";

/// Opening or closing wrapper tag left over from a previous conversion.
pub const ISSUE_TAG_PATTERN: &str = r"</?issue\d*>";

/// Maximum number of extra rules accepted from config.toml per list.
pub const MAX_EXTRA_RULES: usize = 64;

/// Separator placed between tagged issues and between composed segments.
pub const SEGMENT_SEPARATOR: &str = "\n\n";

// =============================================================================
// Watch mode
// =============================================================================

/// Default interval between clipboard polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Minimum configurable poll interval.
pub const MIN_POLL_INTERVAL_MS: u64 = 50;

/// Maximum configurable poll interval.
pub const MAX_POLL_INTERVAL_MS: u64 = 5_000;

/// Default pause between noticing new clipboard text and converting it, so a
/// paste in progress has completed before it is read back.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 50;

/// Maximum configurable settle delay.
pub const MAX_SETTLE_DELAY_MS: u64 = 2_000;

// =============================================================================
// Profile storage
// =============================================================================

/// Maximum length of a profile name in characters.
pub const MAX_PROFILE_NAME_LEN: usize = 128;

/// Maximum size of the profile store file in bytes.
pub const MAX_PROFILE_STORE_SIZE: u64 = 4 * 1024 * 1024; // 4 MB

// =============================================================================
// Logging
// =============================================================================

/// Default log level when neither RUST_LOG, --debug, nor config sets one.
/// stdout carries converted text, so the default stays quiet.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// File names
// =============================================================================

/// Configuration file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Profile store file name inside the data directory.
pub const PROFILES_FILE_NAME: &str = "profiles.json";

/// Last-used profile marker file name inside the data directory.
pub const LAST_PROFILE_FILE_NAME: &str = "last_profile.txt";
