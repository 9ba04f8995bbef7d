// IssueTag - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every variant keeps its cause so the
// full chain can be logged.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all IssueTag operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum IssueTagError {
    /// Profile storage or validation failed.
    Profile(ProfileStoreError),

    /// System clipboard access failed.
    Clipboard(ClipboardError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for IssueTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile(e) => write!(f, "Profile error: {e}"),
            Self::Clipboard(e) => write!(f, "Clipboard error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for IssueTagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Profile(e) => Some(e),
            Self::Clipboard(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Profile store errors
// ---------------------------------------------------------------------------

/// Errors related to saving, loading, and selecting profiles.
#[derive(Debug)]
pub enum ProfileStoreError {
    /// Profile name was empty or whitespace only.
    EmptyName,

    /// Profile name exceeds the maximum allowed length.
    NameTooLong { length: usize, max_length: usize },

    /// No profile with this name exists.
    NotFound { name: String },

    /// The store file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// The store file exists but is not a valid profile mapping.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// I/O error reading or writing a store file.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl ProfileStoreError {
    /// True for errors caused by user input rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyName | Self::NameTooLong { .. } | Self::NotFound { .. }
        )
    }
}

impl fmt::Display for ProfileStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Profile name must not be empty"),
            Self::NameTooLong { length, max_length } => write!(
                f,
                "Profile name is {length} characters, exceeds maximum of {max_length}"
            ),
            Self::NotFound { name } => write!(f, "No profile named '{name}'"),
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Profile store '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Json { path, source } => write!(
                f,
                "Profile store '{}' is malformed: {source}",
                path.display()
            ),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ProfileStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ProfileStoreError> for IssueTagError {
    fn from(e: ProfileStoreError) -> Self {
        Self::Profile(e)
    }
}

// ---------------------------------------------------------------------------
// Clipboard errors
// ---------------------------------------------------------------------------

/// Errors related to the system clipboard.
#[derive(Debug)]
pub enum ClipboardError {
    /// No clipboard could be opened (e.g. headless session).
    Unavailable(arboard::Error),

    /// Reading text from the clipboard failed.
    Read(arboard::Error),

    /// Writing text to the clipboard failed.
    Write(arboard::Error),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(e) => write!(f, "system clipboard is unavailable: {e}"),
            Self::Read(e) => write!(f, "failed to read clipboard text: {e}"),
            Self::Write(e) => write!(f, "failed to copy text to clipboard: {e}"),
        }
    }
}

impl std::error::Error for ClipboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unavailable(e) | Self::Read(e) | Self::Write(e) => Some(e),
        }
    }
}

impl From<ClipboardError> for IssueTagError {
    fn from(e: ClipboardError) -> Self {
        Self::Clipboard(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for IssueTagError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for IssueTag results.
pub type Result<T> = std::result::Result<T, IssueTagError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_profile_error_display_and_chain() {
        let err: IssueTagError = ProfileStoreError::Io {
            path: PathBuf::from("/tmp/profiles.json"),
            operation: "write",
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();

        let msg = err.to_string();
        assert!(msg.starts_with("Profile error: "), "got: {msg}");
        assert!(msg.contains("/tmp/profiles.json"));

        // Top-level -> ProfileStoreError -> io::Error
        let inner = err.source().expect("profile error has a source");
        assert!(inner.source().is_some(), "io cause must be preserved");
    }

    #[test]
    fn test_validation_classification() {
        assert!(ProfileStoreError::EmptyName.is_validation());
        assert!(ProfileStoreError::NotFound {
            name: "ci".to_string()
        }
        .is_validation());
        assert!(!ProfileStoreError::Io {
            path: PathBuf::from("x"),
            operation: "read",
            source: io::Error::other("boom"),
        }
        .is_validation());
    }
}
