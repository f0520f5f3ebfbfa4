//! Error types for the dramatis library.
//!
//! The loader distinguishes failure kinds structurally rather than by
//! message matching: callers can tell a rejected identifier from a tripped
//! circuit breaker from a hard validation failure by variant alone.

use std::io;

use thiserror::Error;

/// Main result type for dramatis operations.
pub type Result<T> = std::result::Result<T, ContextError>;

/// Failure kinds surfaced by the context loader.
#[derive(Error, Debug)]
pub enum ContextError {
    /// The raw character identifier failed sanitisation.
    #[error("invalid character identifier: {message}")]
    InvalidIdentifier {
        /// What was wrong with the identifier
        message: String,
    },

    /// Path traversal or containment violation.
    #[error("security violation: {message}")]
    Security {
        /// Description of the violation
        message: String,
    },

    /// The character directory is missing or not a directory.
    #[error("character directory not found for: {character_id}")]
    DirectoryNotFound {
        /// Canonical identifier whose directory was expected
        character_id: String,
    },

    /// The circuit breaker is open and rejecting loads.
    #[error("service temporarily unavailable, recovery in {retry_after_secs}s")]
    ServiceUnavailable {
        /// Whole seconds until the breaker will admit a probe load
        retry_after_secs: u64,
    },

    /// The per-request deadline elapsed before all file tasks finished.
    #[error("context loading timed out after {deadline_secs}s")]
    Timeout {
        /// The deadline that was exceeded, in seconds
        deadline_secs: f64,
    },

    /// The integrity validator found more warnings than the hard threshold.
    #[error("critical data integrity issues: {}", .warnings.join("; "))]
    ValidationFailed {
        /// The accumulated validation warnings
        warnings: Vec<String>,
    },

    /// Any other unexpected failure during load composition.
    #[error("context loading failed: {message}")]
    LoadFailed {
        /// Error description
        message: String,
    },

    /// Per-file parse or read failure.
    ///
    /// Never surfaced from [`crate::ContextLoader::load`]; converted into a
    /// failed [`crate::LoadedFileInfo`] for the affected sub-context.
    #[error("{kind} parsing error: {message}")]
    Parse {
        /// Context file kind being parsed
        kind: String,
        /// Error description
        message: String,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// I/O related errors outside the per-file recovery path
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ContextError {
    /// Create a new invalid-identifier error
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            message: message.into(),
        }
    }

    /// Create a new security violation error
    pub fn security(message: impl Into<String>) -> Self {
        Self::Security {
            message: message.into(),
        }
    }

    /// Create a new directory-not-found error
    pub fn directory_not_found(character_id: impl Into<String>) -> Self {
        Self::DirectoryNotFound {
            character_id: character_id.into(),
        }
    }

    /// Create a new load failure error
    pub fn load_failed(message: impl Into<String>) -> Self {
        Self::LoadFailed {
            message: message.into(),
        }
    }

    /// Create a new per-file parse error
    pub fn parse(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Whether this failure counts against the failed-loads counter and the
    /// circuit breaker. Caller errors and admission rejections do not.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::DirectoryNotFound { .. }
                | Self::Timeout { .. }
                | Self::ValidationFailed { .. }
                | Self::LoadFailed { .. }
                | Self::Io { .. }
        )
    }
}

impl From<io::Error> for ContextError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_yaml::Error> for ContextError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse {
            kind: "yaml".to_string(),
            message: err.to_string(),
        }
    }
}
