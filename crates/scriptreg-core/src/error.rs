//! Error types for scriptreg
//!
//! Provides error handling for:
//! - Argument validation performed by the script facade
//! - Failures reported by the document store
//! - Stored documents that cannot be read back as scripts
//! - Configuration loading

/// Main script facade error type
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Caller supplied an argument that violates a precondition
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A stored document is not a valid script document
    #[error("invalid script document: {0}")]
    InvalidDocument(String),

    /// Failure raised by the document store, passed through untouched
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ScriptError {
    /// Create invalid argument error
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create invalid document error
    #[inline]
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument(message.into())
    }

    /// Check if error was raised by argument validation
    #[inline]
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if error is retryable
    ///
    /// Only transient store failures qualify. The facade never retries on
    /// its own; this is a hint for callers.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_transient())
    }

    /// Underlying store error, if any
    #[inline]
    #[must_use]
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors reported by a [`DocumentOperations`](crate::DocumentOperations) implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Could not reach the database
    #[error("connection failed: {0}")]
    Connection(String),

    /// Server rejected the command
    #[error("command failed ({code}): {message}")]
    Command {
        /// Server error code
        code: i32,
        /// Server error message
        message: String,
    },

    /// Operation did not complete in time
    #[error("operation timed out after {duration_secs}s")]
    Timeout {
        /// Elapsed time before giving up
        duration_secs: u64,
    },

    /// Anything else
    #[error("store error: {0}")]
    Other(String),
}

impl StoreError {
    /// Create command error
    #[inline]
    pub fn command(code: i32, message: impl Into<String>) -> Self {
        Self::Command {
            code,
            message: message.into(),
        }
    }

    /// Check if failure is transient (worth retrying)
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout { .. })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed into a configuration
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
