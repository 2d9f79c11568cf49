//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for fetchtree operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FetchError {
    /// Configuration Error - missing or invalid manifest/CLI configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Remote Error - the remote could not be reached or cloned
    #[error("Remote error for step '{dest}': {message}")]
    RemoteUnreachable { dest: String, message: String },

    /// Ref Error - the requested ref does not exist in the remote
    #[error("Ref error for step '{dest}': {message}")]
    RefNotFound { dest: String, message: String },

    /// Destination Conflict - the destination already exists and is non-empty
    #[error("Destination conflict: '{dest}' already exists and is not empty")]
    DestinationConflict { dest: String },

    /// Filesystem Error - a local file operation failed
    #[error("Filesystem error: {message}")]
    Filesystem { message: String },
}

impl FetchError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Configuration { .. } => 1,
            Self::RemoteUnreachable { .. } => 2,
            Self::RefNotFound { .. } => 3,
            Self::DestinationConflict { .. } => 4,
            Self::Filesystem { .. } => 5,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a remote-unreachable error for the step targeting `dest`
    #[inline]
    pub fn remote_unreachable<D: Into<String>, S: Into<String>>(dest: D, message: S) -> Self {
        Self::RemoteUnreachable {
            dest: dest.into(),
            message: message.into(),
        }
    }

    /// Create a ref-not-found error for the step targeting `dest`
    #[inline]
    pub fn ref_not_found<D: Into<String>, S: Into<String>>(dest: D, message: S) -> Self {
        Self::RefNotFound {
            dest: dest.into(),
            message: message.into(),
        }
    }

    /// Create a destination-conflict error
    #[inline]
    pub fn destination_conflict<D: Into<String>>(dest: D) -> Self {
        Self::DestinationConflict { dest: dest.into() }
    }

    /// Create a filesystem error
    #[inline]
    pub fn filesystem<S: Into<String>>(message: S) -> Self {
        Self::Filesystem {
            message: message.into(),
        }
    }
}
