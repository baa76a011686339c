//! Global error handling for extcopy
//!
//! Fatal setup failures and per-file copy failures share one error type. The
//! copier decides which of them abort the run by looking at [`ErrorKind`].

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use strum::Display;
use thiserror::Error;

/// Coarse classification of an error, as carried in a `CopyOutcome`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Source or destination cannot be read or written
    Access,
    /// Destination directory could not be created
    DirectoryCreation,
    /// A single file failed to duplicate
    Copy,
    /// Invalid configuration or arguments
    Config,
    /// Any other filesystem error
    Io,
    /// The background worker died
    Worker,
}

/// Global error type for extcopy operations
#[derive(Error, Debug)]
pub enum ExtCopyError {
    /// Source or destination is not accessible
    #[error("Access error: {}: {source}", .path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Destination directory could not be created
    #[error("Failed to create destination directory {}: {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single file could not be copied
    #[error("Failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Background worker failures
    #[error("Worker error: {0}")]
    Worker(String),
}

impl ExtCopyError {
    /// Build an access error for `path`
    pub fn access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Access {
            path: path.into(),
            source,
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Access { .. } => ErrorKind::Access,
            Self::DirectoryCreation { .. } => ErrorKind::DirectoryCreation,
            Self::Copy { .. } => ErrorKind::Copy,
            Self::Config(_) | Self::InvalidArgument(_) => ErrorKind::Config,
            Self::Io(_) | Self::Json(_) => ErrorKind::Io,
            Self::Worker(_) => ErrorKind::Worker,
        }
    }

    /// Whether this error aborts the whole run
    pub fn is_fatal(&self) -> bool {
        self.kind() != ErrorKind::Copy
    }
}

/// Specialized Result type for extcopy operations
pub type Result<T> = std::result::Result<T, ExtCopyError>;

/// Creates an ExtCopyError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::ExtCopyError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// Lets the binary keep an io::Result signature
impl From<ExtCopyError> for io::Error {
    fn from(err: ExtCopyError) -> Self {
        match err {
            ExtCopyError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
