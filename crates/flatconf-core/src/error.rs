//! Error types for flatconf
//!
//! Errors are only ever produced while loading a configuration. Once a
//! [`Config`](crate::Config) exists, every accessor degrades to a default
//! value instead of failing.

use std::fmt;

/// Result type alias for flatconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for flatconf operations
#[derive(Debug, Clone)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// File path or dotted config key the error relates to
    pub path: Option<String>,
    /// Underlying cause (as string for Clone compatibility)
    pub cause: Option<String>,
    /// Actionable help message
    pub help: Option<String>,
}

/// Categories of errors that can occur while loading
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// The file could not be opened or read
    #[error("Failed to read configuration file")]
    Read,
    /// The file extension does not map to a known decoder
    #[error("Unsupported configuration format: '{extension}'")]
    UnsupportedFormat { extension: String },
    /// The decoder rejected the content
    #[error("Parse error")]
    Parse,
    /// A sequence mixes element kinds
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

impl Error {
    /// Create a read error for `file`
    pub fn read(file: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self {
            kind: ErrorKind::Read,
            path: Some(file.into()),
            cause: Some(cause.to_string()),
            help: Some("Check that the file exists and is readable".into()),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(file: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::UnsupportedFormat {
                extension: extension.into(),
            },
            path: Some(file.into()),
            cause: None,
            help: Some("Use a .json, .yml or .yaml file".into()),
        }
    }

    /// Create a new parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Parse,
            path: None,
            cause: Some(message.into()),
            help: None,
        }
    }

    /// Create a type mismatch error for a non-homogeneous sequence at `path`
    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        let expected = expected.into();
        Self {
            kind: ErrorKind::TypeMismatch {
                found: found.into(),
                expected: expected.clone(),
            },
            path: Some(path.into()),
            cause: None,
            help: Some(format!(
                "Arrays must be homogeneous; the first element makes this an array of {}",
                expected
            )),
        }
    }

    /// Add path context to the error
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add an underlying cause to the error
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(path) = &self.path {
            write!(f, "\n  Path: {}", path)?;
        }

        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}
