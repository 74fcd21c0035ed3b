//! Errors raised while turning command-line input into options.

use std::fmt;
use std::path::PathBuf;

use crate::registry::UnknownOption;
use crate::state::ProfileError;

/// Failure while processing command-line arguments.
#[derive(Debug)]
pub enum ArgsError {
    /// A profile file could not be read.
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A profile file could not be written.
    Write {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// A profile file is not a valid profile document.
    Profile {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: ProfileError,
    },
    /// A `--set` argument is not `KEY=VALUE`.
    Assignment(String),
    /// A `--set` key is not a registered option.
    Option(UnknownOption),
    /// JSON output could not be rendered.
    Json(serde_json::Error),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Write { path, source } => write!(f, "cannot write {}: {source}", path.display()),
            Self::Profile { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Assignment(raw) => write!(f, "expected KEY=VALUE, got '{raw}'"),
            Self::Option(e) => write!(f, "{e}"),
            Self::Json(e) => write!(f, "cannot render JSON: {e}"),
        }
    }
}

impl std::error::Error for ArgsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } | Self::Write { source, .. } => Some(source),
            Self::Profile { source, .. } => Some(source),
            Self::Option(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Assignment(_) => None,
        }
    }
}

impl From<UnknownOption> for ArgsError {
    fn from(e: UnknownOption) -> Self {
        Self::Option(e)
    }
}

impl From<serde_json::Error> for ArgsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
