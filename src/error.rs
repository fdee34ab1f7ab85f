// SPDX-License-Identifier: MPL-2.0

//! Error types for settings parsing and loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A settings payload contained a value that could not be interpreted.
///
/// Structurally broken lines (comments, blank lines, missing delimiter) are
/// skipped silently and never produce this error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid number for `{key}`: {value:?}")]
    InvalidNumber { key: String, value: String },

    #[error("invalid boolean for `{key}`: {value:?}")]
    InvalidBoolean { key: String, value: String },

    #[error("malformed color for `{key}`: {value:?}")]
    MalformedColor { key: String, value: String },
}

impl ParseError {
    /// Suffix appended to the displayed title while this error is current.
    pub fn title_marker(&self) -> &'static str {
        match self {
            Self::InvalidNumber { .. } | Self::InvalidBoolean { .. } => "Parse Error",
            Self::MalformedColor { .. } => "Unexpected Error",
        }
    }
}

/// Reading a settings source failed.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("settings file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
}

impl LoadError {
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinguished_from_other_io_errors() {
        let missing = LoadError::from_io("nope", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(missing, LoadError::NotFound { .. }));

        let denied = LoadError::from_io("nope", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, LoadError::Io { .. }));
    }

    #[test]
    fn title_markers() {
        let number = ParseError::InvalidNumber { key: "query-interval".into(), value: "x".into() };
        let color = ParseError::MalformedColor { key: "font-color".into(), value: "(1)".into() };
        assert_eq!(number.title_marker(), "Parse Error");
        assert_eq!(color.title_marker(), "Unexpected Error");
    }
}
