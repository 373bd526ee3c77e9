//! Error types for ablation studies.

use std::fmt;

use thiserror::Error;

/// Result type for ablation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A top-level section of a result document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// The study configuration
    Config,
    /// The list of run records
    Runs,
}

impl Section {
    /// Key used for this section in result documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Runs => "runs",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while building or ingesting a study.
#[derive(Debug, Error)]
pub enum Error {
    /// A data-model invariant was violated.
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// A result document is missing a required section.
    #[error("result document is missing `{section}`: {detail}")]
    MissingSection {
        section: Section,
        detail: &'static str,
    },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A line of a run-record stream could not be parsed.
    #[error("invalid run record on line {line}: {source}")]
    JsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Check if this error is a data-model validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
