//! Crate-level error type.
//!
//! Each stage has its own error enum; this type wraps them for callers that
//! drive several stages at once (the CLI, batch loaders). Classifier trouble
//! never reaches this type from the theme adapter, which degrades instead.

use crate::comparison::ComparisonError;
use crate::config::ConfigError;
use crate::report::ReportError;
use crate::themes::ClassifierError;
use crate::validation::ResponseErrors;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ResponseErrors),

    #[error(transparent)]
    Comparison(#[from] ComparisonError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Report(#[from] ReportError),

    /// Input file could not be read or written
    #[error("File system error on {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file is not valid JSON for the expected records
    #[error("Invalid input in {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl Error {
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    pub fn input(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Input {
            path: path.into(),
            source,
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ParticipantId, Phase};

    #[test]
    fn stage_errors_convert() {
        let err: Error = ComparisonError::MissingPhase {
            participant_id: Some(ParticipantId::new("p-1")),
            missing: Phase::Post,
        }
        .into();
        assert!(matches!(err, Error::Comparison(_)));
        assert!(err.to_string().contains("p-1"));
    }

    #[test]
    fn context_prefixes_message() {
        let result: std::result::Result<(), ReportError> = Err(ReportError::NoBaseline {
            participant_id: ParticipantId::new("p-9"),
        });
        let err = result.context("planning report").unwrap_err();
        assert_eq!(
            err.to_string(),
            "planning report: participant p-9 has no Pre response set"
        );
    }
}
