//! Free-text theme classification.
//!
//! Answers to an open question are normalized, stripped of participant
//! identity and sent as one batch to a [`ThemeClassifier`]. The reply is
//! parsed into a [`ThemeSummary`]. Classifier trouble of any kind yields an
//! empty summary whose `status` says what went wrong; report generation
//! carries on either way.

pub mod adapter;
pub mod anonymize;
pub mod classifier;
pub mod command;
pub mod summary;

pub use adapter::ThemeClassifierAdapter;
pub use anonymize::{normalize_answer, QuoteBatch, QuoteLedger};
pub use classifier::{
    parse_reply, ClassifierError, ClassifierRequest, ThemeClassifier, MAX_CONTEXT_QUOTES,
};
pub use command::{classifier_from_config, CommandClassifier, UnavailableClassifier};
pub use summary::{format_theme_lines, Theme, ThemeStatus, ThemeSummary};
