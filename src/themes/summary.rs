use crate::core::{CohortId, Phase, QuestionId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One recurring theme found across a cohort's answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub label: String,
    pub supporting_quote_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// How a summary came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeStatus {
    Classified,
    /// Nothing to classify; no request was sent.
    NoResponses,
    Unavailable,
    Malformed,
    TimedOut,
}

impl ThemeStatus {
    /// Whether the summary is empty because of a classifier failure.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            ThemeStatus::Unavailable | ThemeStatus::Malformed | ThemeStatus::TimedOut
        )
    }
}

impl fmt::Display for ThemeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ThemeStatus::Classified => "classified",
            ThemeStatus::NoResponses => "no responses",
            ThemeStatus::Unavailable => "classifier unavailable",
            ThemeStatus::Malformed => "malformed classifier reply",
            ThemeStatus::TimedOut => "classifier timed out",
        };
        f.write_str(text)
    }
}

/// Themes of one open question across a cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSummary {
    pub cohort_id: CohortId,
    pub phase: Phase,
    pub question: QuestionId,
    /// In the order the classifier reported them.
    pub themes: Vec<Theme>,
    /// Answers that were sent for classification.
    pub total_quotes: usize,
    pub status: ThemeStatus,
}

impl ThemeSummary {
    pub fn empty(
        cohort_id: CohortId,
        phase: Phase,
        question: QuestionId,
        total_quotes: usize,
        status: ThemeStatus,
    ) -> Self {
        Self {
            cohort_id,
            phase,
            question,
            themes: Vec::new(),
            total_quotes,
            status,
        }
    }
}

/// Report lines such as "Delegation models (mentioned by 3/8 participants)".
///
/// Themes without a count, or summaries without quotes, render as the bare
/// label.
pub fn format_theme_lines(summary: &ThemeSummary) -> Vec<String> {
    summary
        .themes
        .iter()
        .map(|theme| {
            if theme.supporting_quote_count > 0 && summary.total_quotes > 0 {
                format!(
                    "{} (mentioned by {}/{} participants)",
                    theme.label, theme.supporting_quote_count, summary.total_quotes
                )
            } else {
                theme.label.clone()
            }
        })
        .collect()
}
