use crate::catalog::OpenQuestion;
use crate::core::{CohortId, Phase, QuestionId};
use crate::themes::summary::Theme;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Most earlier answers quoted as context for a follow-up question.
pub const MAX_CONTEXT_QUOTES: usize = 10;

/// A batch of anonymized answers to one question.
///
/// Quotes carry no participant identifiers. `context_quotes` holds the
/// earlier answers a follow-up question looks back on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifierRequest {
    pub cohort_id: CohortId,
    pub phase: Phase,
    pub question_id: QuestionId,
    pub prompt: String,
    pub quotes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context_quotes: Vec<String>,
}

impl ClassifierRequest {
    pub fn new(
        cohort_id: CohortId,
        question: &OpenQuestion,
        quotes: Vec<String>,
        max_themes: usize,
    ) -> Self {
        Self {
            cohort_id,
            phase: question.phase,
            question_id: question.id,
            prompt: build_prompt(question, quotes.len(), max_themes),
            quotes,
            context_quotes: Vec::new(),
        }
    }

    /// Request for a follow-up question, asking how the earlier answers in
    /// `context_quotes` were addressed. At most [`MAX_CONTEXT_QUOTES`] are
    /// kept; without any it is a plain request.
    pub fn reflecting(
        cohort_id: CohortId,
        question: &OpenQuestion,
        quotes: Vec<String>,
        mut context_quotes: Vec<String>,
        max_themes: usize,
    ) -> Self {
        context_quotes.truncate(MAX_CONTEXT_QUOTES);
        if context_quotes.is_empty() {
            return Self::new(cohort_id, question, quotes, max_themes);
        }
        Self {
            cohort_id,
            phase: question.phase,
            question_id: question.id,
            prompt: build_reflection_prompt(quotes.len(), &context_quotes, max_themes),
            quotes,
            context_quotes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierError {
    #[error("theme classifier unavailable: {0}")]
    Unavailable(String),

    #[error("theme classifier returned a malformed reply: {0}")]
    Malformed(String),

    #[error("theme classifier did not answer within {0:?}")]
    TimedOut(Duration),
}

/// A theme-extraction backend.
///
/// Implementations block; the adapter runs them on the blocking pool and
/// stops waiting at its timeout. A call that outlives the timeout keeps its
/// thread, so backends holding external resources bound themselves too.
pub trait ThemeClassifier: Send + Sync {
    /// Returns the raw reply text.
    fn classify(&self, request: &ClassifierRequest) -> Result<String, ClassifierError>;

    fn name(&self) -> &str {
        "classifier"
    }
}

fn build_prompt(question: &OpenQuestion, quote_count: usize, max_themes: usize) -> String {
    format!(
        "Analyse these {quote_count} responses to the question about \"{context}\".\n\
         \n\
         Identify the {max_themes} most common themes with approximate frequency counts.\n\
         A response may contribute to several themes. Prefer specific themes \
         (\"feedback models\") over generic ones (\"communication skills\") and \
         pick a short representative quote for each.\n\
         \n\
         Reply with JSON only, in this format:\n\
         {{\"themes\": [{{\"theme\": \"Brief theme description\", \"count\": N, \"example\": \"Short quote\"}}]}}",
        context = question.theme_context,
    )
}

fn build_reflection_prompt(quote_count: usize, concerns: &[String], max_themes: usize) -> String {
    let concerns: String = concerns.iter().map(|c| format!("- {c}\n")).collect();
    format!(
        "Analyse how participants' pre-programme concerns were addressed.\n\
         \n\
         Concerns raised before the programme included:\n\
         {concerns}\
         \n\
         The {quote_count} responses are post-programme reflections on those concerns.\n\
         Identify up to {max_themes} themes in how concerns were resolved or addressed, \
         with approximate frequency counts. Focus on what helped alleviate concerns \
         and how perceptions changed, and pick a short quote showing the resolution \
         for each.\n\
         \n\
         Reply with JSON only, in this format:\n\
         {{\"themes\": [{{\"theme\": \"How concerns were addressed\", \"count\": N, \"example\": \"Short quote\"}}]}}",
    )
}

#[derive(Debug, Deserialize)]
struct Reply {
    themes: Vec<ReplyTheme>,
}

#[derive(Debug, Deserialize)]
struct ReplyTheme {
    theme: String,
    #[serde(default)]
    count: usize,
    #[serde(default)]
    example: Option<String>,
}

static EMBEDDED_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Parse a classifier reply into themes.
///
/// Accepts bare JSON or JSON wrapped in prose. Keeps at most `max_themes`
/// themes and clamps counts to `quote_count`.
pub fn parse_reply(
    reply: &str,
    quote_count: usize,
    max_themes: usize,
) -> Result<Vec<Theme>, ClassifierError> {
    let parsed: Reply = match serde_json::from_str(reply.trim()) {
        Ok(parsed) => parsed,
        Err(direct) => {
            let embedded = EMBEDDED_OBJECT
                .find(reply)
                .ok_or_else(|| ClassifierError::Malformed(direct.to_string()))?;
            serde_json::from_str(embedded.as_str())
                .map_err(|e| ClassifierError::Malformed(e.to_string()))?
        }
    };

    parsed
        .themes
        .into_iter()
        .take(max_themes)
        .map(|theme| {
            let label = theme.theme.trim();
            if label.is_empty() {
                return Err(ClassifierError::Malformed("theme without a label".into()));
            }
            Ok(Theme {
                label: label.to_string(),
                supporting_quote_count: theme.count.min(quote_count),
                example: theme
                    .example
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty()),
            })
        })
        .collect()
}
