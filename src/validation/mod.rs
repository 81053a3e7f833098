//! Response validation with error accumulation.
//!
//! A submission is checked against the catalog for completeness and value
//! range. Every problem is collected instead of stopping at the first one, so
//! a participant can be shown one complete correction list.
//!
//! Errors are grouped by kind: all missing ids land in a single
//! [`ResponseError::IncompleteResponse`], all out-of-range items in a single
//! [`ResponseError::OutOfRangeValue`], and so on.
//!
//! ```rust
//! use readiness::validation::{ResponseValidator, ResponseError};
//! use readiness::testkit::SubmissionBuilder;
//! use stillwater::Validation;
//!
//! let submission = SubmissionBuilder::pre("p-1", "spring").uniform(4).without_rating(7).build();
//! match ResponseValidator::default().validate(&submission) {
//!     Validation::Failure(errors) => {
//!         assert!(matches!(errors.head(), ResponseError::IncompleteResponse { .. }));
//!     }
//!     Validation::Success(_) => unreachable!(),
//! }
//! ```

use crate::catalog::catalog;
use crate::config::{RatingScale, ReadinessConfig, ValidationRules};
use crate::core::{ItemId, ParticipantId, Phase, QuestionId, ResponseSet, ResponseValue, Submission};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use stillwater::{NonEmptyVec, Validation};
use thiserror::Error;
use tracing::debug;

/// Validation result carrying every accumulated error.
pub type ResponseValidation<T> = Validation<T, NonEmptyVec<ResponseError>>;

/// Which bound a rating violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bound {
    BelowMinimum { min: i32 },
    AboveMaximum { max: i32 },
    /// Free text where a rating was expected.
    NotARating,
    /// `skipped` on a rated item while skips are disallowed.
    SkipNotAllowed,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::BelowMinimum { min } => write!(f, "below minimum {}", min),
            Bound::AboveMaximum { max } => write!(f, "above maximum {}", max),
            Bound::NotARating => f.write_str("not a rating"),
            Bound::SkipNotAllowed => f.write_str("skipping is not allowed"),
        }
    }
}

/// One rated item that failed the range check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeViolation {
    pub item: ItemId,
    pub value: ResponseValue,
    pub bound: Bound,
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {} ({})", self.item, self.bound)
    }
}

/// Recoverable validation failures; the caller re-prompts the participant.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum ResponseError {
    #[error("incomplete response: missing items [{}], missing questions [{}]", join(.missing_items), join(.missing_questions))]
    IncompleteResponse {
        missing_items: Vec<ItemId>,
        missing_questions: Vec<QuestionId>,
    },

    #[error("out of range values: {}", join(.violations))]
    OutOfRangeValue { violations: Vec<RangeViolation> },

    #[error("blank or non-text answers to open questions [{}]", join(.questions))]
    InvalidFreeText { questions: Vec<QuestionId> },

    #[error("unknown ids: items [{}], questions [{}]", join(.items), join(.questions))]
    UnknownItem { items: Vec<u8>, questions: Vec<u8> },
}

fn join<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Owned list of errors for `Result`-based callers.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{} validation error(s): {}", .0.len(), join(.0))]
pub struct ResponseErrors(pub Vec<ResponseError>);

impl From<NonEmptyVec<ResponseError>> for ResponseErrors {
    fn from(errors: NonEmptyVec<ResponseError>) -> Self {
        Self(errors.into_iter().collect())
    }
}

/// Checks submissions against the catalog, the rating scale and the rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseValidator {
    scale: RatingScale,
    rules: ValidationRules,
}

impl ResponseValidator {
    pub fn new(scale: RatingScale, rules: ValidationRules) -> Self {
        Self { scale, rules }
    }

    pub fn from_config(config: &ReadinessConfig) -> Self {
        Self::new(config.scale, config.validation)
    }

    pub fn scale(&self) -> RatingScale {
        self.scale
    }

    /// Validate one submission, accumulating every problem.
    pub fn validate(&self, submission: &Submission) -> ResponseValidation<ResponseSet> {
        let errors: Vec<ResponseError> = [
            self.check_unknown_ids(submission),
            self.check_completeness(submission),
            self.check_ratings(submission),
            self.check_free_text(submission),
        ]
        .into_iter()
        .flatten()
        .collect();

        match NonEmptyVec::from_vec(errors) {
            None => Validation::Success(build_response_set(submission)),
            Some(errors) => {
                debug!(
                    participant = %submission.participant_id,
                    phase = %submission.phase,
                    error_count = errors.len(),
                    "Submission rejected"
                );
                Validation::Failure(errors)
            }
        }
    }

    /// `Result` flavour of [`validate`](Self::validate).
    pub fn validate_result(&self, submission: &Submission) -> Result<ResponseSet, ResponseErrors> {
        match self.validate(submission) {
            Validation::Success(set) => Ok(set),
            Validation::Failure(errors) => Err(errors.into()),
        }
    }

    /// Validate many submissions, keeping valid sets and rejections apart.
    pub fn validate_all(&self, submissions: &[Submission]) -> ValidatedBatch {
        let mut batch = ValidatedBatch::default();
        for submission in submissions {
            match self.validate(submission) {
                Validation::Success(set) => batch.valid.push(set),
                Validation::Failure(errors) => batch.rejected.push(Rejection {
                    participant_id: submission.participant_id.clone(),
                    phase: submission.phase,
                    errors: errors.into_iter().collect(),
                }),
            }
        }
        batch
    }

    /// Check a stored response set for unknown ids and out-of-range values.
    ///
    /// Stored sets may be partial, so completeness is not required.
    pub fn check_stored(&self, set: &ResponseSet) -> Result<(), ResponseErrors> {
        let submission = Submission::from(set);
        let errors: Vec<ResponseError> = [
            self.check_unknown_ids(&submission),
            self.check_ratings(&submission),
            self.check_free_text(&submission),
        ]
        .into_iter()
        .flatten()
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ResponseErrors(errors))
        }
    }

    fn check_unknown_ids(&self, submission: &Submission) -> Option<ResponseError> {
        let items: Vec<u8> = submission
            .ratings
            .keys()
            .copied()
            .filter(|id| !catalog().contains_item(*id))
            .collect();
        let questions: Vec<u8> = submission
            .open_responses
            .keys()
            .copied()
            .filter(|id| {
                catalog()
                    .open_question(submission.phase, QuestionId::new(*id))
                    .is_none()
            })
            .collect();

        (!items.is_empty() || !questions.is_empty())
            .then_some(ResponseError::UnknownItem { items, questions })
    }

    fn check_completeness(&self, submission: &Submission) -> Option<ResponseError> {
        let missing_items: Vec<ItemId> = catalog()
            .item_ids()
            .filter(|id| !submission.ratings.contains_key(&id.get()))
            .collect();
        let missing_questions: Vec<QuestionId> = if self.rules.require_open_responses {
            catalog()
                .open_questions(submission.phase)
                .map(|q| q.id)
                .filter(|id| !submission.open_responses.contains_key(&id.get()))
                .collect()
        } else {
            Vec::new()
        };

        (!missing_items.is_empty() || !missing_questions.is_empty()).then_some(
            ResponseError::IncompleteResponse {
                missing_items,
                missing_questions,
            },
        )
    }

    fn check_ratings(&self, submission: &Submission) -> Option<ResponseError> {
        let violations: Vec<RangeViolation> = submission
            .ratings
            .iter()
            .filter(|(id, _)| catalog().contains_item(**id))
            .filter_map(|(id, value)| {
                self.rating_violation(value).map(|bound| RangeViolation {
                    item: ItemId::new(*id),
                    value: value.clone(),
                    bound,
                })
            })
            .collect();

        (!violations.is_empty()).then_some(ResponseError::OutOfRangeValue { violations })
    }

    fn rating_violation(&self, value: &ResponseValue) -> Option<Bound> {
        match value {
            ResponseValue::Rating(v) if *v < self.scale.min => {
                Some(Bound::BelowMinimum { min: self.scale.min })
            }
            ResponseValue::Rating(v) if *v > self.scale.max => {
                Some(Bound::AboveMaximum { max: self.scale.max })
            }
            ResponseValue::Rating(_) => None,
            ResponseValue::Text(_) => Some(Bound::NotARating),
            ResponseValue::Skipped if self.rules.allow_skipped_ratings => None,
            ResponseValue::Skipped => Some(Bound::SkipNotAllowed),
        }
    }

    fn check_free_text(&self, submission: &Submission) -> Option<ResponseError> {
        let questions: Vec<QuestionId> = submission
            .open_responses
            .iter()
            .map(|(id, value)| (QuestionId::new(*id), value))
            .filter(|(id, _)| catalog().open_question(submission.phase, *id).is_some())
            .filter(|(_, value)| !is_acceptable_free_text(value))
            .map(|(id, _)| id)
            .collect();

        (!questions.is_empty()).then_some(ResponseError::InvalidFreeText { questions })
    }
}

fn is_acceptable_free_text(value: &ResponseValue) -> bool {
    match value {
        ResponseValue::Text(text) => !text.trim().is_empty(),
        ResponseValue::Skipped => true,
        ResponseValue::Rating(_) => false,
    }
}

fn build_response_set(submission: &Submission) -> ResponseSet {
    let responses: BTreeMap<ItemId, ResponseValue> = submission
        .ratings
        .iter()
        .map(|(id, value)| (ItemId::new(*id), value.clone()))
        .collect();
    let open_responses: BTreeMap<QuestionId, ResponseValue> = submission
        .open_responses
        .iter()
        .map(|(id, value)| (QuestionId::new(*id), value.clone()))
        .collect();

    ResponseSet::from_parts(
        submission.participant_id.clone(),
        submission.cohort_id.clone(),
        submission.phase,
        submission.submitted_at,
        responses,
        open_responses,
    )
}

/// A submission that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub participant_id: ParticipantId,
    pub phase: Phase,
    pub errors: Vec<ResponseError>,
}

/// Outcome of validating several submissions.
#[derive(Debug, Clone, Default)]
pub struct ValidatedBatch {
    pub valid: Vec<ResponseSet>,
    pub rejected: Vec<Rejection>,
}

impl ValidatedBatch {
    pub fn is_all_valid(&self) -> bool {
        self.rejected.is_empty()
    }
}
