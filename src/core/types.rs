//! Common type definitions shared by every stage of the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a participant as assigned by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of a cohort (the benchmarking population).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CohortId(String);

impl CohortId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CohortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CohortId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Catalog number of a rated item (1..=32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u8);

impl ItemId {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of an open (free-text) question within a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(u8);

impl QuestionId {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// Assessment phase: before or after the programme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Pre,
    Post,
}

impl Phase {
    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Pre => "Pre",
            Phase::Post => "Post",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single answer: a Likert rating, free text, or an explicit skip.
///
/// Ratings are kept as `i32` so that out-of-range submissions survive
/// deserialization and can be reported by the validator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseValue {
    Rating(i32),
    Text(String),
    Skipped,
}

impl ResponseValue {
    /// Numeric value if this is a rating.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            ResponseValue::Rating(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ResponseValue::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ResponseValue::Skipped)
    }
}

/// Candidate response set as submitted, before validation.
///
/// Keys are raw catalog numbers so unknown ids can be reported instead of
/// failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub participant_id: ParticipantId,
    pub cohort_id: CohortId,
    pub phase: Phase,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub ratings: BTreeMap<u8, ResponseValue>,
    #[serde(default)]
    pub open_responses: BTreeMap<u8, ResponseValue>,
}

impl From<&ResponseSet> for Submission {
    fn from(set: &ResponseSet) -> Self {
        Self {
            participant_id: set.participant_id.clone(),
            cohort_id: set.cohort_id.clone(),
            phase: set.phase,
            submitted_at: set.submitted_at,
            ratings: set
                .responses
                .iter()
                .map(|(id, value)| (id.get(), value.clone()))
                .collect(),
            open_responses: set
                .open_responses
                .iter()
                .map(|(id, value)| (id.get(), value.clone()))
                .collect(),
        }
    }
}

/// A participant's answers for one phase.
///
/// Built by the validator or loaded from persistence. The phase has no
/// setter; edits produce a new set with the same identity and phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSet {
    participant_id: ParticipantId,
    cohort_id: CohortId,
    phase: Phase,
    submitted_at: DateTime<Utc>,
    responses: BTreeMap<ItemId, ResponseValue>,
    #[serde(default)]
    open_responses: BTreeMap<QuestionId, ResponseValue>,
}

impl ResponseSet {
    pub(crate) fn from_parts(
        participant_id: ParticipantId,
        cohort_id: CohortId,
        phase: Phase,
        submitted_at: DateTime<Utc>,
        responses: BTreeMap<ItemId, ResponseValue>,
        open_responses: BTreeMap<QuestionId, ResponseValue>,
    ) -> Self {
        Self {
            participant_id,
            cohort_id,
            phase,
            submitted_at,
            responses,
            open_responses,
        }
    }

    pub fn participant_id(&self) -> &ParticipantId {
        &self.participant_id
    }

    pub fn cohort_id(&self) -> &CohortId {
        &self.cohort_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    pub fn responses(&self) -> &BTreeMap<ItemId, ResponseValue> {
        &self.responses
    }

    pub fn open_responses(&self) -> &BTreeMap<QuestionId, ResponseValue> {
        &self.open_responses
    }

    pub fn response(&self, item: ItemId) -> Option<&ResponseValue> {
        self.responses.get(&item)
    }

    /// Numeric rating for an item, `None` when missing, skipped or text.
    pub fn rating(&self, item: ItemId) -> Option<f64> {
        self.responses.get(&item).and_then(ResponseValue::numeric)
    }

    pub fn open_response(&self, question: QuestionId) -> Option<&ResponseValue> {
        self.open_responses.get(&question)
    }

    /// Late edit: replace (or add) one item's value.
    #[must_use]
    pub fn with_response(mut self, item: ItemId, value: ResponseValue) -> Self {
        self.responses.insert(item, value);
        self
    }

    /// Late edit: drop one item's value entirely.
    #[must_use]
    pub fn without_response(mut self, item: ItemId) -> Self {
        self.responses.remove(&item);
        self
    }

    #[must_use]
    pub fn with_open_response(mut self, question: QuestionId, value: ResponseValue) -> Self {
        self.open_responses.insert(question, value);
        self
    }

    /// Re-stamp the set, as a resubmission would.
    #[must_use]
    pub fn with_submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }
}
