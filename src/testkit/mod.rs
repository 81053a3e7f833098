//! Test fixtures for building submissions and response sets.
//!
//! Used by the unit tests, the integration tests under `tests/`, and the
//! doc examples. Everything here is in-memory and deterministic: timestamps
//! are fixed so fixtures compare equal across runs.
//!
//! ```rust
//! use readiness::testkit::SubmissionBuilder;
//!
//! let submission = SubmissionBuilder::post("p-7", "autumn")
//!     .uniform(5)
//!     .rating(31, 6)
//!     .open_response(1, "Delegation models")
//!     .build();
//! assert_eq!(submission.ratings.len(), 32);
//! ```

use crate::catalog::{catalog, ITEM_COUNT};
use crate::core::{
    CohortId, ItemId, ParticipantId, Phase, QuestionId, ResponseSet, ResponseValue, Submission,
};
use crate::themes::{ClassifierError, ClassifierRequest, ThemeClassifier};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Fixed timestamp used by fixtures (2025-03-01T09:00:00Z).
pub fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Ratings of the reference scenario: items 1-6 = 4, 7-14 = 3, 15-22 = 5,
/// 23-30 = 2, 31-32 = 4.
pub fn scenario_ratings() -> [i32; ITEM_COUNT] {
    let mut ratings = [0; ITEM_COUNT];
    for (index, rating) in ratings.iter_mut().enumerate() {
        *rating = match index + 1 {
            1..=6 => 4,
            7..=14 => 3,
            15..=22 => 5,
            23..=30 => 2,
            _ => 4,
        };
    }
    ratings
}

/// A complete response set with the given ratings, item `i + 1` = `ratings[i]`.
pub fn response_set_from_ratings(
    participant: &str,
    cohort: &str,
    phase: Phase,
    ratings: &[i32; ITEM_COUNT],
) -> ResponseSet {
    let responses = catalog()
        .item_ids()
        .zip(ratings.iter())
        .map(|(id, rating)| (id, ResponseValue::Rating(*rating)))
        .collect();
    ResponseSet::from_parts(
        ParticipantId::new(participant),
        CohortId::new(cohort),
        phase,
        fixture_time(),
        responses,
        BTreeMap::new(),
    )
}

/// A complete response set with every item rated `rating`.
pub fn uniform_response_set(
    participant: &str,
    cohort: &str,
    phase: Phase,
    rating: i32,
) -> ResponseSet {
    response_set_from_ratings(participant, cohort, phase, &[rating; ITEM_COUNT])
}

/// Response set built from explicit values, for partial or edited fixtures.
pub fn response_set_from_values(
    participant: &str,
    cohort: &str,
    phase: Phase,
    values: impl IntoIterator<Item = (u8, ResponseValue)>,
    open: impl IntoIterator<Item = (u8, ResponseValue)>,
) -> ResponseSet {
    ResponseSet::from_parts(
        ParticipantId::new(participant),
        CohortId::new(cohort),
        phase,
        fixture_time(),
        values
            .into_iter()
            .map(|(id, v)| (ItemId::new(id), v))
            .collect(),
        open.into_iter()
            .map(|(id, v)| (QuestionId::new(id), v))
            .collect(),
    )
}

/// Fluent builder for [`Submission`]s.
#[derive(Debug, Clone)]
pub struct SubmissionBuilder {
    submission: Submission,
}

impl SubmissionBuilder {
    pub fn new(participant: &str, cohort: &str, phase: Phase) -> Self {
        let open_responses = catalog()
            .open_questions(phase)
            .map(|q| {
                (
                    q.id.get(),
                    ResponseValue::Text(format!("{} answer {}", participant, q.id.get())),
                )
            })
            .collect();
        Self {
            submission: Submission {
                participant_id: ParticipantId::new(participant),
                cohort_id: CohortId::new(cohort),
                phase,
                submitted_at: fixture_time(),
                ratings: BTreeMap::new(),
                open_responses,
            },
        }
    }

    pub fn pre(participant: &str, cohort: &str) -> Self {
        Self::new(participant, cohort, Phase::Pre)
    }

    pub fn post(participant: &str, cohort: &str) -> Self {
        Self::new(participant, cohort, Phase::Post)
    }

    /// Rate every catalog item with the same value.
    pub fn uniform(mut self, rating: i32) -> Self {
        for id in catalog().item_ids() {
            self.submission
                .ratings
                .insert(id.get(), ResponseValue::Rating(rating));
        }
        self
    }

    pub fn ratings(mut self, ratings: &[i32; ITEM_COUNT]) -> Self {
        for (id, rating) in catalog().item_ids().zip(ratings.iter()) {
            self.submission
                .ratings
                .insert(id.get(), ResponseValue::Rating(*rating));
        }
        self
    }

    pub fn rating(self, item: u8, rating: i32) -> Self {
        self.response(item, ResponseValue::Rating(rating))
    }

    pub fn response(mut self, item: u8, value: ResponseValue) -> Self {
        self.submission.ratings.insert(item, value);
        self
    }

    pub fn without_rating(mut self, item: u8) -> Self {
        self.submission.ratings.remove(&item);
        self
    }

    pub fn open_response(self, question: u8, text: &str) -> Self {
        self.open_value(question, ResponseValue::Text(text.to_string()))
    }

    pub fn open_value(mut self, question: u8, value: ResponseValue) -> Self {
        self.submission.open_responses.insert(question, value);
        self
    }

    pub fn without_open_response(mut self, question: u8) -> Self {
        self.submission.open_responses.remove(&question);
        self
    }

    pub fn without_open_responses(mut self) -> Self {
        self.submission.open_responses.clear();
        self
    }

    pub fn submitted_at(mut self, at: DateTime<Utc>) -> Self {
        self.submission.submitted_at = at;
        self
    }

    pub fn build(self) -> Submission {
        self.submission
    }
}

/// In-process [`ThemeClassifier`] with a fixed outcome.
///
/// Counts calls and records the highest number of calls in flight at once.
#[derive(Debug, Clone)]
pub struct ScriptedClassifier {
    outcome: Result<String, ClassifierError>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl ScriptedClassifier {
    pub fn replying(reply: &str) -> Self {
        Self::with_outcome(Ok(reply.to_string()))
    }

    pub fn failing(error: ClassifierError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<String, ClassifierError>) -> Self {
        Self {
            outcome,
            delay: Duration::ZERO,
            calls: Arc::default(),
            in_flight: Arc::default(),
            peak: Arc::default(),
        }
    }

    /// Block for `delay` inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn peak_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.peak)
    }
}

impl ThemeClassifier for ScriptedClassifier {
    fn classify(&self, _request: &ClassifierRequest) -> Result<String, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.outcome.clone()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
