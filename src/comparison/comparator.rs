use crate::catalog::{Focus, Indicator};
use crate::comparison::types::*;
use crate::core::{CohortId, ParticipantId, Phase, ResponseSet};
use crate::scoring::{IndicatorScorer, ScoreCard};
use thiserror::Error;
use tracing::debug;

/// Reasons a comparison cannot be produced.
///
/// `MissingPhase` is an expected state rather than a failure: the caller
/// falls back to baseline-only reporting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComparisonError {
    #[error("no {missing} response set for participant {}", display_participant(.participant_id))]
    MissingPhase {
        participant_id: Option<ParticipantId>,
        missing: Phase,
    },

    #[error("response sets belong to different participants ({pre} vs {post})")]
    ParticipantMismatch {
        pre: ParticipantId,
        post: ParticipantId,
    },

    #[error("expected a {expected} response set but found {found}")]
    PhaseMismatch { expected: Phase, found: Phase },

    #[error("participant {participant_id} moved from cohort {pre} to {post}")]
    CohortMismatch {
        participant_id: ParticipantId,
        pre: CohortId,
        post: CohortId,
    },
}

fn display_participant(id: &Option<ParticipantId>) -> String {
    id.as_ref()
        .map_or_else(|| "<unknown>".to_string(), ToString::to_string)
}

impl ComparisonError {
    /// True when the caller should render a baseline report instead.
    pub fn is_baseline_only(&self) -> bool {
        matches!(self, ComparisonError::MissingPhase { .. })
    }
}

/// Pairs a participant's Pre and Post response sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator<'a> {
    scorer: IndicatorScorer<'a>,
}

impl<'a> Comparator<'a> {
    pub fn new(scorer: IndicatorScorer<'a>) -> Self {
        Self { scorer }
    }

    /// Perform full comparison
    pub fn compare(
        &self,
        pre: Option<&ResponseSet>,
        post: Option<&ResponseSet>,
    ) -> Result<ParticipantComparison, ComparisonError> {
        self.compare_scoring(pre, post).map(|scored| scored.comparison)
    }

    /// Like [`compare`](Self::compare), keeping both score cards.
    pub fn compare_scoring(
        &self,
        pre: Option<&ResponseSet>,
        post: Option<&ResponseSet>,
    ) -> Result<ScoredComparison, ComparisonError> {
        let (pre, post) = Self::require_both(pre, post)?;
        Self::check_pairing(pre, post)?;

        let pre_card = self.scorer.score(pre);
        let post_card = self.scorer.score(post);
        let comparison = self.compare_scored(pre, &pre_card, post, &post_card);

        debug!(
            participant = %comparison.participant_id,
            item_deltas = comparison.items.len(),
            "Participant comparison built"
        );
        Ok(ScoredComparison {
            pre: pre_card,
            post: post_card,
            comparison,
        })
    }

    /// Build a comparison from sets that were already scored.
    pub fn compare_scored(
        &self,
        pre: &ResponseSet,
        pre_card: &ScoreCard,
        post: &ResponseSet,
        post_card: &ScoreCard,
    ) -> ParticipantComparison {
        let indicators = Indicator::ALL
            .iter()
            .map(|&indicator| {
                let (pre_score, post_score, delta) =
                    paired(pre_card.score(indicator), post_card.score(indicator));
                IndicatorDelta {
                    indicator,
                    pre_score,
                    post_score,
                    delta,
                }
            })
            .collect();

        let focus = Focus::ALL
            .iter()
            .map(|&focus| {
                let (pre_score, post_score, delta) =
                    paired(pre_card.focus_score(focus), post_card.focus_score(focus));
                FocusDelta {
                    focus,
                    pre_score,
                    post_score,
                    delta,
                }
            })
            .collect();

        let items = self
            .scorer
            .catalog()
            .item_ids()
            .filter_map(|item| {
                let before = pre.rating(item)?;
                let after = post.rating(item)?;
                Some(ItemDelta {
                    item,
                    pre: before,
                    post: after,
                    delta: after - before,
                })
            })
            .collect();

        ParticipantComparison {
            participant_id: post.participant_id().clone(),
            cohort_id: post.cohort_id().clone(),
            indicators,
            focus,
            items,
            all_items_delta: paired(pre_card.all_items_mean, post_card.all_items_mean).2,
        }
    }

    fn require_both<'s>(
        pre: Option<&'s ResponseSet>,
        post: Option<&'s ResponseSet>,
    ) -> Result<(&'s ResponseSet, &'s ResponseSet), ComparisonError> {
        match (pre, post) {
            (Some(pre), Some(post)) => Ok((pre, post)),
            (None, other) => Err(ComparisonError::MissingPhase {
                participant_id: other.map(|s| s.participant_id().clone()),
                missing: Phase::Pre,
            }),
            (Some(pre), None) => Err(ComparisonError::MissingPhase {
                participant_id: Some(pre.participant_id().clone()),
                missing: Phase::Post,
            }),
        }
    }

    fn check_pairing(pre: &ResponseSet, post: &ResponseSet) -> Result<(), ComparisonError> {
        for (set, expected) in [(pre, Phase::Pre), (post, Phase::Post)] {
            if set.phase() != expected {
                return Err(ComparisonError::PhaseMismatch {
                    expected,
                    found: set.phase(),
                });
            }
        }
        if pre.participant_id() != post.participant_id() {
            return Err(ComparisonError::ParticipantMismatch {
                pre: pre.participant_id().clone(),
                post: post.participant_id().clone(),
            });
        }
        if pre.cohort_id() != post.cohort_id() {
            return Err(ComparisonError::CohortMismatch {
                participant_id: pre.participant_id().clone(),
                pre: pre.cohort_id().clone(),
                post: post.cohort_id().clone(),
            });
        }
        Ok(())
    }
}

/// Compare with the process-wide catalog.
pub fn compare_participant(
    pre: Option<&ResponseSet>,
    post: Option<&ResponseSet>,
) -> Result<ParticipantComparison, ComparisonError> {
    Comparator::default().compare(pre, post)
}

fn paired(pre: Option<f64>, post: Option<f64>) -> (Option<f64>, Option<f64>, Option<f64>) {
    let delta = match (pre, post) {
        (Some(before), Some(after)) => Some(after - before),
        _ => None,
    };
    (pre, post, delta)
}
