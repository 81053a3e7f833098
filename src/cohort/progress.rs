use crate::catalog::{catalog, Indicator};
use crate::cohort::aggregator::CohortAggregator;
use crate::cohort::benchmark::CohortBenchmark;
use crate::comparison::{pair_by_participant, Comparator, ParticipantComparison};
use crate::config::RatingScale;
use crate::core::{CohortId, Phase, ResponseSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Cohort-wide movement between the Pre and Post phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortProgress {
    pub cohort_id: CohortId,
    pub pre_count: usize,
    pub post_count: usize,
    /// Participants with both a Pre and a Post set.
    pub matched_count: usize,
    /// Post benchmark mean minus Pre benchmark mean.
    pub indicator_deltas: BTreeMap<Indicator, f64>,
    pub all_items_delta: Option<f64>,
    /// Share of matched participants whose all-items mean went up.
    pub share_improved: Option<f64>,
    /// Share of Post ratings at or above the agreement threshold.
    pub share_agree_or_above: Option<f64>,
}

impl<'a> CohortAggregator<'a> {
    /// Benchmark both phases and summarize the cohort's progress.
    pub fn summarize_progress(
        &self,
        cohort_id: &CohortId,
        sets: &[ResponseSet],
        scale: &RatingScale,
    ) -> CohortProgress {
        let pre = self.benchmark(cohort_id, Phase::Pre, sets);
        let post = self.benchmark(cohort_id, Phase::Post, sets);
        self.progress_between(&pre, &post, sets, scale)
    }

    /// Progress given benchmarks the caller already holds.
    pub fn progress_between(
        &self,
        pre: &CohortBenchmark,
        post: &CohortBenchmark,
        sets: &[ResponseSet],
        scale: &RatingScale,
    ) -> CohortProgress {
        let comparisons = self.matched_comparisons(&post.cohort_id, sets);
        let improved = comparisons.iter().filter(|c| c.improved()).count();

        let indicator_deltas = Indicator::ALL
            .iter()
            .filter_map(|&indicator| {
                Some((indicator, post.mean(indicator)? - pre.mean(indicator)?))
            })
            .collect();
        let all_items_delta = match (pre.all_items, post.all_items) {
            (Some(before), Some(after)) => Some(after.mean - before.mean),
            _ => None,
        };

        let progress = CohortProgress {
            cohort_id: post.cohort_id.clone(),
            pre_count: pre.participant_count,
            post_count: post.participant_count,
            matched_count: comparisons.len(),
            indicator_deltas,
            all_items_delta,
            share_improved: share(improved, comparisons.len()),
            share_agree_or_above: self.agreement_share(&post.cohort_id, sets, scale),
        };
        debug!(
            cohort = %progress.cohort_id,
            matched = progress.matched_count,
            "Cohort progress summarized"
        );
        progress
    }

    /// Comparisons for every participant of the cohort with both phases.
    pub fn matched_comparisons(
        &self,
        cohort_id: &CohortId,
        sets: &[ResponseSet],
    ) -> Vec<ParticipantComparison> {
        let pairs: Vec<_> = pair_by_participant(sets.iter().filter(|s| s.cohort_id() == cohort_id))
            .into_values()
            .filter(|pair| pair.is_complete())
            .collect();

        let comparator = Comparator::new(self.scorer());
        pairs
            .par_iter()
            .filter_map(|pair| match comparator.compare(pair.pre, pair.post) {
                Ok(comparison) => Some(comparison),
                Err(err) => {
                    warn!(error = %err, "Skipping participant in cohort progress");
                    None
                }
            })
            .collect()
    }

    fn agreement_share(
        &self,
        cohort_id: &CohortId,
        sets: &[ResponseSet],
        scale: &RatingScale,
    ) -> Option<f64> {
        let ratings: Vec<f64> = self
            .select(cohort_id, Phase::Post, sets)
            .into_iter()
            .flat_map(|set| catalog().item_ids().filter_map(move |item| set.rating(item)))
            .collect();
        let agreeing = ratings.iter().filter(|r| scale.is_agreement(**r)).count();
        share(agreeing, ratings.len())
    }
}

fn share(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64)
}
