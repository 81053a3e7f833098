use crate::catalog::{Focus, Indicator, ItemCatalog};
use crate::cohort::benchmark::{CohortBenchmark, ItemAverage, ScoreStats};
use crate::comparison::latest_per_participant;
use crate::core::{CohortId, ItemId, Phase, ResponseSet};
use crate::scoring::{stats, Distribution, IndicatorScorer, ScoreCard};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info_span};

/// Builds cohort benchmarks from individual response sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct CohortAggregator<'a> {
    scorer: IndicatorScorer<'a>,
}

impl<'a> CohortAggregator<'a> {
    pub fn new(scorer: IndicatorScorer<'a>) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> IndicatorScorer<'a> {
        self.scorer
    }

    /// The sets that count for `cohort_id` and `phase`: one per participant,
    /// the latest submitted.
    pub fn select<'s>(
        &self,
        cohort_id: &CohortId,
        phase: Phase,
        sets: &'s [ResponseSet],
    ) -> Vec<&'s ResponseSet> {
        latest_per_participant(sets.iter().filter(|s| s.cohort_id() == cohort_id), phase)
            .into_values()
            .collect()
    }

    /// Score every selected set on the rayon pool.
    pub fn score_cards(
        &self,
        cohort_id: &CohortId,
        phase: Phase,
        sets: &[ResponseSet],
    ) -> Vec<ScoreCard> {
        self.select(cohort_id, phase, sets)
            .par_iter()
            .map(|set| self.scorer.score(set))
            .collect()
    }

    /// Per-indicator mean-of-means, extremes and spread for one cohort and
    /// phase. Sets from other cohorts or phases are ignored.
    pub fn benchmark(
        &self,
        cohort_id: &CohortId,
        phase: Phase,
        sets: &[ResponseSet],
    ) -> CohortBenchmark {
        let _span = info_span!("cohort_benchmark", cohort = %cohort_id, phase = %phase).entered();

        let selected = self.select(cohort_id, phase, sets);
        if selected.is_empty() {
            debug!("No response sets for cohort phase");
            return CohortBenchmark::empty(cohort_id.clone(), phase);
        }

        let cards: Vec<ScoreCard> = selected
            .par_iter()
            .map(|set| self.scorer.score(set))
            .collect();

        let indicators = Indicator::ALL
            .iter()
            .filter_map(|&indicator| {
                let values: Vec<f64> = cards.iter().filter_map(|c| c.score(indicator)).collect();
                summarize(&values).map(|stats| (indicator, stats))
            })
            .collect();

        let focus = Focus::ALL
            .iter()
            .filter_map(|&focus| {
                let values: Vec<f64> = cards.iter().filter_map(|c| c.focus_score(focus)).collect();
                summarize(&values).map(|stats| (focus, stats))
            })
            .collect();

        let all_values: Vec<f64> = cards.iter().filter_map(|c| c.all_items_mean).collect();

        let benchmark = CohortBenchmark {
            cohort_id: cohort_id.clone(),
            phase,
            participant_count: selected.len(),
            indicators,
            focus,
            all_items: summarize(&all_values),
            items: item_averages(self.scorer.catalog(), &selected),
        };

        debug!(
            participants = benchmark.participant_count,
            indicators = benchmark.indicators.len(),
            "Cohort benchmark built"
        );
        benchmark
    }
}

/// Benchmark with the process-wide catalog.
pub fn benchmark_cohort(cohort_id: &CohortId, phase: Phase, sets: &[ResponseSet]) -> CohortBenchmark {
    CohortAggregator::default().benchmark(cohort_id, phase, sets)
}

fn summarize(values: &[f64]) -> Option<ScoreStats> {
    Distribution::from_values(values).map(ScoreStats::from)
}

fn item_averages(catalog: &ItemCatalog, selected: &[&ResponseSet]) -> BTreeMap<ItemId, ItemAverage> {
    let mut ratings: BTreeMap<ItemId, Vec<f64>> = BTreeMap::new();
    for set in selected {
        for item in catalog.item_ids() {
            if let Some(value) = set.rating(item) {
                ratings.entry(item).or_default().push(value);
            }
        }
    }

    ratings
        .into_iter()
        .filter_map(|(item, values)| {
            let mean = stats::mean(&values)?;
            Some((
                item,
                ItemAverage {
                    item,
                    mean,
                    response_count: values.len(),
                },
            ))
        })
        .collect()
}
