use crate::catalog::{Focus, Indicator};
use crate::core::{CohortId, ItemId, Phase};
use crate::scoring::Distribution;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Spread of participant scores for one indicator or focus tag.
///
/// `mean` is a mean of participant means, not a pooled item average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    /// Participants with a non-absent score.
    pub participant_count: usize,
}

impl From<Distribution> for ScoreStats {
    fn from(d: Distribution) -> Self {
        Self {
            mean: d.mean,
            min: d.min,
            max: d.max,
            std_dev: d.std_dev,
            participant_count: d.count,
        }
    }
}

/// Cohort average of a single item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemAverage {
    pub item: ItemId,
    pub mean: f64,
    pub response_count: usize,
}

/// Cohort-level statistics for one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortBenchmark {
    pub cohort_id: CohortId,
    pub phase: Phase,
    /// Participants whose set was included.
    pub participant_count: usize,
    pub indicators: BTreeMap<Indicator, ScoreStats>,
    pub focus: BTreeMap<Focus, ScoreStats>,
    pub all_items: Option<ScoreStats>,
    pub items: BTreeMap<ItemId, ItemAverage>,
}

impl CohortBenchmark {
    pub fn empty(cohort_id: CohortId, phase: Phase) -> Self {
        Self {
            cohort_id,
            phase,
            participant_count: 0,
            indicators: BTreeMap::new(),
            focus: BTreeMap::new(),
            all_items: None,
            items: BTreeMap::new(),
        }
    }

    pub fn indicator(&self, indicator: Indicator) -> Option<&ScoreStats> {
        self.indicators.get(&indicator)
    }

    pub fn mean(&self, indicator: Indicator) -> Option<f64> {
        self.indicator(indicator).map(|s| s.mean)
    }

    pub fn is_empty(&self) -> bool {
        self.participant_count == 0
    }
}
