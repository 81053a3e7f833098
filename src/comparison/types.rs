use crate::catalog::{Focus, Indicator};
use crate::core::{CohortId, ItemId, ParticipantId};
use crate::scoring::ScoreCard;
use serde::{Deserialize, Serialize};

/// Pre/post scores of one indicator.
///
/// `delta` is present only when both sides are; it never defaults to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDelta {
    pub indicator: Indicator,
    pub pre_score: Option<f64>,
    pub post_score: Option<f64>,
    pub delta: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusDelta {
    pub focus: Focus,
    pub pre_score: Option<f64>,
    pub post_score: Option<f64>,
    pub delta: Option<f64>,
}

/// Change on one item rated numerically in both phases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemDelta {
    pub item: ItemId,
    pub pre: f64,
    pub post: f64,
    pub delta: f64,
}

/// A participant's progress between the Pre and Post phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantComparison {
    pub participant_id: ParticipantId,
    pub cohort_id: CohortId,
    /// One entry per indicator, in [`Indicator::ALL`] order.
    pub indicators: Vec<IndicatorDelta>,
    pub focus: Vec<FocusDelta>,
    /// Ordered by item id.
    pub items: Vec<ItemDelta>,
    pub all_items_delta: Option<f64>,
}

impl ParticipantComparison {
    pub fn indicator(&self, indicator: Indicator) -> Option<&IndicatorDelta> {
        self.indicators.iter().find(|d| d.indicator == indicator)
    }

    pub fn delta(&self, indicator: Indicator) -> Option<f64> {
        self.indicator(indicator).and_then(|d| d.delta)
    }

    pub fn item(&self, item: ItemId) -> Option<&ItemDelta> {
        self.items.iter().find(|d| d.item == item)
    }

    /// Largest item gains first; equal gains listed by item id.
    pub fn most_improved_items(&self, n: usize) -> Vec<&ItemDelta> {
        let mut ranked: Vec<&ItemDelta> = self.items.iter().collect();
        ranked.sort_by(|a, b| b.delta.total_cmp(&a.delta).then(a.item.cmp(&b.item)));
        ranked.truncate(n);
        ranked
    }

    /// Whether the mean over all answered items went up.
    pub fn improved(&self) -> bool {
        self.all_items_delta.is_some_and(|d| d > 0.0)
    }
}

/// A comparison together with the score cards it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredComparison {
    pub pre: ScoreCard,
    pub post: ScoreCard,
    pub comparison: ParticipantComparison,
}
