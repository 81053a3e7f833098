use crate::catalog::{catalog, Focus, Indicator, Item, ItemCatalog};
use crate::core::{CohortId, ParticipantId, Phase, ResponseSet};
use crate::scoring::stats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean of the answered items of one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorScore {
    pub indicator: Indicator,
    pub mean_value: f64,
    pub item_count: usize,
}

/// Mean of the answered items sharing one focus tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusScore {
    pub focus: Focus,
    pub mean_value: f64,
    pub item_count: usize,
}

/// Everything derived from one response set.
///
/// Indicators and focus tags with no answered item are left out of the maps:
/// an absent score is never represented as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub participant_id: ParticipantId,
    pub cohort_id: CohortId,
    pub phase: Phase,
    pub indicators: BTreeMap<Indicator, IndicatorScore>,
    pub focus: BTreeMap<Focus, FocusScore>,
    /// Mean over every answered rated item.
    pub all_items_mean: Option<f64>,
    pub rated_item_count: usize,
}

impl ScoreCard {
    pub fn indicator(&self, indicator: Indicator) -> Option<&IndicatorScore> {
        self.indicators.get(&indicator)
    }

    pub fn score(&self, indicator: Indicator) -> Option<f64> {
        self.indicator(indicator).map(|s| s.mean_value)
    }

    /// The overall score: mean of the two `Overall` items.
    pub fn overall(&self) -> Option<&IndicatorScore> {
        self.indicator(Indicator::Overall)
    }

    pub fn focus_score(&self, focus: Focus) -> Option<f64> {
        self.focus.get(&focus).map(|s| s.mean_value)
    }
}

/// Aggregates item ratings into indicator, focus and overall scores.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorScorer<'a> {
    catalog: &'a ItemCatalog,
}

impl Default for IndicatorScorer<'static> {
    fn default() -> Self {
        Self::new(catalog())
    }
}

impl<'a> IndicatorScorer<'a> {
    pub fn new(catalog: &'a ItemCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a ItemCatalog {
        self.catalog
    }

    pub fn score(&self, set: &ResponseSet) -> ScoreCard {
        let indicators = Indicator::ALL
            .iter()
            .filter_map(|&indicator| {
                let (mean_value, item_count) =
                    answered_mean(set, self.catalog.items_for(indicator))?;
                Some((
                    indicator,
                    IndicatorScore {
                        indicator,
                        mean_value,
                        item_count,
                    },
                ))
            })
            .collect();

        let focus = Focus::ALL
            .iter()
            .filter_map(|&focus| {
                let (mean_value, item_count) =
                    answered_mean(set, self.catalog.items_with_focus(focus))?;
                Some((
                    focus,
                    FocusScore {
                        focus,
                        mean_value,
                        item_count,
                    },
                ))
            })
            .collect();

        let all = answered_mean(set, self.catalog.items().iter());

        ScoreCard {
            participant_id: set.participant_id().clone(),
            cohort_id: set.cohort_id().clone(),
            phase: set.phase(),
            indicators,
            focus,
            all_items_mean: all.map(|(mean, _)| mean),
            rated_item_count: all.map_or(0, |(_, count)| count),
        }
    }
}

/// Score one response set against the process-wide catalog.
pub fn score_response_set(set: &ResponseSet) -> ScoreCard {
    IndicatorScorer::default().score(set)
}

// Missing, skipped and text answers are excluded from both mean and count.
fn answered_mean<'i>(
    set: &ResponseSet,
    items: impl Iterator<Item = &'i Item>,
) -> Option<(f64, usize)> {
    let values: Vec<f64> = items.filter_map(|item| set.rating(item.id)).collect();
    stats::mean(&values).map(|mean| (mean, values.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ItemId, ResponseValue};
    use crate::testkit::{response_set_from_ratings, scenario_ratings};
    use pretty_assertions::assert_eq;

    #[test]
    fn scenario_scores_match_expected_means() {
        let set = response_set_from_ratings("p-1", "c-1", Phase::Pre, &scenario_ratings());
        let card = score_response_set(&set);

        assert_eq!(card.score(Indicator::SelfReadiness), Some(4.0));
        assert_eq!(card.score(Indicator::PracticalReadiness), Some(3.0));
        assert_eq!(card.score(Indicator::ProfessionalReadiness), Some(5.0));
        assert_eq!(card.score(Indicator::TeamReadiness), Some(2.0));
        assert_eq!(card.overall().map(|s| s.mean_value), Some(4.0));
    }

    #[test]
    fn item_counts_partition_the_catalog() {
        let set = response_set_from_ratings("p-1", "c-1", Phase::Pre, &scenario_ratings());
        let card = score_response_set(&set);

        let counts: Vec<usize> = Indicator::ALL
            .iter()
            .map(|i| card.indicator(*i).unwrap().item_count)
            .collect();
        assert_eq!(counts, vec![6, 8, 8, 8, 2]);
        assert_eq!(counts.iter().sum::<usize>(), 32);
        assert_eq!(card.rated_item_count, 32);
    }

    #[test]
    fn skipped_and_missing_items_are_excluded() {
        let set = response_set_from_ratings("p-1", "c-1", Phase::Pre, &scenario_ratings())
            .with_response(ItemId::new(1), ResponseValue::Skipped)
            .with_response(ItemId::new(2), ResponseValue::Rating(1))
            .without_response(ItemId::new(3));
        let card = score_response_set(&set);

        let self_score = card.indicator(Indicator::SelfReadiness).unwrap();
        // items 2, 4, 5, 6 remain: (1 + 4 + 4 + 4) / 4
        assert_eq!(self_score.item_count, 4);
        assert_eq!(self_score.mean_value, 13.0 / 4.0);
    }

    #[test]
    fn indicator_with_no_answers_is_absent() {
        let set = response_set_from_ratings("p-1", "c-1", Phase::Post, &scenario_ratings())
            .with_response(ItemId::new(31), ResponseValue::Skipped)
            .without_response(ItemId::new(32));
        let card = score_response_set(&set);

        assert!(card.overall().is_none());
        assert!(!card.indicators.contains_key(&Indicator::Overall));
        assert_eq!(card.indicators.len(), 4);
    }

    #[test]
    fn focus_scores_group_by_tag() {
        let set = response_set_from_ratings("p-1", "c-1", Phase::Pre, &scenario_ratings());
        let card = score_response_set(&set);

        // Awareness items are 3 (Self, 4) and 29 (Team, 2)
        assert_eq!(card.focus_score(Focus::Awareness), Some(3.0));
        assert_eq!(card.focus[&Focus::Awareness].item_count, 2);
    }

    #[test]
    fn all_items_mean_covers_every_answer() {
        let set = response_set_from_ratings("p-1", "c-1", Phase::Pre, &scenario_ratings());
        let card = score_response_set(&set);
        // 6*4 + 8*3 + 8*5 + 8*2 + 2*4 = 112
        assert_eq!(card.all_items_mean, Some(112.0 / 32.0));
    }
}
