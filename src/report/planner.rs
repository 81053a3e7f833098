use crate::cohort::{CohortAggregator, CohortBenchmark};
use crate::comparison::{pair_by_participant, Comparator, ComparisonError};
use crate::config::{RatingScale, ReportConfig};
use crate::core::{CohortId, ParticipantId, Phase, ResponseSet};
use crate::report::types::*;
use crate::themes::ThemeClassifierAdapter;
use thiserror::Error;
use tracing::{info, info_span};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("participant {participant_id} has no Pre response set")]
    NoBaseline { participant_id: ParticipantId },

    #[error("cohort {cohort_id} has {matched} participant(s) with both phases, {required} required")]
    InsufficientParticipants {
        cohort_id: CohortId,
        matched: usize,
        required: usize,
    },

    #[error(transparent)]
    Comparison(#[from] ComparisonError),
}

/// Chooses and assembles report inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportPlanner<'a> {
    aggregator: CohortAggregator<'a>,
    config: ReportConfig,
}

impl<'a> ReportPlanner<'a> {
    pub fn new(aggregator: CohortAggregator<'a>, config: ReportConfig) -> Self {
        Self { aggregator, config }
    }

    /// Progress when the participant has both phases, Baseline when only Pre.
    pub fn plan_participant_report(
        &self,
        participant_id: &ParticipantId,
        sets: &[ResponseSet],
    ) -> Result<ParticipantReport, ReportError> {
        let pairs = pair_by_participant(sets.iter().filter(|s| s.participant_id() == participant_id));
        let pair = pairs.get(participant_id).copied().unwrap_or_default();

        let Some(pre) = pair.pre else {
            return Err(ReportError::NoBaseline {
                participant_id: participant_id.clone(),
            });
        };

        let scorer = self.aggregator.scorer();
        match Comparator::new(scorer).compare_scoring(Some(pre), pair.post) {
            Ok(scored) => {
                let comparison = scored.comparison;
                let most_improved = comparison
                    .most_improved_items(self.config.top_items)
                    .into_iter()
                    .copied()
                    .collect();
                Ok(ParticipantReport::Progress(ProgressReport {
                    participant_id: participant_id.clone(),
                    cohort_id: comparison.cohort_id.clone(),
                    pre: scored.pre,
                    post: scored.post,
                    cohort_benchmark: self.benchmark(&comparison.cohort_id, Phase::Post, sets),
                    most_improved,
                    comparison,
                }))
            }
            Err(err) if err.is_baseline_only() => {
                info!(participant = %participant_id, "No Post set, planning baseline report");
                Ok(ParticipantReport::Baseline(BaselineReport {
                    participant_id: participant_id.clone(),
                    cohort_id: pre.cohort_id().clone(),
                    scores: scorer.score(pre),
                    cohort_benchmark: self.benchmark(pre.cohort_id(), Phase::Pre, sets),
                }))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Cohort benchmarks, progress and Post-question themes.
    ///
    /// Fails before contacting the classifier when too few participants have
    /// both phases.
    pub fn build_impact_report(
        &self,
        cohort_id: &CohortId,
        sets: &[ResponseSet],
        scale: &RatingScale,
        themes: &ThemeClassifierAdapter,
    ) -> Result<ImpactReport, ReportError> {
        let _span = info_span!("impact_report", cohort = %cohort_id).entered();

        let pre = self.aggregator.benchmark(cohort_id, Phase::Pre, sets);
        let post = self.aggregator.benchmark(cohort_id, Phase::Post, sets);
        let progress = self.aggregator.progress_between(&pre, &post, sets, scale);

        if progress.matched_count < self.config.min_impact_participants {
            return Err(ReportError::InsufficientParticipants {
                cohort_id: cohort_id.clone(),
                matched: progress.matched_count,
                required: self.config.min_impact_participants,
            });
        }

        let themes = themes.summarize_phase(cohort_id, Phase::Post, sets);
        info!(
            matched = progress.matched_count,
            degraded_themes = themes.iter().filter(|t| t.status.is_degraded()).count(),
            "Impact report assembled"
        );

        Ok(ImpactReport {
            cohort_id: cohort_id.clone(),
            pre,
            post,
            progress,
            themes,
        })
    }

    fn benchmark(&self, cohort_id: &CohortId, phase: Phase, sets: &[ResponseSet]) -> Option<CohortBenchmark> {
        let benchmark = self.aggregator.benchmark(cohort_id, phase, sets);
        (!benchmark.is_empty()).then_some(benchmark)
    }
}

/// Plan with the default catalog and report settings.
pub fn plan_participant_report(
    participant_id: &ParticipantId,
    sets: &[ResponseSet],
) -> Result<ParticipantReport, ReportError> {
    ReportPlanner::default().plan_participant_report(participant_id, sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Indicator;
    use crate::config::ClassifierSettings;
    use crate::core::{QuestionId, ResponseValue};
    use crate::testkit::{response_set_from_ratings, scenario_ratings, uniform_response_set, ScriptedClassifier};
    use crate::themes::ThemeStatus;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn only_pre_set_plans_baseline() {
        let sets = vec![
            response_set_from_ratings("p-1", "c-1", Phase::Pre, &scenario_ratings()),
            uniform_response_set("p-2", "c-1", Phase::Pre, 2),
        ];

        let report = plan_participant_report(&ParticipantId::new("p-1"), &sets).unwrap();

        let ParticipantReport::Baseline(baseline) = report else {
            panic!("expected a baseline report");
        };
        assert_eq!(baseline.scores.score(Indicator::SelfReadiness), Some(4.0));
        assert_eq!(baseline.cohort_benchmark.unwrap().participant_count, 2);
    }

    #[test]
    fn both_phases_plan_progress() {
        let sets = vec![
            uniform_response_set("p-1", "c-1", Phase::Pre, 3),
            uniform_response_set("p-1", "c-1", Phase::Post, 5),
        ];

        let report = plan_participant_report(&ParticipantId::new("p-1"), &sets).unwrap();

        let ParticipantReport::Progress(progress) = report else {
            panic!("expected a progress report");
        };
        assert_eq!(progress.comparison.delta(Indicator::Overall), Some(2.0));
        assert_eq!(progress.most_improved.len(), 5);
        assert_eq!(progress.most_improved[0].item.get(), 1);
        assert_eq!(progress.cohort_benchmark.unwrap().phase, Phase::Post);
    }

    #[test]
    fn no_pre_set_is_an_error() {
        let sets = vec![uniform_response_set("p-1", "c-1", Phase::Post, 5)];
        assert_eq!(
            plan_participant_report(&ParticipantId::new("p-1"), &sets),
            Err(ReportError::NoBaseline {
                participant_id: ParticipantId::new("p-1")
            })
        );
    }

    fn impact_sets(matched: usize) -> Vec<ResponseSet> {
        (1..=matched)
            .flat_map(|n| {
                let id = format!("p-{n}");
                let post = (1..=3).fold(
                    uniform_response_set(&id, "c-1", Phase::Post, 5),
                    |set, q| {
                        set.with_open_response(
                            QuestionId::new(q),
                            ResponseValue::Text(format!("answer {q} from {id}")),
                        )
                    },
                );
                [uniform_response_set(&id, "c-1", Phase::Pre, 3), post]
            })
            .collect()
    }

    #[test]
    fn impact_requires_enough_matched_participants() {
        let classifier = ScriptedClassifier::replying(r#"{"themes":[]}"#);
        let calls = classifier.call_counter();
        let adapter =
            ThemeClassifierAdapter::new(Arc::new(classifier), ClassifierSettings::default()).unwrap();

        let err = ReportPlanner::default()
            .build_impact_report(
                &CohortId::new("c-1"),
                &impact_sets(1),
                &RatingScale::default(),
                &adapter,
            )
            .unwrap_err();

        assert!(matches!(
            err,
            ReportError::InsufficientParticipants {
                matched: 1,
                required: 2,
                ..
            }
        ));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn impact_report_survives_classifier_timeout() {
        let classifier =
            ScriptedClassifier::replying(r#"{"themes":[]}"#).with_delay(Duration::from_secs(5));
        let settings = ClassifierSettings {
            timeout: Duration::from_millis(50),
            ..ClassifierSettings::default()
        };
        let adapter = ThemeClassifierAdapter::new(Arc::new(classifier), settings).unwrap();

        let report = ReportPlanner::default()
            .build_impact_report(
                &CohortId::new("c-1"),
                &impact_sets(3),
                &RatingScale::default(),
                &adapter,
            )
            .unwrap();

        assert_eq!(report.progress.matched_count, 3);
        assert_eq!(report.themes.len(), 3);
        assert!(report.themes.iter().all(|t| t.status == ThemeStatus::TimedOut));
        assert!(report.themes.iter().all(|t| t.total_quotes == 3));
    }
}
