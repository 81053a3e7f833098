use crate::cohort::{CohortBenchmark, CohortProgress};
use crate::comparison::{ItemDelta, ParticipantComparison};
use crate::core::{CohortId, ParticipantId};
use crate::scoring::ScoreCard;
use crate::themes::ThemeSummary;
use serde::Serialize;

/// Report inputs for a participant with only a Pre set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineReport {
    pub participant_id: ParticipantId,
    pub cohort_id: CohortId,
    pub scores: ScoreCard,
    /// Cohort Pre benchmark, when any cohort member has a Pre set.
    pub cohort_benchmark: Option<CohortBenchmark>,
}

/// Report inputs for a participant with both phases.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub participant_id: ParticipantId,
    pub cohort_id: CohortId,
    pub pre: ScoreCard,
    pub post: ScoreCard,
    pub comparison: ParticipantComparison,
    pub most_improved: Vec<ItemDelta>,
    /// Cohort Post benchmark.
    pub cohort_benchmark: Option<CohortBenchmark>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParticipantReport {
    Baseline(BaselineReport),
    Progress(ProgressReport),
}

impl ParticipantReport {
    pub fn participant_id(&self) -> &ParticipantId {
        match self {
            ParticipantReport::Baseline(report) => &report.participant_id,
            ParticipantReport::Progress(report) => &report.participant_id,
        }
    }

    pub fn is_baseline(&self) -> bool {
        matches!(self, ParticipantReport::Baseline(_))
    }
}

/// Cohort-level report inputs after the programme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactReport {
    pub cohort_id: CohortId,
    pub pre: CohortBenchmark,
    pub post: CohortBenchmark,
    pub progress: CohortProgress,
    /// One summary per Post open question.
    pub themes: Vec<ThemeSummary>,
}
