//! Scoring, comparison and cohort benchmarking for leadership readiness
//! self-assessments.
//!
//! Participants rate 32 catalog items before (`Pre`) and after (`Post`) a
//! programme and answer a few open questions. This crate validates those
//! submissions, scores them per readiness indicator, compares the two phases,
//! benchmarks cohorts, condenses open answers into themes through an external
//! classifier, and assembles report inputs.
//!
//! ```rust
//! use readiness::{score_response_set, Indicator, Phase};
//! use readiness::testkit::uniform_response_set;
//!
//! let set = uniform_response_set("p-1", "spring", Phase::Pre, 4);
//! let card = score_response_set(&set);
//! assert_eq!(card.score(Indicator::Overall), Some(4.0));
//! ```

pub mod catalog;
pub mod cli;
pub mod cohort;
pub mod commands;
pub mod comparison;
pub mod config;
pub mod core;
pub mod errors;
pub mod formatting;
pub mod observability;
pub mod output;
pub mod report;
pub mod scoring;
pub mod testkit;
pub mod themes;
pub mod validation;

// Re-export commonly used types
pub use crate::catalog::{catalog, Focus, Indicator, Item, ItemCatalog, OpenQuestion};
pub use crate::core::{
    CohortId, ItemId, ParticipantId, Phase, QuestionId, ResponseSet, ResponseValue, Submission,
};

pub use crate::cohort::{
    benchmark_cohort, rank_participants, CohortAggregator, CohortBenchmark, CohortProgress,
};
pub use crate::comparison::{compare_participant, Comparator, ComparisonError, ParticipantComparison};
pub use crate::config::{load_config, ReadinessConfig};
pub use crate::errors::{Error, Result, ResultExt};
pub use crate::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::report::{plan_participant_report, ParticipantReport, ReportPlanner};
pub use crate::scoring::{score_response_set, IndicatorScorer, ScoreCard};
pub use crate::themes::{ThemeClassifier, ThemeClassifierAdapter, ThemeSummary};
pub use crate::validation::{ResponseError, ResponseValidator};
