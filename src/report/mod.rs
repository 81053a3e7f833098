//! Report-ready structures handed to the external renderers.
//!
//! A participant gets a Progress report when both phases exist and a Baseline
//! report when only the Pre set does. A cohort gets an Impact report once
//! enough participants have completed both phases.

pub mod planner;
pub mod types;

pub use planner::{plan_participant_report, ReportError, ReportPlanner};
pub use types::{BaselineReport, ImpactReport, ParticipantReport, ProgressReport};
