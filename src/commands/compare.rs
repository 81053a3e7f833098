use super::input::load_response_sets;
use super::CommandContext;
use crate::cohort::CohortAggregator;
use crate::core::ParticipantId;
use crate::report::ReportPlanner;
use crate::validation::ResponseValidator;
use anyhow::Result;
use std::path::Path;

/// Progress report for one participant, or a baseline report when only the
/// Pre assessment exists.
pub fn compare_participant(ctx: &CommandContext, file: &Path, participant: &str) -> Result<()> {
    let loaded = load_response_sets(file, &ResponseValidator::from_config(&ctx.config))?;
    let planner = ReportPlanner::new(CohortAggregator::default(), ctx.config.reports);
    let report = planner.plan_participant_report(&ParticipantId::new(participant), &loaded.sets)?;

    ctx.stdout_writer().write_participant_report(&report)
}
