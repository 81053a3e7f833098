use super::input::load_response_sets;
use super::CommandContext;
use crate::cohort::CohortAggregator;
use crate::core::CohortId;
use crate::report::ReportPlanner;
use crate::themes::ThemeClassifierAdapter;
use crate::validation::ResponseValidator;
use anyhow::{Context, Result};
use std::path::Path;

pub fn impact_report(ctx: &CommandContext, file: &Path, cohort: &str) -> Result<()> {
    let loaded = load_response_sets(file, &ResponseValidator::from_config(&ctx.config))?;
    let themes = ThemeClassifierAdapter::from_config(&ctx.config.classifier)
        .context("Failed to start the theme classifier runtime")?;

    let planner = ReportPlanner::new(CohortAggregator::default(), ctx.config.reports);
    let report = planner.build_impact_report(
        &CohortId::new(cohort),
        &loaded.sets,
        &ctx.config.scale,
        &themes,
    )?;

    ctx.stdout_writer().write_impact_report(&report)
}
