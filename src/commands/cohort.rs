use super::input::load_response_sets;
use super::CommandContext;
use crate::catalog::Indicator;
use crate::cohort::{rank_participants, CohortAggregator};
use crate::core::{CohortId, Phase};
use crate::validation::ResponseValidator;
use anyhow::Result;
use std::path::Path;
use tracing::warn;

pub fn benchmark_cohort(ctx: &CommandContext, file: &Path, cohort: &str, phase: Phase) -> Result<()> {
    let loaded = load_response_sets(file, &ResponseValidator::from_config(&ctx.config))?;
    let cohort_id = CohortId::new(cohort);
    let aggregator = CohortAggregator::default();

    let benchmark = aggregator.benchmark(&cohort_id, phase, &loaded.sets);
    if benchmark.is_empty() {
        warn!(cohort = %cohort_id, phase = %phase, "No response sets for this cohort and phase");
    }
    let cards = aggregator.score_cards(&cohort_id, phase, &loaded.sets);
    let ranking = rank_participants(&cards, Indicator::Overall);

    ctx.stdout_writer().write_benchmark(&benchmark, &ranking)
}
