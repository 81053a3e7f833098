use super::input::load_response_sets;
use super::CommandContext;
use crate::scoring::{IndicatorScorer, ScoreCard};
use crate::validation::ResponseValidator;
use anyhow::Result;
use rayon::prelude::*;
use std::path::Path;

pub fn score_file(ctx: &CommandContext, file: &Path) -> Result<()> {
    let loaded = load_response_sets(file, &ResponseValidator::from_config(&ctx.config))?;
    let scorer = IndicatorScorer::default();

    let mut cards: Vec<ScoreCard> = loaded.sets.par_iter().map(|set| scorer.score(set)).collect();
    cards.sort_by(|a, b| {
        (&a.cohort_id, &a.participant_id, a.phase).cmp(&(&b.cohort_id, &b.participant_id, b.phase))
    });

    ctx.stdout_writer().write_score_cards(&cards)
}
