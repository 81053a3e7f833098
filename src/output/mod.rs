//! Rendering of engine results for the command line.
//!
//! JSON output is the serialized structure itself. Terminal output is a set
//! of tables; scores there are rounded to one decimal place.

mod json;
mod terminal;

use crate::catalog::ItemCatalog;
use crate::cohort::{CohortBenchmark, RankedParticipant};
use crate::formatting::FormattingConfig;
use crate::report::{ImpactReport, ParticipantReport};
use crate::scoring::ScoreCard;
use crate::validation::ValidatedBatch;
use std::io::Write;

pub use json::JsonWriter;
pub use terminal::TerminalWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

pub trait OutputWriter {
    fn write_catalog(&mut self, catalog: &ItemCatalog) -> anyhow::Result<()>;
    fn write_validation(&mut self, batch: &ValidatedBatch) -> anyhow::Result<()>;
    fn write_score_cards(&mut self, cards: &[ScoreCard]) -> anyhow::Result<()>;
    fn write_participant_report(&mut self, report: &ParticipantReport) -> anyhow::Result<()>;
    fn write_benchmark(
        &mut self,
        benchmark: &CohortBenchmark,
        ranking: &[RankedParticipant],
    ) -> anyhow::Result<()>;
    fn write_impact_report(&mut self, report: &ImpactReport) -> anyhow::Result<()>;
}

pub fn create_writer<'w, W: Write + 'w>(
    format: OutputFormat,
    writer: W,
    formatting: FormattingConfig,
) -> Box<dyn OutputWriter + 'w> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer, formatting)),
    }
}
