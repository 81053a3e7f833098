use super::OutputWriter;
use crate::catalog::ItemCatalog;
use crate::cohort::{CohortBenchmark, RankedParticipant};
use crate::core::Phase;
use crate::report::{ImpactReport, ParticipantReport};
use crate::scoring::ScoreCard;
use crate::validation::ValidatedBatch;
use serde::Serialize;
use serde_json::json;
use std::io::Write;

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn emit<T: Serialize + ?Sized>(&mut self, value: &T) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_catalog(&mut self, catalog: &ItemCatalog) -> anyhow::Result<()> {
        let questions: Vec<_> = [Phase::Pre, Phase::Post]
            .into_iter()
            .flat_map(|phase| catalog.open_questions(phase))
            .collect();
        self.emit(&json!({
            "items": catalog.items(),
            "open_questions": questions,
        }))
    }

    fn write_validation(&mut self, batch: &ValidatedBatch) -> anyhow::Result<()> {
        self.emit(&json!({
            "valid": batch.valid.len(),
            "rejected": batch.rejected,
        }))
    }

    fn write_score_cards(&mut self, cards: &[ScoreCard]) -> anyhow::Result<()> {
        self.emit(cards)
    }

    fn write_participant_report(&mut self, report: &ParticipantReport) -> anyhow::Result<()> {
        self.emit(report)
    }

    fn write_benchmark(
        &mut self,
        benchmark: &CohortBenchmark,
        ranking: &[RankedParticipant],
    ) -> anyhow::Result<()> {
        self.emit(&json!({
            "benchmark": benchmark,
            "ranking": ranking,
        }))
    }

    fn write_impact_report(&mut self, report: &ImpactReport) -> anyhow::Result<()> {
        self.emit(report)
    }
}
