use super::OutputWriter;
use crate::catalog::{catalog, Focus, Indicator, ItemCatalog};
use crate::cohort::{CohortBenchmark, RankedParticipant};
use crate::comparison::ParticipantComparison;
use crate::core::Phase;
use crate::formatting::{
    colorize_delta, format_score, format_share, header, warning, FormattingConfig,
};
use crate::report::{BaselineReport, ImpactReport, ParticipantReport, ProgressReport};
use crate::scoring::ScoreCard;
use crate::themes::{format_theme_lines, ThemeStatus};
use crate::validation::ValidatedBatch;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::io::Write;

pub struct TerminalWriter<W: Write> {
    writer: W,
    formatting: FormattingConfig,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, formatting: FormattingConfig) -> Self {
        Self { writer, formatting }
    }

    fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(headers.to_vec());
        if !self.formatting.use_color() {
            table.force_no_tty();
        }
        table
    }

    fn heading(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", header(text, &self.formatting))?;
        Ok(())
    }

    fn write_table(&mut self, table: &Table) -> anyhow::Result<()> {
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_card(&mut self, card: &ScoreCard) -> anyhow::Result<()> {
        let mut table = self.table(&["Indicator", "Score", "Items"]);
        for indicator in Indicator::ALL {
            let score = card.indicator(indicator);
            table.add_row(vec![
                indicator.display_name().to_string(),
                format_score(score.map(|s| s.mean_value)),
                score.map_or_else(|| "0".to_string(), |s| s.item_count.to_string()),
            ]);
        }
        table.add_row(vec![
            "All items".to_string(),
            format_score(card.all_items_mean),
            card.rated_item_count.to_string(),
        ]);
        self.write_table(&table)
    }

    fn write_comparison(&mut self, comparison: &ParticipantComparison) -> anyhow::Result<()> {
        let mut table = self.table(&["Indicator", "Pre", "Post", "Change"]);
        for delta in &comparison.indicators {
            table.add_row(vec![
                delta.indicator.display_name().to_string(),
                format_score(delta.pre_score),
                format_score(delta.post_score),
                colorize_delta(delta.delta, &self.formatting),
            ]);
        }
        for delta in &comparison.focus {
            table.add_row(vec![
                format!("Focus: {}", delta.focus.display_name()),
                format_score(delta.pre_score),
                format_score(delta.post_score),
                colorize_delta(delta.delta, &self.formatting),
            ]);
        }
        self.write_table(&table)
    }

    fn write_baseline(&mut self, report: &BaselineReport) -> anyhow::Result<()> {
        self.heading(&format!(
            "Baseline report: {} ({})",
            report.participant_id, report.cohort_id
        ))?;
        self.write_card(&report.scores)?;
        if let Some(benchmark) = &report.cohort_benchmark {
            self.write_benchmark_table(benchmark)?;
        }
        Ok(())
    }

    fn write_progress(&mut self, report: &ProgressReport) -> anyhow::Result<()> {
        self.heading(&format!(
            "Progress report: {} ({})",
            report.participant_id, report.cohort_id
        ))?;
        self.write_comparison(&report.comparison)?;

        if !report.most_improved.is_empty() {
            self.heading("Most improved items")?;
            let mut table = self.table(&["Item", "Statement", "Pre", "Post", "Change"]);
            for delta in &report.most_improved {
                let prompt = catalog().item(delta.item).map_or("", |item| item.prompt_text);
                table.add_row(vec![
                    delta.item.to_string(),
                    prompt.to_string(),
                    format_score(Some(delta.pre)),
                    format_score(Some(delta.post)),
                    colorize_delta(Some(delta.delta), &self.formatting),
                ]);
            }
            self.write_table(&table)?;
        }

        if let Some(benchmark) = &report.cohort_benchmark {
            self.write_benchmark_table(benchmark)?;
        }
        Ok(())
    }

    fn write_benchmark_table(&mut self, benchmark: &CohortBenchmark) -> anyhow::Result<()> {
        self.heading(&format!(
            "Cohort {} ({}, {} participants)",
            benchmark.cohort_id,
            benchmark.phase.display_name(),
            benchmark.participant_count
        ))?;
        let mut table = self.table(&["Indicator", "Mean", "Min", "Max", "Spread", "Participants"]);
        for indicator in Indicator::ALL {
            let stats = benchmark.indicator(indicator);
            table.add_row(vec![
                indicator.display_name().to_string(),
                format_score(stats.map(|s| s.mean)),
                format_score(stats.map(|s| s.min)),
                format_score(stats.map(|s| s.max)),
                format_score(stats.map(|s| s.std_dev)),
                stats.map_or(0, |s| s.participant_count).to_string(),
            ]);
        }
        for focus in Focus::ALL {
            let stats = benchmark.focus.get(&focus);
            table.add_row(vec![
                format!("Focus: {}", focus.display_name()),
                format_score(stats.map(|s| s.mean)),
                format_score(stats.map(|s| s.min)),
                format_score(stats.map(|s| s.max)),
                format_score(stats.map(|s| s.std_dev)),
                stats.map_or(0, |s| s.participant_count).to_string(),
            ]);
        }
        self.write_table(&table)
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_catalog(&mut self, catalog: &ItemCatalog) -> anyhow::Result<()> {
        self.heading("Rated items")?;
        let mut table = self.table(&["Item", "Indicator", "Focus", "Statement"]);
        for item in catalog.items() {
            table.add_row(vec![
                item.id.to_string(),
                item.indicator.display_name().to_string(),
                item.focus.display_name().to_string(),
                item.prompt_text.to_string(),
            ]);
        }
        self.write_table(&table)?;

        self.heading("Open questions")?;
        let mut table = self.table(&["Phase", "Question", "Prompt"]);
        for phase in [Phase::Pre, Phase::Post] {
            for question in catalog.open_questions(phase) {
                table.add_row(vec![
                    phase.display_name().to_string(),
                    question.id.to_string(),
                    question.prompt_text.to_string(),
                ]);
            }
        }
        self.write_table(&table)
    }

    fn write_validation(&mut self, batch: &ValidatedBatch) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} valid, {} rejected",
            batch.valid.len(),
            batch.rejected.len()
        )?;
        for rejection in &batch.rejected {
            let line = format!(
                "{} ({}):",
                rejection.participant_id,
                rejection.phase.display_name()
            );
            writeln!(self.writer, "{}", warning(&line, &self.formatting))?;
            for error in &rejection.errors {
                writeln!(self.writer, "  - {error}")?;
            }
        }
        Ok(())
    }

    fn write_score_cards(&mut self, cards: &[ScoreCard]) -> anyhow::Result<()> {
        for card in cards {
            self.heading(&format!(
                "{} ({}, {})",
                card.participant_id,
                card.cohort_id,
                card.phase.display_name()
            ))?;
            self.write_card(card)?;
        }
        Ok(())
    }

    fn write_participant_report(&mut self, report: &ParticipantReport) -> anyhow::Result<()> {
        match report {
            ParticipantReport::Baseline(baseline) => self.write_baseline(baseline),
            ParticipantReport::Progress(progress) => self.write_progress(progress),
        }
    }

    fn write_benchmark(
        &mut self,
        benchmark: &CohortBenchmark,
        ranking: &[RankedParticipant],
    ) -> anyhow::Result<()> {
        self.write_benchmark_table(benchmark)?;
        if ranking.is_empty() {
            return Ok(());
        }
        self.heading("Ranking by overall score")?;
        let mut table = self.table(&["Rank", "Participant", "Overall"]);
        for entry in ranking {
            table.add_row(vec![
                entry.rank.to_string(),
                entry.participant_id.to_string(),
                format_score(Some(entry.score)),
            ]);
        }
        self.write_table(&table)
    }

    fn write_impact_report(&mut self, report: &ImpactReport) -> anyhow::Result<()> {
        let progress = &report.progress;
        self.heading(&format!("Impact report: cohort {}", report.cohort_id))?;
        writeln!(
            self.writer,
            "{} Pre, {} Post, {} with both phases; {} improved overall; {} of Post ratings agree or above",
            progress.pre_count,
            progress.post_count,
            progress.matched_count,
            format_share(progress.share_improved),
            format_share(progress.share_agree_or_above),
        )?;
        writeln!(self.writer)?;

        let mut table = self.table(&["Indicator", "Pre mean", "Post mean", "Change"]);
        for indicator in Indicator::ALL {
            table.add_row(vec![
                indicator.display_name().to_string(),
                format_score(report.pre.mean(indicator)),
                format_score(report.post.mean(indicator)),
                colorize_delta(
                    progress.indicator_deltas.get(&indicator).copied(),
                    &self.formatting,
                ),
            ]);
        }
        self.write_table(&table)?;

        for summary in &report.themes {
            let prompt = catalog()
                .open_question(summary.phase, summary.question)
                .map_or("", |q| q.prompt_text);
            self.heading(prompt)?;
            if summary.status == ThemeStatus::Classified {
                for line in format_theme_lines(summary) {
                    writeln!(self.writer, "  - {line}")?;
                }
            } else {
                let note = format!("  ({}; manual review recommended)", summary.status);
                writeln!(self.writer, "{}", warning(&note, &self.formatting))?;
            }
        }
        Ok(())
    }
}
