use anyhow::Result;
use clap::Parser;
use readiness::cli::{Cli, Commands};
use readiness::commands::{self, CommandContext};
use readiness::config::{load_config, load_config_from};
use readiness::formatting::FormattingConfig;
use readiness::observability::init_tracing;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    let formatting = FormattingConfig::resolve(cli.color);
    formatting.apply();

    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };
    let ctx = CommandContext::new(config, cli.format, formatting);

    match cli.command {
        Commands::Catalog => commands::catalog::show_catalog(&ctx)?,
        Commands::Validate { file } => {
            if !commands::validate::validate_submissions(&ctx, &file)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Score { file } => commands::score::score_file(&ctx, &file)?,
        Commands::Compare { file, participant } => {
            commands::compare::compare_participant(&ctx, &file, &participant)?
        }
        Commands::Cohort {
            file,
            cohort,
            phase,
        } => commands::cohort::benchmark_cohort(&ctx, &file, &cohort, phase.into())?,
        Commands::Impact { file, cohort } => {
            commands::impact::impact_report(&ctx, &file, &cohort)?
        }
        Commands::Init { force } => {
            let dir = std::env::current_dir()?;
            commands::init::init_config(&dir, force)?
        }
    }

    Ok(ExitCode::SUCCESS)
}
