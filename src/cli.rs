use crate::core::Phase;
use crate::formatting::ColorMode;
use crate::output::OutputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PhaseArg {
    /// Assessment taken before the programme
    Pre,
    /// Assessment taken after the programme
    Post,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Pre => Phase::Pre,
            PhaseArg::Post => Phase::Post,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "readiness")]
#[command(about = "Leadership readiness assessment scoring and cohort reporting", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "terminal", global = true)]
    pub format: OutputFormat,

    /// Configuration file (defaults to the nearest .readiness.toml)
    #[arg(long, global = true, env = "READINESS_CONFIG")]
    pub config: Option<PathBuf>,

    /// When to color terminal output: auto, always or never (overrides NO_COLOR)
    #[arg(long, global = true, value_name = "WHEN", value_parser = parse_color_mode)]
    pub color: Option<ColorMode>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

fn parse_color_mode(value: &str) -> Result<ColorMode, String> {
    ColorMode::parse(value).ok_or_else(|| format!("expected auto, always or never, got '{value}'"))
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the rated items and open questions
    Catalog,

    /// Validate submissions and list every problem found
    Validate {
        /// JSON array of submissions
        file: PathBuf,
    },

    /// Score each response set per indicator
    Score {
        /// JSON array of submissions or response sets
        file: PathBuf,
    },

    /// Compare one participant's Pre and Post assessments
    Compare {
        /// JSON array of submissions or response sets
        file: PathBuf,

        /// Participant to report on
        #[arg(long)]
        participant: String,
    },

    /// Benchmark a cohort for one phase
    Cohort {
        /// JSON array of submissions or response sets
        file: PathBuf,

        /// Cohort to benchmark
        #[arg(long)]
        cohort: String,

        /// Assessment phase
        #[arg(long, value_enum)]
        phase: PhaseArg,
    },

    /// Assemble the cohort impact report, including open-response themes
    Impact {
        /// JSON array of submissions or response sets
        file: PathBuf,

        /// Cohort to report on
        #[arg(long)]
        cohort: String,
    },

    /// Write a default .readiness.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
