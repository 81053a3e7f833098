//! Command handlers behind the `readiness` binary.
//!
//! Each handler loads its input, runs one engine stage and hands the result
//! to an [`OutputWriter`] on stdout.

pub mod catalog;
pub mod cohort;
pub mod compare;
pub mod impact;
pub mod init;
pub mod input;
pub mod score;
pub mod validate;

use crate::config::ReadinessConfig;
use crate::formatting::FormattingConfig;
use crate::output::{create_writer, OutputFormat, OutputWriter};
use std::io::Write;

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: ReadinessConfig,
    pub format: OutputFormat,
    pub formatting: FormattingConfig,
}

impl CommandContext {
    pub fn new(config: ReadinessConfig, format: OutputFormat, formatting: FormattingConfig) -> Self {
        Self {
            config,
            format,
            formatting,
        }
    }

    pub fn writer<'w, W: Write + 'w>(&self, out: W) -> Box<dyn OutputWriter + 'w> {
        create_writer(self.format, out, self.formatting)
    }

    pub fn stdout_writer(&self) -> Box<dyn OutputWriter> {
        self.writer(std::io::stdout())
    }
}
