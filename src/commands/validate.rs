use super::input::load_submissions;
use super::CommandContext;
use crate::validation::ResponseValidator;
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Validate every submission in `file`.
///
/// Returns whether all submissions were valid so the binary can set its exit
/// status.
pub fn validate_submissions(ctx: &CommandContext, file: &Path) -> Result<bool> {
    let submissions = load_submissions(file)?;
    let batch = ResponseValidator::from_config(&ctx.config).validate_all(&submissions);
    info!(
        valid = batch.valid.len(),
        rejected = batch.rejected.len(),
        "Validation finished"
    );

    ctx.stdout_writer().write_validation(&batch)?;
    Ok(batch.is_all_valid())
}
