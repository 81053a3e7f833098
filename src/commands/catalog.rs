use super::CommandContext;
use crate::catalog::catalog;
use anyhow::Result;

pub fn show_catalog(ctx: &CommandContext) -> Result<()> {
    ctx.stdout_writer().write_catalog(catalog())
}
