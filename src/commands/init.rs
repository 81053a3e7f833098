use crate::config::{default_config_toml, CONFIG_FILE_NAME};
use crate::errors::Error;
use anyhow::Result;
use std::fs;
use std::path::Path;

/// Write the default configuration into `dir`.
pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
    }

    let contents = format!("# Readiness configuration\n\n{}", default_config_toml()?);
    fs::write(&config_path, contents).map_err(|e| Error::file_system(&config_path, e))?;
    println!("Created {CONFIG_FILE_NAME}");

    Ok(())
}
