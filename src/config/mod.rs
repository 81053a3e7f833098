// Sub-modules
mod classifier;
mod core;
mod loader;
mod scale;

use std::path::PathBuf;
use thiserror::Error;

pub use classifier::{ClassifierConfig, ClassifierSettings, MAX_CONCURRENT_REQUESTS};
pub use core::{ReadinessConfig, ReportConfig};
pub use loader::{
    default_config_toml, directory_ancestors, load_config, load_config_from, load_config_near,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use scale::{RatingScale, ValidationRules};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse .readiness.toml: {0}")]
    Parse(String),

    #[error("Failed to render configuration: {0}")]
    Serialize(String),
}
