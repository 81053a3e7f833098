use serde::{Deserialize, Serialize};

use super::classifier::ClassifierConfig;
use super::scale::{RatingScale, ValidationRules};

/// Root configuration structure, read from `.readiness.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReadinessConfig {
    /// Rating scale bounds and agreement threshold
    #[serde(default)]
    pub scale: RatingScale,

    /// Response validation rules
    #[serde(default)]
    pub validation: ValidationRules,

    /// Theme classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Report assembly settings
    #[serde(default)]
    pub reports: ReportConfig,
}

/// Report assembly settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Matched participants needed before an impact report is produced (default: 2)
    #[serde(default = "default_min_impact_participants")]
    pub min_impact_participants: usize,

    /// Number of most-improved items listed in progress reports (default: 5)
    #[serde(default = "default_top_items")]
    pub top_items: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            min_impact_participants: default_min_impact_participants(),
            top_items: default_top_items(),
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_impact_participants == 0 {
            return Err("reports.min_impact_participants must be at least 1".into());
        }
        Ok(())
    }
}

fn default_min_impact_participants() -> usize {
    2
}

fn default_top_items() -> usize {
    5
}
