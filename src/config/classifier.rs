//! Theme classifier configuration.
//!
//! Controls how free-text batches are sent to the external classifier.
//!
//! # Configuration Example
//!
//! ```toml
//! [classifier]
//! timeout_seconds = 30
//! max_concurrent_requests = 4
//! max_themes = 5
//! command = ["theme-classifier", "--json"]
//! ```
//!
//! When `command` is absent no backend is configured and every theme summary
//! degrades to an empty, `unavailable` summary.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest accepted `max_concurrent_requests`.
pub const MAX_CONCURRENT_REQUESTS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Time allowed for one classifier call in seconds (default: 30)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Upper bound on outstanding classifier calls (default: 4)
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Maximum number of themes kept per question (default: 5)
    #[serde(default = "default_max_themes")]
    pub max_themes: usize,

    /// External command implementing the classifier, program first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            max_concurrent_requests: default_max_concurrent_requests(),
            max_themes: default_max_themes(),
            command: None,
        }
    }
}

impl ClassifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Override the timeout, mostly useful for tests and callers with
    /// sub-second budgets.
    pub fn with_timeout(&self, timeout: Duration) -> ClassifierSettings {
        ClassifierSettings {
            timeout,
            ..self.settings()
        }
    }

    pub fn settings(&self) -> ClassifierSettings {
        ClassifierSettings {
            timeout: self.timeout(),
            max_concurrent_requests: self.max_concurrent_requests,
            max_themes: self.max_themes,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 {
            return Err("classifier.timeout_seconds must be greater than zero".into());
        }
        if self.max_concurrent_requests == 0 {
            return Err("classifier.max_concurrent_requests must be greater than zero".into());
        }
        if self.max_concurrent_requests > MAX_CONCURRENT_REQUESTS {
            return Err(format!(
                "classifier.max_concurrent_requests must be at most {MAX_CONCURRENT_REQUESTS}"
            ));
        }
        if self.max_themes == 0 {
            return Err("classifier.max_themes must be greater than zero".into());
        }
        if matches!(&self.command, Some(cmd) if cmd.is_empty()) {
            return Err("classifier.command must name a program".into());
        }
        Ok(())
    }
}

/// Runtime settings for the theme adapter, resolved from [`ClassifierConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierSettings {
    pub timeout: Duration,
    pub max_concurrent_requests: usize,
    pub max_themes: usize,
}

impl ClassifierSettings {
    /// Concurrency limit actually applied, within `1..=MAX_CONCURRENT_REQUESTS`.
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_requests.clamp(1, MAX_CONCURRENT_REQUESTS)
    }
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        ClassifierConfig::default().settings()
    }
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_concurrent_requests() -> usize {
    4
}

fn default_max_themes() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ClassifierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.settings().max_themes, 5);
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let config = ClassifierConfig {
            max_concurrent_requests: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_concurrency_is_rejected() {
        let config = ClassifierConfig {
            max_concurrent_requests: MAX_CONCURRENT_REQUESTS + 1,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("at most"));

        let at_limit = ClassifierConfig {
            max_concurrent_requests: MAX_CONCURRENT_REQUESTS,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn applied_concurrency_is_clamped() {
        let huge = ClassifierSettings {
            max_concurrent_requests: usize::MAX,
            ..Default::default()
        };
        let zero = ClassifierSettings {
            max_concurrent_requests: 0,
            ..Default::default()
        };
        assert_eq!(huge.concurrency(), MAX_CONCURRENT_REQUESTS);
        assert_eq!(zero.concurrency(), 1);
    }

    #[test]
    fn empty_command_is_rejected() {
        let config = ClassifierConfig {
            command: Some(Vec::new()),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("program"));
    }

    #[test]
    fn sub_second_timeout_override() {
        let settings = ClassifierConfig::default().with_timeout(Duration::from_millis(50));
        assert_eq!(settings.timeout, Duration::from_millis(50));
        assert_eq!(settings.max_concurrent_requests, 4);
    }
}
