//! Rating scale and validation rules.
//!
//! ```toml
//! [scale]
//! min = 1
//! max = 6
//! agree_threshold = 5
//!
//! [validation]
//! allow_skipped_ratings = true
//! require_open_responses = true
//! ```

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Ordinal Likert scale used for rated items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingScale {
    /// Lowest accepted rating (default: 1, "Strongly Disagree")
    #[serde(default = "default_min")]
    pub min: i32,

    /// Highest accepted rating (default: 6, "Strongly Agree")
    #[serde(default = "default_max")]
    pub max: i32,

    /// Ratings at or above this count as "agree" in cohort summaries (default: 5)
    #[serde(default = "default_agree_threshold")]
    pub agree_threshold: i32,
}

impl Default for RatingScale {
    fn default() -> Self {
        Self {
            min: default_min(),
            max: default_max(),
            agree_threshold: default_agree_threshold(),
        }
    }
}

impl RatingScale {
    pub fn new(min: i32, max: i32) -> Self {
        Self {
            min,
            max,
            agree_threshold: max.min(default_agree_threshold()),
        }
    }

    pub fn range(&self) -> RangeInclusive<i32> {
        self.min..=self.max
    }

    pub fn contains(&self, rating: i32) -> bool {
        self.range().contains(&rating)
    }

    pub fn is_agreement(&self, rating: f64) -> bool {
        rating >= f64::from(self.agree_threshold)
    }

    /// Label for a rating on the default six-point scale.
    pub fn label(&self, rating: i32) -> Option<&'static str> {
        if (self.min, self.max) != (1, 6) {
            return None;
        }
        match rating {
            1 => Some("Strongly Disagree"),
            2 => Some("Disagree"),
            3 => Some("Slightly Disagree"),
            4 => Some("Slightly Agree"),
            5 => Some("Agree"),
            6 => Some("Strongly Agree"),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.min >= self.max {
            return Err(format!(
                "scale.min ({}) must be lower than scale.max ({})",
                self.min, self.max
            ));
        }
        if !self.contains(self.agree_threshold) {
            return Err(format!(
                "scale.agree_threshold ({}) must lie within {}..={}",
                self.agree_threshold, self.min, self.max
            ));
        }
        Ok(())
    }
}

/// Rules applied by the response validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    /// Accept the explicit `skipped` marker on rated items (default: true)
    #[serde(default = "default_true")]
    pub allow_skipped_ratings: bool,

    /// Require every open question of the phase to be answered or skipped (default: true)
    #[serde(default = "default_true")]
    pub require_open_responses: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            allow_skipped_ratings: true,
            require_open_responses: true,
        }
    }
}

fn default_min() -> i32 {
    1
}

fn default_max() -> i32 {
    6
}

fn default_agree_threshold() -> i32 {
    5
}

fn default_true() -> bool {
    true
}
