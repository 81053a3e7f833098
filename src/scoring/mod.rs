//! Indicator scoring for a single response set.
//!
//! Scores are unrounded means; rounding belongs to presentation.

pub mod indicator_scorer;
pub mod stats;

pub use indicator_scorer::{
    score_response_set, FocusScore, IndicatorScore, IndicatorScorer, ScoreCard,
};
pub use stats::Distribution;
