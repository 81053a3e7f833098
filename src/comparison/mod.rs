//! Pre/post comparison of one participant's response sets.

pub mod comparator;
pub mod pairing;
pub mod types;

pub use comparator::{compare_participant, Comparator, ComparisonError};
pub use pairing::{latest_per_participant, pair_by_participant, PhasePair};
pub use types::{FocusDelta, IndicatorDelta, ItemDelta, ParticipantComparison, ScoredComparison};
