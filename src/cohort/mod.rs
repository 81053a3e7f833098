//! Cohort-level aggregation: benchmarks, rankings and progress.
//!
//! Everything here is a pure function of the response sets passed in.
//! Participant scoring fans out on the rayon pool; statistics sort their
//! inputs, so results do not depend on input order.

pub mod aggregator;
pub mod benchmark;
pub mod progress;
pub mod ranking;

pub use aggregator::{benchmark_cohort, CohortAggregator};
pub use benchmark::{CohortBenchmark, ItemAverage, ScoreStats};
pub use progress::CohortProgress;
pub use ranking::{rank_participants, RankedParticipant};
