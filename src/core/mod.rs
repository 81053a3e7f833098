//! Core data model: identifiers, phases, answers and response sets.

pub mod types;

pub use types::{
    CohortId, ItemId, ParticipantId, Phase, QuestionId, ResponseSet, ResponseValue, Submission,
};
