//! Loading submissions and response sets from JSON files.

use crate::core::{ResponseSet, Submission};
use crate::errors::{Error, Result};
use crate::validation::{Rejection, ResponseValidator};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One entry of an input array.
#[derive(Debug, Clone, PartialEq)]
pub enum InputRecord {
    Stored(ResponseSet),
    Submitted(Submission),
}

impl InputRecord {
    /// Stored response sets carry a `responses` map and may be partial;
    /// anything else is read as a raw submission.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        if value.get("responses").is_some() {
            serde_json::from_value(value).map(Self::Stored)
        } else {
            serde_json::from_value(value).map(Self::Submitted)
        }
    }
}

/// Response sets ready for scoring, plus the submissions that failed
/// validation.
#[derive(Debug, Clone, Default)]
pub struct LoadedSets {
    pub sets: Vec<ResponseSet>,
    pub rejected: Vec<Rejection>,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let contents = fs::read_to_string(path).map_err(|e| Error::file_system(path, e))?;
    serde_json::from_str(&contents).map_err(|e| Error::input(path, e))
}

/// Raw submissions, unvalidated.
pub fn load_submissions(path: &Path) -> Result<Vec<Submission>> {
    let submissions: Vec<Submission> = read_json(path)?;
    debug!(count = submissions.len(), path = %path.display(), "Loaded submissions");
    Ok(submissions)
}

/// Response sets from a file of submissions and/or stored sets.
///
/// Submissions that fail validation, and stored sets with unknown ids or
/// out-of-range values, are logged and returned in [`LoadedSets::rejected`]
/// rather than aborting the load.
pub fn load_response_sets(path: &Path, validator: &ResponseValidator) -> Result<LoadedSets> {
    let records = read_json::<Value>(path)?
        .into_iter()
        .map(InputRecord::from_value)
        .collect::<serde_json::Result<Vec<_>>>()
        .map_err(|e| Error::input(path, e))?;
    let mut loaded = LoadedSets::default();
    let mut submissions = Vec::new();

    for record in records {
        match record {
            InputRecord::Stored(set) => match validator.check_stored(&set) {
                Ok(()) => loaded.sets.push(set),
                Err(errors) => {
                    warn!(
                        participant = %set.participant_id(),
                        phase = %set.phase(),
                        errors = errors.0.len(),
                        "Skipping invalid stored response set"
                    );
                    loaded.rejected.push(Rejection {
                        participant_id: set.participant_id().clone(),
                        phase: set.phase(),
                        errors: errors.0,
                    });
                }
            },
            InputRecord::Submitted(submission) => submissions.push(submission),
        }
    }

    let batch = validator.validate_all(&submissions);
    for rejection in &batch.rejected {
        warn!(
            participant = %rejection.participant_id,
            phase = %rejection.phase,
            errors = rejection.errors.len(),
            "Skipping invalid submission"
        );
    }
    loaded.sets.extend(batch.valid);
    loaded.rejected.extend(batch.rejected);

    debug!(
        sets = loaded.sets.len(),
        rejected = loaded.rejected.len(),
        path = %path.display(),
        "Loaded response sets"
    );
    Ok(loaded)
}
