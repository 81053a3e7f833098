//! Descriptive statistics over unordered samples.
//!
//! Floating point addition is not associative, so summing the same values in
//! a different order can change the last bits of a mean. Every function here
//! sorts its input first; callers get bit-identical results for any input
//! ordering.

use serde::{Deserialize, Serialize};

/// Mean, extremes and population standard deviation of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub count: usize,
}

impl Distribution {
    /// `None` for an empty sample; absent is never reported as zero.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted(values);
        let mean = mean_of_sorted(&sorted)?;
        let deviations = sorted_owned(sorted.iter().map(|v| (v - mean).powi(2)).collect());
        let variance = sum_sorted(&deviations) / sorted.len() as f64;

        Some(Self {
            mean,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            std_dev: variance.sqrt(),
            count: sorted.len(),
        })
    }
}

/// Arithmetic mean, `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    mean_of_sorted(&sorted(values))
}

fn mean_of_sorted(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    Some(sum_sorted(sorted) / sorted.len() as f64)
}

fn sum_sorted(sorted: &[f64]) -> f64 {
    sorted.iter().sum()
}

fn sorted(values: &[f64]) -> Vec<f64> {
    sorted_owned(values.to_vec())
}

fn sorted_owned(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values
}
