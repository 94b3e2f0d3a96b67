//! JSON output format for `--format json`

use serde::{Deserialize, Serialize};

use crate::behavior::Behavior;
use crate::sequence::{Insertion, TraceDiff};

/// Result of comparing two traces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDiff {
    /// Total difference count
    pub differences: usize,
    /// Whether argument lists were ignored
    pub ignore_arguments: bool,
    /// Differences caused by unequal lengths
    pub length_mismatch: usize,
    /// Shared-prefix indices whose calls differ
    pub mismatched_indices: Vec<usize>,
}

impl JsonDiff {
    pub fn new(diff: &TraceDiff, ignore_arguments: bool) -> Self {
        Self {
            differences: diff.count(),
            ignore_arguments,
            length_mismatch: diff.length_mismatch,
            mismatched_indices: diff.mismatches.clone(),
        }
    }
}

/// Result of an injection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonInjection {
    pub insertion_probability: f64,
    pub multiple_behaviors: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub original_length: usize,
    pub insertions: Vec<Insertion>,
    pub trace: Vec<String>,
}

/// Catalog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonBehaviors {
    pub total: usize,
    pub behaviors: Vec<Behavior>,
}

/// Loaded feature vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFeatures {
    pub count: usize,
    pub features: Vec<f64>,
}

/// Serialize any output record as pretty JSON
pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
