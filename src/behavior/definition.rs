use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::trace::CallDescriptor;

/// Errors in behavior definitions and catalogs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BehaviorError {
    #[error("Behavior '{0}' has an empty call sequence")]
    EmptySequence(String),

    #[error("Invalid behavior definition on line {line}: {reason}")]
    InvalidDefinition { line: usize, reason: String },

    #[error("Behavior catalog is empty")]
    EmptyCatalog,
}

/// A known malicious behavior: an ordered, non-empty list of call names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Behavior {
    /// Human-readable label (e.g. "ransomware")
    pub description: String,

    /// Call names without arguments, in execution order
    pub sequence: Vec<String>,

    /// Unix seconds at which the behavior entered the catalog
    pub inserted_at: u64,
}

impl Behavior {
    /// Create a behavior stamped with the current time
    ///
    /// # Errors
    /// Returns [`BehaviorError::EmptySequence`] if `sequence` is empty.
    pub fn new(
        description: impl Into<String>,
        sequence: Vec<String>,
    ) -> Result<Self, BehaviorError> {
        Self::with_timestamp(description, sequence, unix_timestamp())
    }

    /// Create a behavior with an explicit insertion timestamp
    pub fn with_timestamp(
        description: impl Into<String>,
        sequence: Vec<String>,
        inserted_at: u64,
    ) -> Result<Self, BehaviorError> {
        let description = description.into();
        if sequence.is_empty() {
            return Err(BehaviorError::EmptySequence(description));
        }

        Ok(Self {
            description,
            sequence,
            inserted_at,
        })
    }

    /// Number of calls the behavior occupies once injected
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Always false for behaviors built through the constructors
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// The sequence rendered as trace entries (`name()`)
    pub fn descriptors(&self) -> impl Iterator<Item = String> + '_ {
        self.sequence
            .iter()
            .map(|name| CallDescriptor::render_empty(name))
    }

    pub(crate) fn validate(&self) -> Result<(), BehaviorError> {
        if self.sequence.is_empty() {
            return Err(BehaviorError::EmptySequence(self.description.clone()));
        }
        Ok(())
    }
}

/// Parse a definitions file (`description:call1,call2,...` per line)
///
/// Lines of one character or less are skipped. Spaces in the sequence portion
/// are removed and empty call names dropped.
///
/// # Example
/// ```
/// use trout::behavior::parse_definitions;
///
/// let behaviors = parse_definitions("ransomware:encryptFile, deleteShadowCopy\n").unwrap();
/// assert_eq!(behaviors[0].description, "ransomware");
/// assert_eq!(behaviors[0].sequence, vec!["encryptFile", "deleteShadowCopy"]);
/// ```
pub fn parse_definitions(content: &str) -> Result<Vec<Behavior>, BehaviorError> {
    let timestamp = unix_timestamp();
    let mut behaviors = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().len() <= 1 {
            continue;
        }

        let (description, sequence) = line.split_once(':').ok_or_else(|| {
            BehaviorError::InvalidDefinition {
                line: line_no,
                reason: "missing ':' between description and sequence".to_string(),
            }
        })?;

        let sequence = parse_sequence(sequence);

        let behavior = Behavior::with_timestamp(description.trim(), sequence, timestamp)
            .map_err(|e| BehaviorError::InvalidDefinition {
                line: line_no,
                reason: e.to_string(),
            })?;
        behaviors.push(behavior);
    }

    Ok(behaviors)
}

/// Split a comma-separated call list, removing spaces and empty names
///
/// # Example
/// ```
/// use trout::behavior::parse_sequence;
///
/// assert_eq!(parse_sequence("getDeviceId, send Text,,"), vec!["getDeviceId", "sendText"]);
/// ```
pub fn parse_sequence(calls: &str) -> Vec<String> {
    calls
        .replace(' ', "")
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lightweight timestamp without chrono dependency
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
