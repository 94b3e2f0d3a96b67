//! Numeric feature vector loading
//!
//! Feature files hold a single vector of floats, either as a bracketed list
//! (`[0.1, 2, 3.5]`) or as a flat delimiter-separated list (`0.1,2,3.5`).

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a feature vector
#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Unable to find the features file {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read features file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid numeric feature {value:?}")]
    Parse { value: String },

    #[error("Feature delimiter must not be empty")]
    EmptyDelimiter,
}

/// Load a feature vector from `path`
///
/// Content containing both `[` and `]` is read as a bracketed list (always
/// comma-separated). Anything else is split on `delimiter`, with whitespace
/// around each item ignored.
pub fn load_features<P: AsRef<Path>>(path: P, delimiter: &str) -> Result<Vec<f64>, FeatureError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!("Unable to find the features file {}", path.display());
        return Err(FeatureError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| FeatureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_features(&content, delimiter)
}

/// Parse feature text in either supported layout
///
/// # Example
/// ```
/// use trout::features::parse_features;
///
/// assert_eq!(parse_features("[1, 2.5]", ",").unwrap(), vec![1.0, 2.5]);
/// assert_eq!(parse_features("1;2.5", ";").unwrap(), vec![1.0, 2.5]);
/// ```
pub fn parse_features(content: &str, delimiter: &str) -> Result<Vec<f64>, FeatureError> {
    if delimiter.is_empty() {
        return Err(FeatureError::EmptyDelimiter);
    }

    if let (Some(open), Some(close)) = (content.find('['), content.rfind(']')) {
        if open < close {
            return parse_items(content[open + 1..close].split(','));
        }
    }

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    // Items are trimmed individually, so whitespace delimiters keep working
    parse_items(content.split(delimiter))
}

fn parse_items<'a>(items: impl Iterator<Item = &'a str>) -> Result<Vec<f64>, FeatureError> {
    items
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<f64>().map_err(|_| FeatureError::Parse {
                value: item.to_string(),
            })
        })
        .collect()
}
