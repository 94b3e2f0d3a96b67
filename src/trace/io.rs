use crate::trace::{Trace, TraceError};
use std::fs;
use std::path::Path;

/// Load a trace from disk
///
/// Two layouts are accepted:
/// - a JSON array of strings (content starts with `["` or `[]`)
/// - plain text, one call descriptor per line; blank lines and `#` comments are skipped
pub fn load_trace<P: AsRef<Path>>(path: P) -> Result<Trace, TraceError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_trace(&content).map_err(|source| TraceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse trace text in either supported layout
pub fn parse_trace(content: &str) -> Result<Trace, serde_json::Error> {
    if is_json_array(content) {
        return serde_json::from_str(content);
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// A JSON trace opens with `[` followed by a string or `]`. JVM array
/// descriptors such as `[Ljava/lang/String;->clone()` stay plain text.
fn is_json_array(content: &str) -> bool {
    content
        .trim_start()
        .strip_prefix('[')
        .map(|rest| matches!(rest.trim_start().chars().next(), Some('"') | Some(']')))
        .unwrap_or(false)
}

/// Write a trace as plain text, one descriptor per line
pub fn save_trace<P: AsRef<Path>>(path: P, trace: &[String]) -> Result<(), TraceError> {
    let path = path.as_ref();
    let mut content = trace.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }

    fs::write(path, content).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })
}
