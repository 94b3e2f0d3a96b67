use crate::trace::{CallDescriptor, TraceError};

/// Position-wise difference between two traces
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraceDiff {
    /// Extra elements in the longer trace, one difference each
    pub length_mismatch: usize,

    /// Indices within the shared prefix whose comparison keys differ
    pub mismatches: Vec<usize>,
}

impl TraceDiff {
    /// Total number of differences
    pub fn count(&self) -> usize {
        self.length_mismatch + self.mismatches.len()
    }

    /// True when both traces have equal length and identical keys
    pub fn is_identical(&self) -> bool {
        self.count() == 0
    }
}

/// Compares traces position by position
///
/// # Example
/// ```
/// use trout::sequence::TraceComparator;
///
/// let comparator = TraceComparator::default();
/// let diff = comparator.diff(&["foo(1)", "bar"], &["foo(2)"]).unwrap();
/// assert_eq!(diff, 1); // args ignored, one extra element
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceComparator {
    ignore_arguments: bool,
}

impl Default for TraceComparator {
    fn default() -> Self {
        Self {
            ignore_arguments: true,
        }
    }
}

impl TraceComparator {
    pub fn new(ignore_arguments: bool) -> Self {
        Self { ignore_arguments }
    }

    pub fn ignore_arguments(&self) -> bool {
        self.ignore_arguments
    }

    /// Number of differences between the two traces
    pub fn diff<S: AsRef<str>>(&self, trace_x: &[S], trace_y: &[S]) -> Result<usize, TraceError> {
        diff_traces(trace_x, trace_y, self.ignore_arguments)
    }

    /// Full breakdown of where the traces differ
    pub fn compare<S: AsRef<str>>(
        &self,
        trace_x: &[S],
        trace_y: &[S],
    ) -> Result<TraceDiff, TraceError> {
        compare_traces(trace_x, trace_y, self.ignore_arguments)
    }
}

/// Count the differences between two traces
///
/// The count starts at the length difference; every index of the shared
/// prefix whose comparison keys differ adds one. With `ignore_arguments`
/// only call names are compared.
///
/// # Errors
/// Returns [`TraceError::MalformedDescriptor`] if a descriptor inside the
/// shared prefix cannot be parsed. A valid result is always `>= 0`, so `Ok(0)`
/// is never ambiguous with failure.
pub fn diff_traces<S: AsRef<str>>(
    trace_x: &[S],
    trace_y: &[S],
    ignore_arguments: bool,
) -> Result<usize, TraceError> {
    compare_traces(trace_x, trace_y, ignore_arguments).map(|diff| diff.count())
}

/// Like [`diff_traces`] but keeps the mismatching indices
pub fn compare_traces<S: AsRef<str>>(
    trace_x: &[S],
    trace_y: &[S],
    ignore_arguments: bool,
) -> Result<TraceDiff, TraceError> {
    let mut diff = TraceDiff {
        length_mismatch: trace_x.len().abs_diff(trace_y.len()),
        mismatches: Vec::new(),
    };

    // zip stops at the shorter trace
    for (index, (x, y)) in trace_x.iter().zip(trace_y).enumerate() {
        let key_x = comparison_key(x.as_ref(), index, ignore_arguments)?;
        let key_y = comparison_key(y.as_ref(), index, ignore_arguments)?;
        if key_x != key_y {
            diff.mismatches.push(index);
        }
    }

    Ok(diff)
}

fn comparison_key(raw: &str, index: usize, ignore_arguments: bool) -> Result<&str, TraceError> {
    CallDescriptor::parse(raw)
        .map(|call| call.comparison_key(ignore_arguments))
        .inspect_err(|e| tracing::warn!("Cannot diff traces at index {}: {}", index, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_traces() {
        let trace = vec!["open(f)", "read(f)", "close(f)"];
        assert_eq!(diff_traces(&trace, &trace, true).unwrap(), 0);
        assert_eq!(diff_traces(&trace, &trace, false).unwrap(), 0);
    }

    #[test]
    fn test_empty_traces() {
        let empty: Vec<&str> = vec![];
        assert_eq!(diff_traces(&empty, &empty, true).unwrap(), 0);
    }

    #[test]
    fn test_one_empty_trace() {
        let empty: Vec<&str> = vec![];
        let trace = vec!["a", "b", "c"];
        assert_eq!(diff_traces(&empty, &trace, true).unwrap(), 3);
        assert_eq!(diff_traces(&trace, &empty, true).unwrap(), 3);
    }

    #[test]
    fn test_arguments_ignored() {
        assert_eq!(diff_traces(&["foo(1)"], &["foo(2)"], true).unwrap(), 0);
        assert_eq!(diff_traces(&["foo(1)"], &["foo(2)"], false).unwrap(), 1);
    }

    #[test]
    fn test_length_and_content_mismatch() {
        let x = vec!["open(f)", "write(f)", "close(f)", "exit"];
        let y = vec!["open(g)", "read(f)"];

        let diff = compare_traces(&x, &y, true).unwrap();
        assert_eq!(diff.length_mismatch, 2);
        assert_eq!(diff.mismatches, vec![1]);
        assert_eq!(diff.count(), 3);
    }

    #[test]
    fn test_bare_name_vs_empty_argument_list() {
        // Both reduce to the same name; full descriptors differ
        assert_eq!(diff_traces(&["getpid"], &["getpid()"], true).unwrap(), 0);
        assert_eq!(diff_traces(&["getpid"], &["getpid()"], false).unwrap(), 1);
    }

    #[test]
    fn test_malformed_descriptor_in_prefix() {
        let err = diff_traces(&["open(f", "read"], &["open(f)", "read"], true).unwrap_err();
        assert!(matches!(err, TraceError::MalformedDescriptor { .. }));
    }

    #[test]
    fn test_malformed_descriptor_beyond_prefix_only_counts_length() {
        // Elements past the shorter trace are never compared
        assert_eq!(diff_traces(&["a"], &["a", "(broken"], true).unwrap(), 1);
    }

    #[test]
    fn test_comparator_defaults_to_ignoring_arguments() {
        let comparator = TraceComparator::default();
        assert!(comparator.ignore_arguments());
        assert_eq!(comparator.diff(&["f(1)"], &["f(2)"]).unwrap(), 0);
        assert_eq!(TraceComparator::new(false).diff(&["f(1)"], &["f(2)"]).unwrap(), 1);
    }

    #[test]
    fn test_trace_diff_is_identical() {
        assert!(TraceDiff::default().is_identical());
        let diff = TraceDiff {
            length_mismatch: 0,
            mismatches: vec![4],
        };
        assert!(!diff.is_identical());
    }
}
