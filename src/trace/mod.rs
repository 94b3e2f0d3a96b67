// Behavioral Trace Model
//
// A trace is the ordered list of API/method invocations observed while a
// sample ran. Each entry is a call descriptor of the form `name` or
// `name(arg1,arg2,...)`. Order is temporal and entries may repeat.
//
// This module owns descriptor parsing (the comparison key used by the diff)
// and the on-disk trace formats read by the CLI.

mod descriptor;
mod io;

pub use descriptor::CallDescriptor;
pub use io::{load_trace, parse_trace, save_trace};

use std::path::PathBuf;
use thiserror::Error;

/// Ordered sequence of call descriptors
pub type Trace = Vec<String>;

/// Errors raised while parsing or reading traces
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Malformed call descriptor {descriptor:?}: {reason}")]
    MalformedDescriptor {
        descriptor: String,
        reason: &'static str,
    },

    #[error("Failed to read trace file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON trace in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Extract the call names of a trace, dropping argument lists
///
/// Fails on the first malformed descriptor.
pub fn call_names<S: AsRef<str>>(trace: &[S]) -> Result<Vec<&str>, TraceError> {
    trace
        .iter()
        .map(|raw| CallDescriptor::parse(raw.as_ref()).map(|call| call.name()))
        .collect()
}

#[cfg(test)]
mod tests;
