// Trace Sequence Operations
//
// Two stateless algorithms over behavioral traces:
//
// - Dissimilarity: position-wise comparison of two traces, counting length
//   mismatch plus differing calls in the shared prefix. Used to quantify how
//   far an execution deviates from a baseline.
//
// - Injection: splicing known malicious behaviors into a benign trace at
//   random offsets, producing labeled samples for detector training.
//
// Key Insight: order carries the semantics. A ransomware routine is a
// contiguous run of calls, so injected blocks are never interleaved and
// never overlap.

mod diff;
mod inject;

pub use diff::{compare_traces, diff_traces, TraceComparator, TraceDiff};
pub use inject::{
    inject_behaviors, BehaviorInjector, InjectedTrace, InjectionError, Insertion, InsertionPoint,
};
