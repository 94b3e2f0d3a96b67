#![no_main]

use libfuzzer_sys::fuzz_target;
use trout::sequence::diff_traces;
use trout::trace::{parse_trace, CallDescriptor};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing must never panic, whatever the input
        if let Ok(call) = CallDescriptor::parse(input) {
            let _ = call.arguments().count();
            assert!(!call.name().is_empty());
        }

        if let Ok(trace) = parse_trace(input) {
            if let Ok(diff) = diff_traces(&trace, &trace, true) {
                assert_eq!(diff, 0);
            }
        }
    }
});
