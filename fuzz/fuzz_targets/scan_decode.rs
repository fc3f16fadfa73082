//! Fuzz target for ClearancePayload::from_scan
//!
//! This fuzzer feeds arbitrary bytes to the scan decoder to find:
//! - Parser crashes or panics
//! - Truncated or deeply nested JSON that bypasses the strict schema
//! - Hostile field values in schema-valid documents
//!
//! The decoder should NEVER panic. All invalid inputs should return an error.

#![no_main]

use gatepass_proto::ClearancePayload;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The scanner hands the decoder strings; non-UTF-8 never reaches it.
    if let Ok(raw) = std::str::from_utf8(data) {
        let _ = ClearancePayload::from_scan(raw);
    }
});
