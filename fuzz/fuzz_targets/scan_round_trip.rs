//! Fuzz target for the canonical-JSON round trip
//!
//! Every issuable payload must survive to_canonical_json -> from_scan
//! unchanged; a payload with a blank subject must be rejected at decode,
//! never mangled into something that verifies.

#![no_main]

use arbitrary::Arbitrary;
use chrono::DateTime;
use gatepass_proto::{ClearancePayload, ClearanceStatus, MalformedPayload, Role};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct RawPass {
    subject_id: String,
    name: String,
    cleared: bool,
    secs: i64,
    nanos: u32,
}

fuzz_target!(|raw: RawPass| {
    // Stay below the leap-second range; those have no canonical RFC 3339 form.
    let Some(encoded_at) = DateTime::from_timestamp(raw.secs, raw.nanos % 1_000_000_000) else {
        return;
    };
    let status = if raw.cleared { ClearanceStatus::Cleared } else { ClearanceStatus::NotCleared };
    let payload = ClearancePayload {
        subject_id: raw.subject_id,
        name: raw.name,
        role: Role::Driver,
        status,
        encoded_at,
    };

    let json = payload.to_canonical_json();
    if payload.subject_id.trim().is_empty() {
        assert_eq!(ClearancePayload::from_scan(&json), Err(MalformedPayload::EmptySubject));
    } else {
        assert_eq!(ClearancePayload::from_scan(&json), Ok(payload));
    }
});
