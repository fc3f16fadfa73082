//! Property-based tests for clearance payload encoding/decoding.
//!
//! These verify the codec laws for ALL issuable payloads, not just specific
//! examples: canonical encode/decode is an identity, decoding is total (never
//! panics), and schema violations are always rejected.

use chrono::{DateTime, Utc};
use gatepass_proto::{ClearancePayload, ClearanceStatus, Role};
use proptest::prelude::*;

/// Strategy for generating either clearance status
fn arbitrary_status() -> impl Strategy<Value = ClearanceStatus> {
    prop_oneof![Just(ClearanceStatus::Cleared), Just(ClearanceStatus::NotCleared)]
}

/// Strategy for generating backend-shaped subject ids (non-empty)
fn arbitrary_subject_id() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9-]{1,36}"
}

/// Strategy for generating encode timestamps at millisecond precision,
/// matching what badge screens actually stamp
fn arbitrary_encoded_at() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800i64, 0u32..1000u32).prop_filter_map("in-range timestamp", |(secs, millis)| {
        DateTime::from_timestamp(secs, millis * 1_000_000)
    })
}

/// Strategy for generating issuable payloads (driver role, non-empty subject)
fn arbitrary_payload() -> impl Strategy<Value = ClearancePayload> {
    (arbitrary_subject_id(), any::<String>(), arbitrary_status(), arbitrary_encoded_at()).prop_map(
        |(subject_id, name, status, encoded_at)| ClearancePayload {
            subject_id,
            name,
            role: Role::Driver,
            status,
            encoded_at,
        },
    )
}

#[test]
fn prop_payload_encode_decode_roundtrip() {
    proptest!(|(payload in arbitrary_payload())| {
        let json = payload.to_canonical_json();
        let decoded = ClearancePayload::from_scan(&json).expect("canonical JSON decodes");

        // PROPERTY: Round-trip must be identity, including the timestamp
        prop_assert_eq!(decoded, payload);
    });
}

#[test]
fn prop_decode_is_total() {
    proptest!(|(raw in any::<String>())| {
        // PROPERTY: Arbitrary text never panics the decoder; it either
        // decodes or reports a malformed payload
        let _ = ClearancePayload::from_scan(&raw);
    });
}

#[test]
fn prop_canonical_key_order() {
    // Restrict the name so substring search cannot collide with key names.
    proptest!(|(
        subject_id in arbitrary_subject_id(),
        name in "[a-z ]{0,24}",
        status in arbitrary_status(),
        encoded_at in arbitrary_encoded_at(),
    )| {
        let payload = ClearancePayload {
            subject_id,
            name,
            role: Role::Driver,
            status,
            encoded_at,
        };
        let json = payload.to_canonical_json();

        // Match `"key":` so a name value equal to a key name cannot collide.
        let positions: Vec<usize> =
            ["\"subjectId\":", "\"name\":", "\"role\":", "\"status\":", "\"encodedAt\":"]
                .iter()
                .map(|key| json.find(key).expect("key present"))
                .collect();

        // PROPERTY: Canonical encoding emits keys in the documented order
        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "key order drifted: {json}");
    });
}

#[test]
fn prop_non_driver_role_always_rejected() {
    proptest!(|(
        payload in arbitrary_payload(),
        role in prop_oneof![Just(Role::Supervisor), Just(Role::Security)],
    )| {
        let mut doc: serde_json::Value =
            serde_json::from_str(&payload.to_canonical_json()).expect("canonical JSON parses");
        doc["role"] = serde_json::Value::String(role.as_str().to_owned());
        let raw = doc.to_string();

        // PROPERTY: A pass claiming any non-driver role never decodes
        prop_assert!(ClearancePayload::from_scan(&raw).is_err());
    });
}

#[test]
fn prop_extra_key_always_rejected() {
    proptest!(|(
        payload in arbitrary_payload(),
        key in "[a-z]{3,12}",
        value in "[a-z0-9]{0,12}",
    )| {
        prop_assume!(!["name", "role", "status"].contains(&key.as_str()));

        let mut doc: serde_json::Value =
            serde_json::from_str(&payload.to_canonical_json()).expect("canonical JSON parses");
        doc[key] = serde_json::Value::String(value);
        let raw = doc.to_string();

        // PROPERTY: The key set is closed; any addition is malformed
        prop_assert!(ClearancePayload::from_scan(&raw).is_err());
    });
}

#[test]
fn prop_decoded_payload_is_issuable() {
    proptest!(|(payload in arbitrary_payload())| {
        let decoded = ClearancePayload::from_scan(&payload.to_canonical_json())
            .expect("canonical JSON decodes");

        // PROPERTY: Whatever decodes satisfies the pass invariants
        prop_assert!(!decoded.subject_id.trim().is_empty());
        prop_assert_eq!(decoded.role, Role::Driver);
    });
}
