//! Clearance pass payload: schema, canonical encoding, strict decoding.
//!
//! The payload travels as a single JSON object inside a QR code. Keys are
//! camelCase and the key set is closed: any unknown key, missing key, or
//! out-of-vocabulary value is a decode rejection, never a lenient parse.
//!
//! # Invariants
//!
//! - Canonical encoding always emits the same key order:
//!   `subjectId`, `name`, `role`, `status`, `encodedAt`.
//! - A decoded payload always has a non-empty subject id and the `driver`
//!   role. Passes are issued for drivers only.
//! - `from_scan(to_canonical_json(p)) == p` for every issuable payload.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Exit-clearance state of a driver.
///
/// This is a closed two-value vocabulary. The hosted profile store also keeps
/// an `"active"` marker on non-driver rows; that marker is not a clearance
/// state and never deserializes into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearanceStatus {
    /// Driver may exit the warehouse.
    Cleared,
    /// Driver must not exit; the default for newly registered drivers.
    NotCleared,
}

impl ClearanceStatus {
    /// Wire literal for this status (`"cleared"` / `"not_cleared"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cleared => "cleared",
            Self::NotCleared => "not_cleared",
        }
    }

    /// Parses a wire literal. Returns `None` for anything outside the
    /// vocabulary, including the non-driver `"active"` marker.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "cleared" => Some(Self::Cleared),
            "not_cleared" => Some(Self::NotCleared),
            _ => None,
        }
    }

    /// Human-readable badge label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Cleared => "Cleared for Exit",
            Self::NotCleared => "Not Cleared for Exit",
        }
    }

    /// The opposite status. Supervisor screens toggle between the two.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Cleared => Self::NotCleared,
            Self::NotCleared => Self::Cleared,
        }
    }
}

impl fmt::Display for ClearanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account role. Routing and capabilities are keyed on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Presents a clearance pass at the gate.
    Driver,
    /// Manages driver clearance.
    Supervisor,
    /// Scans and verifies passes.
    Security,
}

impl Role {
    /// Wire literal for this role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Supervisor => "supervisor",
            Self::Security => "security",
        }
    }

    /// All roles, in registration-picker order.
    pub const ALL: [Role; 3] = [Role::Driver, Role::Supervisor, Role::Security];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The document carried by a clearance QR code.
///
/// A payload is a snapshot taken when the driver's badge screen is rendered:
/// whatever the profile said at that instant, stamped with the encode time.
/// Verification always re-reads the live profile; a payload whose `status`
/// disagrees with the live record is stale, not invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClearancePayload {
    /// Backend id of the driver this pass was issued for. Never empty.
    pub subject_id: String,

    /// Display name at encode time, shown to the scanning operator.
    pub name: String,

    /// Always [`Role::Driver`] in a valid pass; anything else is rejected
    /// at decode.
    pub role: Role,

    /// Clearance claimed at encode time. Advisory only.
    pub status: ClearanceStatus,

    /// When the pass was encoded (RFC 3339, UTC).
    pub encoded_at: DateTime<Utc>,
}

impl ClearancePayload {
    /// Canonical JSON text of this payload, with the fixed key order
    /// `subjectId`, `name`, `role`, `status`, `encodedAt`.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn to_canonical_json(&self) -> String {
        // A struct of strings and unit enums cannot fail to serialize.
        serde_json::to_string(self).expect("clearance payload serializes to JSON")
    }

    /// Strictly parses a scanned string into a payload.
    ///
    /// # Errors
    ///
    /// Every rejection is a [`MalformedPayload`]:
    ///
    /// - empty or whitespace-only input
    /// - text that is not JSON, or JSON that misses the schema (missing
    ///   keys, unknown keys, wrong types, out-of-vocabulary `role` or
    ///   `status`, unparseable `encodedAt`)
    /// - an empty `subjectId`
    /// - a schema-valid document whose role is not `driver`
    pub fn from_scan(raw: &str) -> Result<Self, MalformedPayload> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MalformedPayload::Empty);
        }

        let payload: Self = serde_json::from_str(trimmed)
            .map_err(|err| MalformedPayload::Json { detail: err.to_string() })?;
        payload.validate()?;
        Ok(payload)
    }

    fn validate(&self) -> Result<(), MalformedPayload> {
        if self.subject_id.trim().is_empty() {
            return Err(MalformedPayload::EmptySubject);
        }
        if self.role != Role::Driver {
            return Err(MalformedPayload::UnexpectedRole { role: self.role });
        }
        Ok(())
    }
}

/// Why a scanned value failed to decode into a [`ClearancePayload`].
///
/// All of these mean "invalid QR code" to the operator; the variants exist so
/// logs and tests can tell the causes apart. None of them trigger a store
/// lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedPayload {
    /// The scan produced no usable text.
    #[error("scanned value is empty")]
    Empty,

    /// The text is not a JSON document matching the pass schema.
    #[error("not a clearance document: {detail}")]
    Json {
        /// Parser message describing the first violation.
        detail: String,
    },

    /// Schema-valid JSON whose `subjectId` is empty.
    #[error("subject id is empty")]
    EmptySubject,

    /// Schema-valid JSON whose role is not `driver`.
    #[error("payload role is {role}, expected driver")]
    UnexpectedRole {
        /// The role the document actually carried.
        role: Role,
    },
}
