//! Live verification of scanned passes.
//!
//! The payload inside a QR is a claim. Verification re-reads the live
//! profile and answers from that record alone; the payload's own status is
//! kept only to detect staleness.
//!
//! # Invariants
//!
//! - The exit verdict derives from the live record, never from the payload.
//! - A store outage is reported as [`VerifyError::Unavailable`]: the scan is
//!   neither accepted nor rejected, and the operator is told so.
//! - One scan, one lookup. Nothing here retries.

use chrono::{DateTime, Utc};
use gatepass_proto::{ClearancePayload, ClearanceStatus, Role};
use thiserror::Error;

use crate::error::StoreError;
use crate::profile::ProfileId;
use crate::store::ProfileStore;

/// Outcome of verifying a scanned pass against the live store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    /// The driver the pass was issued for.
    pub subject_id: ProfileId,
    /// Display name from the live record (not the payload's copy).
    pub display_name: String,
    /// Clearance in the live record; the authority.
    pub live_status: ClearanceStatus,
    /// Clearance the payload claimed at encode time.
    pub payload_status: ClearanceStatus,
    /// When the pass was encoded.
    pub encoded_at: DateTime<Utc>,
}

impl Verification {
    /// Whether the pass still matches the live record. Advisory only: a
    /// mismatch means the pass is stale, not that the scan failed.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.live_status == self.payload_status
    }

    /// The exit decision. Derived solely from the live record.
    #[must_use]
    pub fn exit_permitted(&self) -> bool {
        self.live_status == ClearanceStatus::Cleared
    }
}

/// Why a decoded pass could not be verified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// No profile row exists for the subject. A definitive rejection.
    #[error("no record for subject {subject_id}")]
    SubjectNotFound {
        /// The id the pass named.
        subject_id: ProfileId,
    },

    /// The live record exists but is not a driver (the role changed after
    /// the pass was encoded). Its status marker is not a clearance state,
    /// so this is a definitive rejection too.
    #[error("subject {subject_id} is registered as {role}, not a driver")]
    SubjectNotDriver {
        /// The id the pass named.
        subject_id: ProfileId,
        /// What the live record says the subject is.
        role: Role,
    },

    /// The store could not answer. Not a rejection: the operator must be
    /// told verification could not be completed.
    #[error("verification unavailable: {source}")]
    Unavailable {
        /// The underlying store failure.
        #[source]
        source: StoreError,
    },
}

/// Verifies a decoded payload against the live profile record.
///
/// Exactly one store read per call. The caller decides what one failed call
/// means; nothing here retries or falls back to the payload's claim.
pub async fn verify<S>(store: &S, payload: &ClearancePayload) -> Result<Verification, VerifyError>
where
    S: ProfileStore + ?Sized,
{
    let subject_id = ProfileId::new(payload.subject_id.clone());

    let profile = match store.fetch_profile(&subject_id).await {
        Ok(profile) => profile,
        Err(StoreError::NotFound { id }) => {
            tracing::warn!(subject = %id, "scan named an unknown subject");
            return Err(VerifyError::SubjectNotFound { subject_id: id });
        },
        Err(source) => {
            tracing::warn!(subject = %subject_id, error = %source, "verification unavailable");
            return Err(VerifyError::Unavailable { source });
        },
    };

    if !profile.is_driver() {
        tracing::warn!(subject = %subject_id, role = %profile.role, "scan subject is not a driver");
        return Err(VerifyError::SubjectNotDriver { subject_id, role: profile.role });
    }

    let live_status = profile.clearance_or_default();
    let verification = Verification {
        subject_id,
        display_name: profile.display_name,
        live_status,
        payload_status: payload.status,
        encoded_at: payload.encoded_at,
    };
    if !verification.is_consistent() {
        tracing::warn!(
            subject = %verification.subject_id,
            payload = %verification.payload_status,
            live = %verification.live_status,
            "stale pass: payload disagrees with live record"
        );
    }
    Ok(verification)
}
