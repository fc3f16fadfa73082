//! Pass issuing: turning a live profile into a QR document.

use gatepass_proto::ClearancePayload;

use crate::clock::Clock;
use crate::profile::Profile;

/// A freshly issued pass: the payload and its canonical JSON, ready for QR
/// rendering.
///
/// Passes are never persisted. The badge screen issues a new one every time
/// it is entered, so the QR always reflects the profile as last fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedPass {
    payload: ClearancePayload,
    encoded: String,
}

impl IssuedPass {
    /// The document embedded in the QR.
    #[must_use]
    pub fn payload(&self) -> &ClearancePayload {
        &self.payload
    }

    /// Canonical JSON, the exact string a scanner will read back.
    #[must_use]
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

/// Builds a pass from `profile`, stamped with the clock's now.
///
/// Pure given its inputs and infallible: the payload copies the profile
/// verbatim (role included) and defaults an absent clearance to
/// `not_cleared`. A non-driver profile produces a payload that will fail
/// decoding at the scanner, which is the intended containment; route gating
/// keeps the badge screen driver-only in the first place.
#[must_use]
pub fn issue_pass(profile: &Profile, clock: &dyn Clock) -> IssuedPass {
    let payload = ClearancePayload {
        subject_id: profile.id.as_str().to_owned(),
        name: profile.display_name.clone(),
        role: profile.role,
        status: profile.clearance_or_default(),
        encoded_at: clock.now(),
    };
    let encoded = payload.to_canonical_json();
    IssuedPass { payload, encoded }
}
