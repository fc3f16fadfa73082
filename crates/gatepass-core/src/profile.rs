//! Profile and account types shared across the system.
//!
//! A [`Profile`] is the live backend record for one account. It is the
//! authority for every decision in the system; QR payloads are snapshots of
//! it and never override it.

use std::fmt;

use chrono::{DateTime, Utc};
use gatepass_proto::{ClearanceStatus, Role};
use serde::{Deserialize, Serialize};

/// Opaque backend id of a profile.
///
/// Minted by the store (`uuid` v4 for the in-memory store, auth user id for
/// the hosted backend). Treated as an opaque string everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    /// Wraps a backend id.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The authenticated principal, as reported by the auth provider.
///
/// Carries only what the provider knows at sign-in time. The profile row is
/// fetched separately; see [`crate::Session`] for the state machine that
/// joins the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Backend id; also the profile row id.
    pub id: ProfileId,
    /// Sign-in email.
    pub email: String,
}

/// Live profile record for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Backend id.
    pub id: ProfileId,
    /// Sign-in email.
    pub email: String,
    /// Name shown on badges, rosters, and scan results.
    pub display_name: String,
    /// Account role; drives routing and capabilities.
    pub role: Role,
    /// Exit clearance. `Some` only carries meaning for drivers; the hosted
    /// store marks non-driver rows `"active"`, which maps to `None` here so
    /// it can never be read as a clearance state.
    pub clearance: Option<ClearanceStatus>,
    /// When clearance was last changed by a supervisor, if ever.
    pub last_updated: Option<DateTime<Utc>>,
}

impl Profile {
    /// Whether this profile belongs to a driver.
    #[must_use]
    pub fn is_driver(&self) -> bool {
        self.role == Role::Driver
    }

    /// Clearance with the conservative default: an absent or null status
    /// reads as [`ClearanceStatus::NotCleared`].
    #[must_use]
    pub fn clearance_or_default(&self) -> ClearanceStatus {
        self.clearance.unwrap_or(ClearanceStatus::NotCleared)
    }
}

/// Input to registration: everything needed to create an account and its
/// profile row in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Sign-in email; must be unique in the store.
    pub email: String,
    /// Sign-in password. Stored by the auth provider, never in the profile.
    pub password: String,
    /// Name shown on badges and rosters.
    pub display_name: String,
    /// Role picked at registration.
    pub role: Role,
}
