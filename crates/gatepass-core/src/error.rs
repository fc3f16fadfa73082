//! Error types for the store adapter boundary.
//!
//! Two families: [`AuthError`] for credential operations and [`StoreError`]
//! for profile reads and writes. Adapters translate their transport's
//! failures into these; nothing above the adapter ever sees an HTTP status
//! or an I/O error.

use thiserror::Error;

use crate::profile::ProfileId;

/// Errors from credential operations (sign-in, registration, sign-out).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately does not say which.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Registration attempted with an email that already has an account.
    #[error("an account already exists for {email}")]
    EmailTaken {
        /// The email that collided.
        email: String,
    },

    /// The auth backend could not be reached. Transient; trying again later
    /// may succeed, but nothing retries automatically.
    #[error("auth backend unavailable: {detail}")]
    Unavailable {
        /// Transport-level description.
        detail: String,
    },

    /// The auth backend answered but rejected the request.
    #[error("auth backend rejected the request: {detail}")]
    Backend {
        /// Backend-supplied description.
        detail: String,
    },
}

/// Errors from profile reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No profile row exists for the id.
    #[error("no profile for subject {id}")]
    NotFound {
        /// The id that missed.
        id: ProfileId,
    },

    /// The store could not be reached. The caller must surface this as
    /// "could not verify" / "could not load", never as a definitive answer.
    #[error("profile store unavailable: {detail}")]
    Unavailable {
        /// Transport-level description.
        detail: String,
    },

    /// The store answered but rejected the request.
    #[error("profile store rejected the request: {detail}")]
    Backend {
        /// Backend-supplied description.
        detail: String,
    },
}

impl StoreError {
    /// Returns true if the failure is transient and a later identical call
    /// may succeed. `NotFound` and rejections are never transient.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
