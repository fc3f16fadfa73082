//! Domain layer for gatepass: warehouse exit clearance.
//!
//! Everything that decides whether a driver walks out the gate lives here,
//! written against abstractions so the same logic runs in tests, simulation,
//! and production:
//!
//! - [`Profile`] / [`Identity`]: the live backend records
//! - [`store::ProfileStore`]: the backend boundary (in-memory or hosted REST)
//! - [`issue_pass`]: profile snapshot -> QR document
//! - [`verify`]: scanned document -> live-record verdict
//! - [`Session`]: auth feed + profile fetch join, as a pure state machine
//! - [`Clock`]: wall-clock injection for deterministic tests

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod clock;
mod error;
mod pass;
mod profile;
mod session;
pub mod store;
mod verify;

pub use clock::{Clock, SystemClock};
pub use error::{AuthError, StoreError};
pub use pass::{IssuedPass, issue_pass};
pub use profile::{Identity, NewAccount, Profile, ProfileId};
pub use session::{Session, SessionAction, SessionEvent, SessionState};
pub use verify::{Verification, VerifyError, verify};
