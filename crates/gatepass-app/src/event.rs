//! Application input events.
//!
//! This module defines [`AppEvent`], the complete set of inputs that drive
//! the [`crate::App`] state machine.
//!
//! Events originate from three sources:
//! - User interactions (keyboard, resize) and system ticks.
//! - The store's session feed.
//! - Completions of store calls the runtime spawned earlier. Each carries
//!   enough of a key (profile id, subject id) for the machine to drop the
//!   ones that arrive late.

use gatepass_core::{
    AuthError, Identity, IssuedPass, Profile, ProfileId, StoreError, Verification, VerifyError,
};
use gatepass_proto::ClearanceStatus;

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick.
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// The auth feed reported a session transition.
    SessionChanged(Option<Identity>),

    /// A profile fetch for the session completed.
    SessionProfile {
        /// Which profile the fetch was for.
        id: ProfileId,
        /// The fetched row, or why it could not be read.
        result: Result<Profile, StoreError>,
    },

    /// A sign-in call completed.
    SignInFinished {
        /// The signed-in identity, or why sign-in failed.
        result: Result<Identity, AuthError>,
    },

    /// A registration call completed.
    RegisterFinished {
        /// The created identity, or why registration failed.
        result: Result<Identity, AuthError>,
    },

    /// A sign-out call completed.
    SignOutFinished {
        /// Why sign-out failed, if it did.
        result: Result<(), AuthError>,
    },

    /// A badge pass was issued.
    PassIssued {
        /// The freshly encoded pass.
        pass: IssuedPass,
    },

    /// The scanner captured a raw value.
    Scanned {
        /// Exactly what the scanner read.
        raw: String,
    },

    /// A verification call completed.
    VerifyFinished {
        /// The subject the verification was for.
        subject_id: ProfileId,
        /// The verdict, or why none could be reached.
        result: Result<Verification, VerifyError>,
    },

    /// A driver roster load completed.
    RosterLoaded {
        /// The driver list, or why it could not be loaded.
        result: Result<Vec<Profile>, StoreError>,
    },

    /// A clearance write completed.
    ClearanceSaved {
        /// The driver the write was for.
        id: ProfileId,
        /// The status that was written.
        status: ClearanceStatus,
        /// Why the write failed, if it did.
        result: Result<(), StoreError>,
    },
}
