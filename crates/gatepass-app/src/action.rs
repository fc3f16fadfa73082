//! Actions emitted by the App state machine.
//!
//! The machine never touches the store or the terminal itself. Handling an
//! event returns a list of [`AppAction`]s and the runtime carries them out,
//! feeding completions back in as [`crate::AppEvent`]s.

use gatepass_core::{NewAccount, Profile, ProfileId};
use gatepass_proto::{ClearancePayload, ClearanceStatus};

/// Side effects requested by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Redraw the screen.
    Render,

    /// Shut the application down.
    Quit,

    /// Authenticate against the store.
    SignIn {
        /// Account email.
        email: String,
        /// Account password.
        password: String,
    },

    /// Create a new account.
    Register {
        /// The account to create.
        account: NewAccount,
    },

    /// End the current session.
    SignOut,

    /// Load a profile row.
    FetchProfile {
        /// The profile to load.
        id: ProfileId,
    },

    /// Encode a badge pass for a profile.
    IssuePass {
        /// The profile to encode.
        profile: Profile,
    },

    /// Verify a decoded pass against the live store.
    Verify {
        /// The decoded pass.
        payload: ClearancePayload,
    },

    /// Load the driver roster.
    LoadRoster,

    /// Write a driver's clearance status.
    SaveClearance {
        /// The driver to update.
        id: ProfileId,
        /// The status to write.
        status: ClearanceStatus,
    },
}
