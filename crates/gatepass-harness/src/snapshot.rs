//! Render observations.
//!
//! The scripted driver records one [`ScreenSnapshot`] per render call: what
//! the operator would see, reduced to plain data so tests assert on it
//! without a terminal.

use gatepass_app::{App, Route, ScanPhase, ScanResult};
use gatepass_core::{SessionState, VerifyError};
use gatepass_proto::ClearanceStatus;

/// One rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSnapshot {
    /// Screen being shown.
    pub route: Route,
    /// The session is between identity and profile.
    pub loading: bool,
    /// Display name once the profile has arrived.
    pub profile_name: Option<String>,
    /// Status bar message.
    pub status: Option<String>,
    /// Feedback line on the login form.
    pub login_notice: Option<String>,
    /// Names visible on the roster, after the search filter.
    pub roster_names: Vec<String>,
    /// Roster feedback line.
    pub roster_notice: Option<String>,
    /// The details card, when one is open.
    pub details: Option<DetailsGlimpse>,
    /// Encoded pass text on the badge screen.
    pub badge_encoded: Option<String>,
    /// What the scan screen shows.
    pub scan: ScanGlimpse,
}

/// What the details card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsGlimpse {
    /// Driver on the card.
    pub name: String,
    /// Clearance as shown.
    pub clearance: Option<ClearanceStatus>,
    /// Feedback line.
    pub notice: Option<String>,
}

/// The scan screen, reduced to the verdict the operator acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanGlimpse {
    /// Ready for a capture.
    Armed,
    /// A verification is in flight.
    Verifying,
    /// Verified against the live record; exit permitted.
    Cleared {
        /// Driver name from the live record.
        name: String,
        /// The pass disagreed with the live record.
        stale: bool,
    },
    /// Verified against the live record; exit denied.
    Held {
        /// Driver name from the live record.
        name: String,
        /// The pass disagreed with the live record.
        stale: bool,
    },
    /// The capture did not decode. Nothing was looked up.
    Invalid {
        /// Decoder's reason.
        reason: String,
    },
    /// The store could not answer; the scan is neither accepted nor
    /// rejected.
    Unavailable,
    /// The live record rejected the pass (unknown subject, or no longer a
    /// driver).
    Rejected {
        /// Human-readable rejection.
        message: String,
    },
}

impl ScreenSnapshot {
    /// Captures the observable state of `app`.
    #[must_use]
    pub fn capture(app: &App) -> Self {
        Self {
            route: app.route(),
            loading: matches!(app.session().state(), SessionState::Loading),
            profile_name: app.profile().map(|profile| profile.display_name.clone()),
            status: app.status_message().map(str::to_owned),
            login_notice: app.login().notice.clone(),
            roster_names: app
                .roster()
                .visible()
                .iter()
                .map(|row| row.display_name.clone())
                .collect(),
            roster_notice: app.roster().notice.clone(),
            details: app.details().map(|details| DetailsGlimpse {
                name: details.driver.display_name.clone(),
                clearance: details.driver.clearance,
                notice: details.notice.clone(),
            }),
            badge_encoded: app.badge().map(|pass| pass.encoded().to_owned()),
            scan: ScanGlimpse::capture(app.scan()),
        }
    }
}

impl ScanGlimpse {
    fn capture(phase: &ScanPhase) -> Self {
        match phase {
            ScanPhase::Armed => Self::Armed,
            ScanPhase::Verifying { .. } => Self::Verifying,
            ScanPhase::Done { result } => match result {
                ScanResult::Verified(verification) if verification.exit_permitted() => {
                    Self::Cleared {
                        name: verification.display_name.clone(),
                        stale: !verification.is_consistent(),
                    }
                },
                ScanResult::Verified(verification) => Self::Held {
                    name: verification.display_name.clone(),
                    stale: !verification.is_consistent(),
                },
                ScanResult::Invalid { reason } => Self::Invalid { reason: reason.clone() },
                ScanResult::Failed { error: VerifyError::Unavailable { .. } } => Self::Unavailable,
                ScanResult::Failed { error } => Self::Rejected { message: error.to_string() },
            },
        }
    }
}
