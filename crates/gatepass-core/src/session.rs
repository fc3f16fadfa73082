//! Session context: joining the auth feed with profile fetches.
//!
//! The auth provider only says *who* is signed in; screens need the profile
//! row behind that identity. This state machine owns the join: identity
//! transitions come in, profile-fetch requests go out, and the state never
//! claims `Authenticated` until a profile for the *current* identity has
//! actually arrived.
//!
//! # Invariants
//!
//! - `Authenticated` always holds a profile matching the current identity.
//! - A failed fetch leaves the session in `Loading`; role-gated screens
//!   never render from a half-signed-in state.
//! - Completions are matched by profile id; anything stale is dropped.
//! - Nothing retries. [`Session::refresh`] is the only way to re-fetch.

use crate::error::StoreError;
use crate::profile::{Identity, Profile, ProfileId};

/// Authentication state as screens see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Nobody is signed in.
    Unauthenticated,
    /// An identity exists but its profile has not arrived yet.
    Loading,
    /// Identity and profile both present.
    Authenticated(Profile),
}

/// Inputs to the session machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The auth feed reported a transition (sign-in, sign-out, expiry).
    Changed(Option<Identity>),
    /// A profile fetch completed.
    ProfileLoaded {
        /// Which profile this completion is for.
        id: ProfileId,
        /// The fetched row.
        profile: Profile,
    },
    /// A profile fetch failed.
    ProfileUnavailable {
        /// Which profile the failed fetch was for.
        id: ProfileId,
        /// Why it failed.
        error: StoreError,
    },
}

/// Work the machine asks its runner to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Fetch the profile row for `id` and feed the result back as
    /// [`SessionEvent::ProfileLoaded`] / [`SessionEvent::ProfileUnavailable`].
    FetchProfile {
        /// The profile to fetch.
        id: ProfileId,
    },
}

/// The session state machine. Pure: no I/O, no clock, no retries.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    identity: Option<Identity>,
    last_error: Option<StoreError>,
}

impl Session {
    /// Starts unauthenticated.
    #[must_use]
    pub fn new() -> Self {
        Self { state: SessionState::Unauthenticated, identity: None, last_error: None }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current identity, if the auth feed has one.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The profile, only when fully authenticated.
    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        match &self.state {
            SessionState::Authenticated(profile) => Some(profile),
            SessionState::Unauthenticated | SessionState::Loading => None,
        }
    }

    /// The most recent fetch failure, cleared on success or sign-out.
    #[must_use]
    pub fn last_error(&self) -> Option<&StoreError> {
        self.last_error.as_ref()
    }

    /// Processes one event, returning any follow-up work.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        match event {
            SessionEvent::Changed(Some(identity)) => {
                let id = identity.id.clone();
                self.identity = Some(identity);
                self.state = SessionState::Loading;
                self.last_error = None;
                vec![SessionAction::FetchProfile { id }]
            },
            SessionEvent::Changed(None) => {
                self.identity = None;
                self.state = SessionState::Unauthenticated;
                self.last_error = None;
                Vec::new()
            },
            SessionEvent::ProfileLoaded { id, profile } => {
                if self.is_current(&id) {
                    self.state = SessionState::Authenticated(profile);
                    self.last_error = None;
                }
                Vec::new()
            },
            SessionEvent::ProfileUnavailable { id, error } => {
                if self.is_current(&id) {
                    // Stay in Loading (or keep the stale profile on a
                    // refresh); surface the error, do not retry.
                    self.last_error = Some(error);
                }
                Vec::new()
            },
        }
    }

    /// Re-fetches the current identity's profile on demand.
    ///
    /// While refreshing from `Authenticated`, the old profile keeps showing;
    /// the state only changes when the new row arrives.
    pub fn refresh(&mut self) -> Vec<SessionAction> {
        match &self.identity {
            Some(identity) => vec![SessionAction::FetchProfile { id: identity.id.clone() }],
            None => Vec::new(),
        }
    }

    fn is_current(&self, id: &ProfileId) -> bool {
        self.identity.as_ref().is_some_and(|identity| &identity.id == id)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use gatepass_proto::{ClearanceStatus, Role};

    use super::*;

    fn identity(id: &str) -> Identity {
        Identity { id: ProfileId::new(id), email: format!("{id}@example.com") }
    }

    fn profile(id: &str) -> Profile {
        Profile {
            id: ProfileId::new(id),
            email: format!("{id}@example.com"),
            display_name: id.to_uppercase(),
            role: Role::Driver,
            clearance: Some(ClearanceStatus::NotCleared),
            last_updated: None,
        }
    }

    #[test]
    fn sign_in_requests_a_fetch_and_loads() {
        let mut session = Session::new();
        let actions = session.handle(SessionEvent::Changed(Some(identity("d-1"))));

        assert_eq!(actions, vec![SessionAction::FetchProfile { id: ProfileId::new("d-1") }]);
        assert_eq!(session.state(), &SessionState::Loading);
        assert!(session.profile().is_none());
    }

    #[test]
    fn profile_arrival_authenticates() {
        let mut session = Session::new();
        session.handle(SessionEvent::Changed(Some(identity("d-1"))));
        let actions = session.handle(SessionEvent::ProfileLoaded {
            id: ProfileId::new("d-1"),
            profile: profile("d-1"),
        });

        assert!(actions.is_empty());
        assert!(matches!(session.state(), SessionState::Authenticated(p) if p.display_name == "D-1"));
    }

    #[test]
    fn sign_out_resets_everything() {
        let mut session = Session::new();
        session.handle(SessionEvent::Changed(Some(identity("d-1"))));
        session.handle(SessionEvent::ProfileLoaded {
            id: ProfileId::new("d-1"),
            profile: profile("d-1"),
        });

        let actions = session.handle(SessionEvent::Changed(None));
        assert!(actions.is_empty());
        assert_eq!(session.state(), &SessionState::Unauthenticated);
        assert!(session.identity().is_none());
    }

    #[test]
    fn failed_fetch_stays_loading_with_the_error_surfaced() {
        let mut session = Session::new();
        session.handle(SessionEvent::Changed(Some(identity("d-1"))));
        session.handle(SessionEvent::ProfileUnavailable {
            id: ProfileId::new("d-1"),
            error: StoreError::Unavailable { detail: "connect refused".into() },
        });

        assert_eq!(session.state(), &SessionState::Loading);
        assert!(session.last_error().is_some());
        assert!(session.profile().is_none());
    }

    #[test]
    fn stale_completion_for_previous_identity_is_dropped() {
        let mut session = Session::new();
        session.handle(SessionEvent::Changed(Some(identity("d-1"))));
        // Identity switches before the first fetch lands.
        session.handle(SessionEvent::Changed(Some(identity("d-2"))));

        session.handle(SessionEvent::ProfileLoaded {
            id: ProfileId::new("d-1"),
            profile: profile("d-1"),
        });
        assert_eq!(session.state(), &SessionState::Loading);

        session.handle(SessionEvent::ProfileLoaded {
            id: ProfileId::new("d-2"),
            profile: profile("d-2"),
        });
        assert!(matches!(session.state(), SessionState::Authenticated(p) if p.display_name == "D-2"));
    }

    #[test]
    fn stale_completion_after_sign_out_is_dropped() {
        let mut session = Session::new();
        session.handle(SessionEvent::Changed(Some(identity("d-1"))));
        session.handle(SessionEvent::Changed(None));

        session.handle(SessionEvent::ProfileLoaded {
            id: ProfileId::new("d-1"),
            profile: profile("d-1"),
        });
        assert_eq!(session.state(), &SessionState::Unauthenticated);
    }

    #[test]
    fn refresh_refetches_without_dropping_the_shown_profile() {
        let mut session = Session::new();
        session.handle(SessionEvent::Changed(Some(identity("d-1"))));
        session.handle(SessionEvent::ProfileLoaded {
            id: ProfileId::new("d-1"),
            profile: profile("d-1"),
        });

        let actions = session.refresh();
        assert_eq!(actions, vec![SessionAction::FetchProfile { id: ProfileId::new("d-1") }]);
        assert!(session.profile().is_some());

        let mut updated = profile("d-1");
        updated.clearance = Some(ClearanceStatus::Cleared);
        session.handle(SessionEvent::ProfileLoaded { id: ProfileId::new("d-1"), profile: updated });
        assert!(matches!(
            session.state(),
            SessionState::Authenticated(p) if p.clearance == Some(ClearanceStatus::Cleared)
        ));
    }

    #[test]
    fn refresh_while_signed_out_is_a_no_op() {
        let mut session = Session::new();
        assert!(session.refresh().is_empty());
    }
}
