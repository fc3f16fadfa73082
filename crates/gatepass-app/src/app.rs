//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the
//! interactive state of the application completely decoupled from I/O and
//! store mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Routes between screens based on the session's role.
//! - Owns the per-screen view state (forms, roster, badge, scanner phase).
//! - Gates store-call completions: every completion carries a key, and one
//!   that no longer matches the screen it was started from is dropped.
//!
//! # Invariants
//!
//! - Role-gated screens are only entered from an `Authenticated` session.
//! - The scanner accepts a capture only in [`ScanPhase::Armed`]; a capture
//!   that fails to decode never produces a store call.
//! - Sign-out resets every piece of per-session state.

use gatepass_core::{
    Identity, IssuedPass, Profile, Session, SessionAction, SessionEvent, SessionState,
};
use gatepass_proto::{ClearancePayload, ClearanceStatus};

use crate::state::{DriverDetails, LoginForm, RegisterForm, Roster, ScanPhase, ScanResult};
use crate::{AppAction, AppEvent, KeyInput, Route};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug)]
pub struct App {
    /// Auth state, joined with the profile fetch.
    session: Session,
    /// Screen currently shown.
    route: Route,
    /// Login screen state.
    login: LoginForm,
    /// Registration screen state.
    register: RegisterForm,
    /// The encoded badge, once issued. `None` while encoding.
    badge: Option<IssuedPass>,
    /// Supervisor roster state.
    roster: Roster,
    /// Open driver-details screen. `None` when not on that screen.
    details: Option<DriverDetails>,
    /// Scanner input buffer.
    scan_input: String,
    /// Scanner phase.
    scan: ScanPhase,
    /// Terminal dimensions (columns, rows).
    terminal_size: (u16, u16),
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create a new App on the login screen.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            route: Route::Login,
            login: LoginForm::default(),
            register: RegisterForm::default(),
            badge: None,
            roster: Roster::default(),
            details: None,
            scan_input: String::new(),
            scan: ScanPhase::Armed,
            terminal_size: (80, 24),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => vec![],
            AppEvent::Resize(cols, rows) => {
                self.terminal_size = (cols, rows);
                vec![AppAction::Render]
            },
            AppEvent::SessionChanged(identity) => self.on_session_changed(identity),
            AppEvent::SessionProfile { id, result } => {
                let session_event = match result {
                    Ok(profile) => SessionEvent::ProfileLoaded { id, profile },
                    Err(error) => SessionEvent::ProfileUnavailable { id, error },
                };
                let mut actions = self.apply_session(session_event);
                // First arrival of a profile moves off the public screens
                // onto the role's landing screen.
                if !self.route.requires_session()
                    && let SessionState::Authenticated(profile) = self.session.state()
                {
                    let landing = Route::landing(profile.role);
                    actions.extend(self.enter(landing));
                }
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::SignInFinished { result } => {
                self.login.busy = false;
                if let Err(error) = result {
                    self.login.notice = Some(error.to_string());
                }
                vec![AppAction::Render]
            },
            AppEvent::RegisterFinished { result } => {
                self.register.busy = false;
                match result {
                    Ok(_) => {
                        self.login = LoginForm {
                            email: self.register.email.trim().to_owned(),
                            notice: Some("Account created".to_owned()),
                            ..LoginForm::default()
                        };
                        self.register = RegisterForm::default();
                        self.route = Route::Login;
                    },
                    Err(error) => self.register.notice = Some(error.to_string()),
                }
                vec![AppAction::Render]
            },
            AppEvent::SignOutFinished { result } => {
                // The session feed delivers the actual transition; only a
                // failure is worth surfacing here.
                if let Err(error) = result {
                    self.status_message = Some(format!("Sign out failed: {error}"));
                }
                vec![AppAction::Render]
            },
            AppEvent::PassIssued { pass } => {
                if self.route != Route::DriverBadge {
                    return vec![];
                }
                self.badge = Some(pass);
                vec![AppAction::Render]
            },
            AppEvent::Scanned { raw } => {
                if self.route != Route::Scan || !matches!(self.scan, ScanPhase::Armed) {
                    return vec![];
                }
                self.submit_scan(&raw)
            },
            AppEvent::VerifyFinished { subject_id, result } => {
                let in_flight = matches!(
                    &self.scan,
                    ScanPhase::Verifying { payload } if payload.subject_id == subject_id.as_str()
                );
                if self.route != Route::Scan || !in_flight {
                    return vec![];
                }
                let result = match result {
                    Ok(verification) => ScanResult::Verified(verification),
                    Err(error) => ScanResult::Failed { error },
                };
                self.scan = ScanPhase::Done { result };
                vec![AppAction::Render]
            },
            AppEvent::RosterLoaded { result } => {
                self.roster.busy = false;
                self.roster.loaded = true;
                match result {
                    Ok(drivers) => {
                        self.roster.drivers = drivers;
                        self.roster.clamp_selection();
                        self.roster.notice = None;
                    },
                    // Keep whatever was on screen; the operator can retry.
                    Err(_) => self.roster.notice = Some("Failed to load drivers list".to_owned()),
                }
                vec![AppAction::Render]
            },
            AppEvent::ClearanceSaved { id, status, result } => {
                if let Some(details) = &mut self.details
                    && details.driver.id == id
                {
                    details.busy = false;
                    match &result {
                        Ok(()) => {
                            details.driver.clearance = Some(status);
                            let phrase = match status {
                                ClearanceStatus::Cleared => "cleared for exit",
                                ClearanceStatus::NotCleared => "not cleared for exit",
                            };
                            details.notice =
                                Some(format!("{} is now {phrase}", details.driver.display_name));
                        },
                        Err(error) => details.notice = Some(format!("Update failed: {error}")),
                    }
                }
                if result.is_ok()
                    && let Some(row) = self.roster.drivers.iter_mut().find(|row| row.id == id)
                {
                    row.clearance = Some(status);
                }
                vec![AppAction::Render]
            },
        }
    }

    /// Handle a session-feed transition.
    fn on_session_changed(&mut self, identity: Option<Identity>) -> Vec<AppAction> {
        let signed_out = identity.is_none();
        let mut actions = self.apply_session(SessionEvent::Changed(identity));
        if signed_out {
            self.reset_to_login();
        }
        actions.push(AppAction::Render);
        actions
    }

    /// Feed an event to the session machine, mapping its requests.
    fn apply_session(&mut self, event: SessionEvent) -> Vec<AppAction> {
        self.session
            .handle(event)
            .into_iter()
            .map(|action| match action {
                SessionAction::FetchProfile { id } => AppAction::FetchProfile { id },
            })
            .collect()
    }

    /// Drop all per-session state and return to the login screen.
    fn reset_to_login(&mut self) {
        self.route = Route::Login;
        self.login = LoginForm::default();
        self.register = RegisterForm::default();
        self.badge = None;
        self.roster = Roster::default();
        self.details = None;
        self.scan_input.clear();
        self.scan = ScanPhase::Armed;
        self.status_message = None;
    }

    /// Switch screens, starting the work the target screen needs.
    fn enter(&mut self, route: Route) -> Vec<AppAction> {
        self.route = route;
        match route {
            Route::DriverBadge => {
                self.badge = None;
                match self.session.profile() {
                    Some(profile) => vec![AppAction::IssuePass { profile: profile.clone() }],
                    None => vec![],
                }
            },
            Route::SupervisorHome => {
                self.roster.busy = true;
                self.roster.notice = None;
                self.roster.searching = false;
                vec![AppAction::LoadRoster]
            },
            Route::Scan => {
                self.scan = ScanPhase::Armed;
                self.scan_input.clear();
                vec![]
            },
            Route::Login
            | Route::Register
            | Route::DriverHome
            | Route::DriverDetails
            | Route::SecurityHome => vec![],
        }
    }

    /// Decode a capture and start verification if it decodes.
    ///
    /// Only called in [`ScanPhase::Armed`]. A capture that fails to decode
    /// settles immediately; no store call is made for it.
    fn submit_scan(&mut self, raw: &str) -> Vec<AppAction> {
        self.scan_input.clear();
        match ClearancePayload::from_scan(raw) {
            Ok(payload) => {
                self.scan = ScanPhase::Verifying { payload: payload.clone() };
                vec![AppAction::Verify { payload }, AppAction::Render]
            },
            Err(reason) => {
                self.scan =
                    ScanPhase::Done { result: ScanResult::Invalid { reason: reason.to_string() } };
                vec![AppAction::Render]
            },
        }
    }

    /// Process a key press for the current screen.
    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if key == KeyInput::Ctrl('c') {
            return vec![AppAction::Quit];
        }

        // While the profile is loading the forms are inert; the only
        // choices are retrying the fetch or abandoning the session.
        if matches!(self.session.state(), SessionState::Loading) {
            return match key {
                KeyInput::Char('r') => {
                    let mut actions: Vec<_> = self
                        .session
                        .refresh()
                        .into_iter()
                        .map(|SessionAction::FetchProfile { id }| AppAction::FetchProfile { id })
                        .collect();
                    actions.push(AppAction::Render);
                    actions
                },
                KeyInput::Char('l') => vec![AppAction::SignOut, AppAction::Render],
                KeyInput::Char('q') => vec![AppAction::Quit],
                _ => vec![],
            };
        }

        match self.route {
            Route::Login => self.handle_login_key(key),
            Route::Register => self.handle_register_key(key),
            Route::DriverHome => self.handle_driver_home_key(key),
            Route::DriverBadge => self.handle_badge_key(key),
            Route::SupervisorHome => self.handle_supervisor_key(key),
            Route::DriverDetails => self.handle_details_key(key),
            Route::SecurityHome => self.handle_security_key(key),
            Route::Scan => self.handle_scan_key(key),
        }
    }

    fn handle_login_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                self.login.focused_input().push(c);
                vec![AppAction::Render]
            },
            KeyInput::Backspace => {
                self.login.focused_input().pop();
                vec![AppAction::Render]
            },
            KeyInput::Tab | KeyInput::Up | KeyInput::Down => {
                self.login.focus_next();
                vec![AppAction::Render]
            },
            KeyInput::Enter => {
                if self.login.busy {
                    return vec![];
                }
                if !self.login.is_submittable() {
                    self.login.notice = Some("Enter email and password".to_owned());
                    return vec![AppAction::Render];
                }
                self.login.busy = true;
                self.login.notice = None;
                vec![
                    AppAction::SignIn {
                        email: self.login.email.trim().to_owned(),
                        password: self.login.password.clone(),
                    },
                    AppAction::Render,
                ]
            },
            KeyInput::Ctrl('r') => {
                self.register = RegisterForm::default();
                self.route = Route::Register;
                vec![AppAction::Render]
            },
            KeyInput::Esc => vec![AppAction::Quit],
            KeyInput::Ctrl(_) | KeyInput::Left | KeyInput::Right => vec![],
        }
    }

    fn handle_register_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Char(c) => {
                if let Some(buffer) = self.register.focused_input() {
                    buffer.push(c);
                }
                vec![AppAction::Render]
            },
            KeyInput::Backspace => {
                if let Some(buffer) = self.register.focused_input() {
                    buffer.pop();
                }
                vec![AppAction::Render]
            },
            KeyInput::Tab | KeyInput::Down => {
                self.register.focus_next();
                vec![AppAction::Render]
            },
            KeyInput::Left => {
                self.register.cycle_role(false);
                vec![AppAction::Render]
            },
            KeyInput::Right => {
                self.register.cycle_role(true);
                vec![AppAction::Render]
            },
            KeyInput::Enter => {
                if self.register.busy {
                    return vec![];
                }
                match self.register.validate() {
                    Ok(account) => {
                        self.register.busy = true;
                        self.register.notice = None;
                        vec![AppAction::Register { account }, AppAction::Render]
                    },
                    Err(message) => {
                        self.register.notice = Some(message);
                        vec![AppAction::Render]
                    },
                }
            },
            KeyInput::Esc => {
                self.route = Route::Login;
                vec![AppAction::Render]
            },
            KeyInput::Ctrl(_) | KeyInput::Up => vec![],
        }
    }

    fn handle_driver_home_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Char('b') => {
                let mut actions = self.enter(Route::DriverBadge);
                actions.push(AppAction::Render);
                actions
            },
            KeyInput::Char('r') => {
                let mut actions: Vec<_> = self
                    .session
                    .refresh()
                    .into_iter()
                    .map(|SessionAction::FetchProfile { id }| AppAction::FetchProfile { id })
                    .collect();
                actions.push(AppAction::Render);
                actions
            },
            KeyInput::Char('l') => vec![AppAction::SignOut, AppAction::Render],
            KeyInput::Char('q') => vec![AppAction::Quit],
            _ => vec![],
        }
    }

    fn handle_badge_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Esc => {
                self.route = Route::DriverHome;
                vec![AppAction::Render]
            },
            // Re-encode with a fresh timestamp after a status change.
            KeyInput::Char('r') => {
                let mut actions = self.enter(Route::DriverBadge);
                actions.push(AppAction::Render);
                actions
            },
            _ => vec![],
        }
    }

    fn handle_supervisor_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        if self.roster.searching {
            return match key {
                KeyInput::Char(c) => {
                    self.roster.query.push(c);
                    self.roster.clamp_selection();
                    vec![AppAction::Render]
                },
                KeyInput::Backspace => {
                    self.roster.query.pop();
                    self.roster.clamp_selection();
                    vec![AppAction::Render]
                },
                KeyInput::Enter | KeyInput::Esc => {
                    self.roster.searching = false;
                    vec![AppAction::Render]
                },
                _ => vec![],
            };
        }

        match key {
            KeyInput::Char('/') => {
                self.roster.searching = true;
                vec![AppAction::Render]
            },
            KeyInput::Up => {
                self.roster.move_selection(false);
                vec![AppAction::Render]
            },
            KeyInput::Down => {
                self.roster.move_selection(true);
                vec![AppAction::Render]
            },
            KeyInput::Enter => match self.roster.selected_driver().cloned() {
                Some(driver) => {
                    self.details = Some(DriverDetails::new(driver));
                    self.route = Route::DriverDetails;
                    vec![AppAction::Render]
                },
                None => vec![],
            },
            KeyInput::Char('r') => {
                let mut actions = self.enter(Route::SupervisorHome);
                actions.push(AppAction::Render);
                actions
            },
            KeyInput::Char('l') => vec![AppAction::SignOut, AppAction::Render],
            KeyInput::Char('q') => vec![AppAction::Quit],
            _ => vec![],
        }
    }

    fn handle_details_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Char('c') => self.request_clearance(ClearanceStatus::Cleared),
            KeyInput::Char('r') => self.request_clearance(ClearanceStatus::NotCleared),
            KeyInput::Esc => {
                self.details = None;
                self.route = Route::SupervisorHome;
                vec![AppAction::Render]
            },
            _ => vec![],
        }
    }

    /// Start a clearance write from the details screen.
    ///
    /// Writing the status the driver already has is a no-op, and only one
    /// write may be in flight at a time.
    fn request_clearance(&mut self, status: ClearanceStatus) -> Vec<AppAction> {
        let Some(details) = &mut self.details else {
            return vec![];
        };
        if details.busy || details.driver.clearance == Some(status) {
            return vec![];
        }
        details.busy = true;
        details.notice = None;
        vec![AppAction::SaveClearance { id: details.driver.id.clone(), status }, AppAction::Render]
    }

    fn handle_security_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match key {
            KeyInput::Char('s') => {
                let mut actions = self.enter(Route::Scan);
                actions.push(AppAction::Render);
                actions
            },
            KeyInput::Char('l') => vec![AppAction::SignOut, AppAction::Render],
            KeyInput::Char('q') => vec![AppAction::Quit],
            _ => vec![],
        }
    }

    fn handle_scan_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match (&self.scan, key) {
            (ScanPhase::Armed, KeyInput::Char(c)) => {
                self.scan_input.push(c);
                vec![AppAction::Render]
            },
            (ScanPhase::Armed, KeyInput::Backspace) => {
                self.scan_input.pop();
                vec![AppAction::Render]
            },
            (ScanPhase::Armed, KeyInput::Enter) => {
                if self.scan_input.trim().is_empty() {
                    return vec![];
                }
                let raw = std::mem::take(&mut self.scan_input);
                self.submit_scan(&raw)
            },
            (ScanPhase::Done { .. }, KeyInput::Char('n')) => {
                self.scan = ScanPhase::Armed;
                self.scan_input.clear();
                vec![AppAction::Render]
            },
            (_, KeyInput::Esc) => {
                self.scan = ScanPhase::Armed;
                self.scan_input.clear();
                self.route = Route::SecurityHome;
                vec![AppAction::Render]
            },
            _ => vec![],
        }
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Current session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Screen currently shown.
    #[must_use]
    pub fn route(&self) -> Route {
        self.route
    }

    /// Login screen state.
    #[must_use]
    pub fn login(&self) -> &LoginForm {
        &self.login
    }

    /// Registration screen state.
    #[must_use]
    pub fn register(&self) -> &RegisterForm {
        &self.register
    }

    /// The encoded badge, once issued. `None` while encoding.
    #[must_use]
    pub fn badge(&self) -> Option<&IssuedPass> {
        self.badge.as_ref()
    }

    /// Supervisor roster state.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Open driver-details screen, if any.
    #[must_use]
    pub fn details(&self) -> Option<&DriverDetails> {
        self.details.as_ref()
    }

    /// Scanner input buffer.
    #[must_use]
    pub fn scan_input(&self) -> &str {
        &self.scan_input
    }

    /// Scanner phase.
    #[must_use]
    pub fn scan(&self) -> &ScanPhase {
        &self.scan
    }

    /// The signed-in profile, when fully authenticated.
    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        self.session.profile()
    }

    /// Terminal dimensions (columns, rows).
    #[must_use]
    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Transient status message. `None` if no message.
    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
