//! Per-screen view state.
//!
//! These are plain data holders mutated by [`crate::App`] and read by the
//! renderer. Validation that spans multiple fields lives here so the
//! machine and its tests share one definition of "submittable".

use gatepass_core::{NewAccount, Profile, Verification, VerifyError};
use gatepass_proto::{ClearancePayload, Role};

/// Which login field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    /// The email input.
    #[default]
    Email,
    /// The password input.
    Password,
}

/// State of the login screen.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    /// Email input buffer.
    pub email: String,
    /// Password input buffer.
    pub password: String,
    /// Focused field.
    pub focus: LoginField,
    /// A sign-in call is in flight.
    pub busy: bool,
    /// Feedback line under the form.
    pub notice: Option<String>,
}

impl LoginForm {
    /// Moves focus to the next field.
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    /// The focused input buffer.
    pub fn focused_input(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    /// Whether both fields are filled in.
    #[must_use]
    pub fn is_submittable(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

/// Which registration field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterField {
    /// The display name input.
    #[default]
    Name,
    /// The email input.
    Email,
    /// The password input.
    Password,
    /// The password confirmation input.
    Confirm,
    /// The role selector.
    Role,
}

/// State of the registration screen.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    /// Display name input buffer.
    pub name: String,
    /// Email input buffer.
    pub email: String,
    /// Password input buffer.
    pub password: String,
    /// Password confirmation buffer.
    pub confirm: String,
    /// Selected role.
    pub role: Role,
    /// Focused field.
    pub focus: RegisterField,
    /// A registration call is in flight.
    pub busy: bool,
    /// Feedback line under the form.
    pub notice: Option<String>,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm: String::new(),
            role: Role::Driver,
            focus: RegisterField::default(),
            busy: false,
            notice: None,
        }
    }
}

impl RegisterForm {
    /// Moves focus to the next field, wrapping after the role selector.
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            RegisterField::Name => RegisterField::Email,
            RegisterField::Email => RegisterField::Password,
            RegisterField::Password => RegisterField::Confirm,
            RegisterField::Confirm => RegisterField::Role,
            RegisterField::Role => RegisterField::Name,
        };
    }

    /// The focused input buffer, or `None` when the role selector has focus.
    pub fn focused_input(&mut self) -> Option<&mut String> {
        match self.focus {
            RegisterField::Name => Some(&mut self.name),
            RegisterField::Email => Some(&mut self.email),
            RegisterField::Password => Some(&mut self.password),
            RegisterField::Confirm => Some(&mut self.confirm),
            RegisterField::Role => None,
        }
    }

    /// Cycles the role selector.
    pub fn cycle_role(&mut self, forward: bool) {
        let roles = Role::ALL;
        let index = roles.iter().position(|role| *role == self.role).unwrap_or(0);
        let next = if forward {
            (index + 1) % roles.len()
        } else {
            (index + roles.len() - 1) % roles.len()
        };
        self.role = roles[next];
    }

    /// Checks the form and builds the account to create.
    ///
    /// # Errors
    ///
    /// Returns a message for the notice line when a field is empty or the
    /// passwords do not match.
    pub fn validate(&self) -> Result<NewAccount, String> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.confirm.is_empty()
        {
            return Err("Please fill in all fields".to_owned());
        }
        if self.password != self.confirm {
            return Err("Passwords do not match".to_owned());
        }
        Ok(NewAccount {
            email: self.email.trim().to_owned(),
            password: self.password.clone(),
            display_name: self.name.trim().to_owned(),
            role: self.role,
        })
    }
}

/// State of the supervisor's driver roster.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    /// All loaded driver rows.
    pub drivers: Vec<Profile>,
    /// Search filter over name and email.
    pub query: String,
    /// The search input is capturing keystrokes.
    pub searching: bool,
    /// Selected index into [`Self::visible`].
    pub selected: usize,
    /// A roster load is in flight.
    pub busy: bool,
    /// Feedback line under the list.
    pub notice: Option<String>,
    /// At least one load has completed.
    pub loaded: bool,
}

impl Roster {
    /// The rows matching the current search filter.
    #[must_use]
    pub fn visible(&self) -> Vec<&Profile> {
        let query = self.query.trim().to_lowercase();
        self.drivers
            .iter()
            .filter(|driver| {
                query.is_empty()
                    || driver.display_name.to_lowercase().contains(&query)
                    || driver.email.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// The currently selected visible row.
    #[must_use]
    pub fn selected_driver(&self) -> Option<&Profile> {
        self.visible().get(self.selected).copied()
    }

    /// Moves the selection, clamped to the visible rows.
    pub fn move_selection(&mut self, down: bool) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        if down {
            self.selected = (self.selected + 1).min(len - 1);
        } else {
            self.selected = self.selected.saturating_sub(1);
        }
    }

    /// Pulls the selection back into range after the rows changed.
    pub fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

/// State of the supervisor's single-driver screen.
#[derive(Debug, Clone)]
pub struct DriverDetails {
    /// The driver being shown.
    pub driver: Profile,
    /// A clearance write is in flight.
    pub busy: bool,
    /// Feedback line under the controls.
    pub notice: Option<String>,
}

impl DriverDetails {
    /// Opens the screen on a driver.
    #[must_use]
    pub fn new(driver: Profile) -> Self {
        Self {
            driver,
            busy: false,
            notice: None,
        }
    }
}

/// Where the scanner screen is in its single-flight cycle.
///
/// A new capture is only accepted in [`ScanPhase::Armed`]. Once a payload is
/// in flight the phase holds it until the verdict lands, so a second scan
/// cannot start a second verification.
#[derive(Debug, Clone)]
pub enum ScanPhase {
    /// Waiting for a capture.
    Armed,
    /// A decoded payload is being verified.
    Verifying {
        /// The payload in flight.
        payload: ClearancePayload,
    },
    /// A verdict is on screen.
    Done {
        /// The outcome of the last capture.
        result: ScanResult,
    },
}

/// The outcome of one scanner capture.
#[derive(Debug, Clone)]
pub enum ScanResult {
    /// The pass decoded and the live store answered.
    Verified(Verification),
    /// The capture never reached the store.
    Invalid {
        /// Why the capture was rejected.
        reason: String,
    },
    /// The pass decoded but no verdict could be reached.
    Failed {
        /// Why verification failed.
        error: VerifyError,
    },
}
