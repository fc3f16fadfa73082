//! Screen routing.

use gatepass_proto::Role;

/// The screen currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Email and password entry.
    Login,
    /// Account creation form.
    Register,
    /// Driver landing screen with the live clearance status.
    DriverHome,
    /// The driver's encoded badge.
    DriverBadge,
    /// Supervisor landing screen with the driver roster.
    SupervisorHome,
    /// A single driver's row with clearance controls.
    DriverDetails,
    /// Security landing screen.
    SecurityHome,
    /// Scanner input and verification verdicts.
    Scan,
}

impl Route {
    /// The landing screen for a signed-in role.
    #[must_use]
    pub fn landing(role: Role) -> Self {
        match role {
            Role::Driver => Self::DriverHome,
            Role::Supervisor => Self::SupervisorHome,
            Role::Security => Self::SecurityHome,
        }
    }

    /// Whether this screen is only reachable while signed in.
    #[must_use]
    pub fn requires_session(self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landing_screens_match_roles() {
        assert_eq!(Route::landing(Role::Driver), Route::DriverHome);
        assert_eq!(Route::landing(Role::Supervisor), Route::SupervisorHome);
        assert_eq!(Route::landing(Role::Security), Route::SecurityHome);
    }

    #[test]
    fn only_auth_screens_are_public() {
        assert!(!Route::Login.requires_session());
        assert!(!Route::Register.requires_session());
        assert!(Route::DriverHome.requires_session());
        assert!(Route::Scan.requires_session());
    }
}
