//! Seed data for harness tests.
//!
//! One warehouse staff: two drivers, a supervisor, and a security officer,
//! all sharing [`PASSWORD`]. Seeding is synchronous so tests start from a
//! known store without an async setup phase.

use std::sync::Arc;

use gatepass_core::store::MemoryStore;
use gatepass_core::{AuthError, Clock, NewAccount, Profile};
use gatepass_proto::{ClearanceStatus, Role};

/// Password shared by every fixture account.
pub const PASSWORD: &str = "pw123456";

/// The seeded staff.
///
/// Each field holds the profile exactly as the store returns it after
/// seeding. The two drivers sort as Ivan, Rosa on the roster.
pub struct Staff {
    /// Driver already cleared for exit, stamped at seed time.
    pub cleared_driver: Profile,
    /// Driver not cleared.
    pub held_driver: Profile,
    /// The supervisor.
    pub supervisor: Profile,
    /// The security officer.
    pub security: Profile,
}

/// Seeds a store with [`Staff`], reading timestamps from `clock`.
pub fn seeded_store(clock: Arc<dyn Clock>) -> Result<(MemoryStore, Staff), AuthError> {
    let seeded_at = clock.now();
    let store = MemoryStore::with_clock(clock);

    let mut cleared_driver =
        store.insert_account(account("rosa@example.com", "Rosa Vale", Role::Driver))?;
    cleared_driver.clearance = Some(ClearanceStatus::Cleared);
    cleared_driver.last_updated = Some(seeded_at);
    store.insert_profile(cleared_driver.clone());

    let staff = Staff {
        cleared_driver,
        held_driver: store.insert_account(account(
            "ivan@example.com",
            "Ivan Petrov",
            Role::Driver,
        ))?,
        supervisor: store.insert_account(account(
            "priya@example.com",
            "Priya Nair",
            Role::Supervisor,
        ))?,
        security: store.insert_account(account(
            "omar@example.com",
            "Omar Haddad",
            Role::Security,
        ))?,
    };
    Ok((store, staff))
}

fn account(email: &str, display_name: &str, role: Role) -> NewAccount {
    NewAccount {
        email: email.to_owned(),
        password: PASSWORD.to_owned(),
        display_name: display_name.to_owned(),
        role,
    }
}
