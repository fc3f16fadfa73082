//! Seeded in-memory backend for running without a hosted store.

use gatepass_core::store::MemoryStore;
use gatepass_core::{AuthError, NewAccount, Profile};
use gatepass_proto::{ClearanceStatus, Role};

/// Password shared by all demo accounts.
pub const DEMO_PASSWORD: &str = "demo1234";

/// The demo accounts, as `(email, role)` pairs for display on the login
/// screen.
pub const DEMO_ACCOUNTS: [(&str, &str); 4] = [
    ("dana@example.com", "driver, cleared"),
    ("miguel@example.com", "driver, not cleared"),
    ("sam@example.com", "supervisor"),
    ("gale@example.com", "security"),
];

fn account(email: &str, name: &str, role: Role) -> NewAccount {
    NewAccount {
        email: email.to_owned(),
        password: DEMO_PASSWORD.to_owned(),
        display_name: name.to_owned(),
        role,
    }
}

/// Builds a [`MemoryStore`] seeded with one account per role.
///
/// Dana starts cleared so the scanner has something to wave through;
/// Miguel starts with the registration default.
///
/// # Errors
///
/// Returns an error only if seeding collides with itself, which would be a
/// bug in the fixture.
pub fn seeded_store() -> Result<MemoryStore, AuthError> {
    let store = MemoryStore::new();

    let dana = store.insert_account(account("dana@example.com", "Dana Li", Role::Driver))?;
    store.insert_profile(Profile { clearance: Some(ClearanceStatus::Cleared), ..dana });

    store.insert_account(account("miguel@example.com", "Miguel Ortiz", Role::Driver))?;
    store.insert_account(account("sam@example.com", "Sam Keller", Role::Supervisor))?;
    store.insert_account(account("gale@example.com", "Gale Hart", Role::Security))?;

    Ok(store)
}
