//! Profile store abstraction.
//!
//! One trait covers the whole backend boundary: credentials, profile rows,
//! clearance writes, and the session feed. The rest of the system is written
//! against this trait and never learns which adapter is behind it; the
//! adapter is chosen once at startup.
//!
//! Implementations here: [`MemoryStore`] (in-process, for tests, simulation
//! and the demo TUI) and [`RestStore`] (hosted Supabase-style backend,
//! feature `rest`).

mod memory;
#[cfg(feature = "rest")]
mod rest;

use async_trait::async_trait;
use gatepass_proto::ClearanceStatus;
pub use memory::MemoryStore;
#[cfg(feature = "rest")]
pub use rest::{RestConfig, RestStore};
use tokio::sync::watch;

use crate::error::{AuthError, StoreError};
use crate::profile::{Identity, NewAccount, Profile, ProfileId};

/// Backend boundary for accounts, profiles, and the auth session.
///
/// Object-safe: the application holds `Arc<dyn ProfileStore>`. All methods
/// take `&self`; implementations share state internally (mutex or HTTP
/// client) so one instance serves every screen.
///
/// # Errors
///
/// Implementations map every transport failure into [`AuthError`] /
/// [`StoreError`]; no method panics on backend misbehavior. A transient
/// outage is always `Unavailable`, never `NotFound`.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Signs in with email and password.
    ///
    /// On success the session feed transitions to `Some(identity)` before
    /// this returns. Unknown email and wrong password are indistinguishable
    /// from the caller's side.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Creates an account and its profile row in one step.
    ///
    /// Drivers start [`ClearanceStatus::NotCleared`]; other roles carry no
    /// clearance at all. Does not start a session; the user signs in
    /// afterwards.
    async fn register(&self, account: NewAccount) -> Result<Identity, AuthError>;

    /// Ends the current session. The session feed transitions to `None`.
    async fn end_session(&self) -> Result<(), AuthError>;

    /// Reads one profile row.
    ///
    /// This is the authoritative read used by scan verification: whatever it
    /// returns wins over anything a QR payload claims.
    async fn fetch_profile(&self, id: &ProfileId) -> Result<Profile, StoreError>;

    /// Writes a driver's clearance and stamps `last_updated`.
    ///
    /// The write is scoped to driver rows: a missing id and a non-driver id
    /// both report [`StoreError::NotFound`], and the row is never touched.
    async fn update_clearance(
        &self,
        id: &ProfileId,
        status: ClearanceStatus,
    ) -> Result<(), StoreError>;

    /// All driver profiles, sorted by display name.
    ///
    /// Never returns non-driver rows, whatever the backend holds.
    async fn list_drivers(&self) -> Result<Vec<Profile>, StoreError>;

    /// Subscribes to auth-session transitions.
    ///
    /// The watch yields the current value immediately and every later
    /// transition. Dropping the handle unsubscribes; there is nothing else
    /// to clean up.
    fn subscribe_session(&self) -> SessionWatch;
}

/// Live feed of auth-session transitions (`Some(identity)` / `None`).
///
/// A thin wrapper over a watch receiver so callers do not couple to the
/// channel type.
#[derive(Debug, Clone)]
pub struct SessionWatch {
    rx: watch::Receiver<Option<Identity>>,
}

impl SessionWatch {
    pub(crate) fn new(rx: watch::Receiver<Option<Identity>>) -> Self {
        Self { rx }
    }

    /// The current session value without waiting.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.rx.borrow().clone()
    }

    /// Waits for the next transition and returns the new value.
    ///
    /// Returns `None` when the store has been dropped and no further
    /// transitions can happen.
    pub async fn changed(&mut self) -> Option<Option<Identity>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
