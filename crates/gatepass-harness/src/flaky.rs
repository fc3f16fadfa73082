//! Store fault injection.
//!
//! [`FlakyStore`] wraps any [`ProfileStore`] and turns calls into
//! `Unavailable` failures on demand. The inner store keeps all its state;
//! only the calls fail, like a backend that is briefly unreachable.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use gatepass_core::store::{ProfileStore, SessionWatch};
use gatepass_core::{AuthError, Identity, NewAccount, Profile, ProfileId, StoreError};
use gatepass_proto::ClearanceStatus;

/// Wraps a store and injects `Unavailable` failures.
///
/// Two knobs, combinable:
///
/// - [`set_offline`](Self::set_offline): every call fails until restored.
/// - [`fail_next`](Self::fail_next): the next `n` calls fail, then the
///   store recovers on its own.
///
/// The session feed passes through untouched: an unreachable backend does
/// not sign anybody out.
pub struct FlakyStore<S> {
    inner: S,
    offline: AtomicBool,
    failures_left: AtomicUsize,
    profile_reads: AtomicUsize,
    clearance_writes: AtomicUsize,
}

impl<S> FlakyStore<S> {
    /// Wraps `inner` with everything healthy.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            offline: AtomicBool::new(false),
            failures_left: AtomicUsize::new(0),
            profile_reads: AtomicUsize::new(0),
            clearance_writes: AtomicUsize::new(0),
        }
    }

    /// Takes the store offline (or back online).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Fails the next `calls` calls, replacing any earlier count.
    pub fn fail_next(&self, calls: usize) {
        self.failures_left.store(calls, Ordering::SeqCst);
    }

    /// How many profile reads were attempted, injected failures included.
    ///
    /// Scan tests use this to show that a capture which never decoded also
    /// never touched the store.
    pub fn profile_reads(&self) -> usize {
        self.profile_reads.load(Ordering::SeqCst)
    }

    /// How many clearance writes were attempted.
    ///
    /// Toggle tests use this to show that re-marking an unchanged driver
    /// writes nothing.
    pub fn clearance_writes(&self) -> usize {
        self.clearance_writes.load(Ordering::SeqCst)
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn take_failure(&self) -> bool {
        if self.offline.load(Ordering::SeqCst) {
            return true;
        }
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
    }

    fn auth_outage(call: &str) -> AuthError {
        tracing::info!(call, "injected auth outage");
        AuthError::Unavailable { detail: format!("injected outage during {call}") }
    }

    fn store_outage(call: &str) -> StoreError {
        tracing::info!(call, "injected store outage");
        StoreError::Unavailable { detail: format!("injected outage during {call}") }
    }
}

#[async_trait]
impl<S: ProfileStore> ProfileStore for FlakyStore<S> {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        if self.take_failure() {
            return Err(Self::auth_outage("authenticate"));
        }
        self.inner.authenticate(email, password).await
    }

    async fn register(&self, account: NewAccount) -> Result<Identity, AuthError> {
        if self.take_failure() {
            return Err(Self::auth_outage("register"));
        }
        self.inner.register(account).await
    }

    async fn end_session(&self) -> Result<(), AuthError> {
        if self.take_failure() {
            return Err(Self::auth_outage("end_session"));
        }
        self.inner.end_session().await
    }

    async fn fetch_profile(&self, id: &ProfileId) -> Result<Profile, StoreError> {
        self.profile_reads.fetch_add(1, Ordering::SeqCst);
        if self.take_failure() {
            return Err(Self::store_outage("fetch_profile"));
        }
        self.inner.fetch_profile(id).await
    }

    async fn update_clearance(
        &self,
        id: &ProfileId,
        status: ClearanceStatus,
    ) -> Result<(), StoreError> {
        self.clearance_writes.fetch_add(1, Ordering::SeqCst);
        if self.take_failure() {
            return Err(Self::store_outage("update_clearance"));
        }
        self.inner.update_clearance(id, status).await
    }

    async fn list_drivers(&self) -> Result<Vec<Profile>, StoreError> {
        if self.take_failure() {
            return Err(Self::store_outage("list_drivers"));
        }
        self.inner.list_drivers().await
    }

    fn subscribe_session(&self) -> SessionWatch {
        self.inner.subscribe_session()
    }
}

#[cfg(test)]
mod tests {
    use gatepass_core::store::MemoryStore;
    use gatepass_proto::Role;

    use super::*;

    fn account() -> NewAccount {
        NewAccount {
            email: "rosa@example.com".to_owned(),
            password: "pw123456".to_owned(),
            display_name: "Rosa Vale".to_owned(),
            role: Role::Driver,
        }
    }

    #[tokio::test]
    async fn healthy_wrapper_passes_through() {
        let store = FlakyStore::new(MemoryStore::new());
        let identity = store.register(account()).await.unwrap();

        let profile = store.fetch_profile(&identity.id).await.unwrap();
        assert_eq!(profile.display_name, "Rosa Vale");
        assert_eq!(store.profile_reads(), 1);
    }

    #[tokio::test]
    async fn fail_next_burns_down_then_recovers() {
        let store = FlakyStore::new(MemoryStore::new());
        let identity = store.register(account()).await.unwrap();

        store.fail_next(2);
        assert!(store.fetch_profile(&identity.id).await.unwrap_err().is_transient());
        assert!(store.list_drivers().await.unwrap_err().is_transient());
        assert!(store.fetch_profile(&identity.id).await.is_ok());
    }

    #[tokio::test]
    async fn offline_fails_everything_until_restored() {
        let store = FlakyStore::new(MemoryStore::new());
        let identity = store.register(account()).await.unwrap();

        store.set_offline(true);
        assert!(matches!(
            store.authenticate("rosa@example.com", "pw123456").await,
            Err(AuthError::Unavailable { .. })
        ));
        assert!(store.update_clearance(&identity.id, ClearanceStatus::Cleared).await.is_err());
        assert_eq!(store.clearance_writes(), 1);

        store.set_offline(false);
        assert!(store.authenticate("rosa@example.com", "pw123456").await.is_ok());
    }

    #[tokio::test]
    async fn outage_does_not_touch_the_session_feed() {
        let store = FlakyStore::new(MemoryStore::new());
        store.register(account()).await.unwrap();
        store.authenticate("rosa@example.com", "pw123456").await.unwrap();

        store.set_offline(true);
        assert!(store.subscribe_session().current().is_some());
    }
}
