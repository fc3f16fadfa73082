//! In-memory profile store for tests, simulation, and the demo TUI.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gatepass_proto::{ClearanceStatus, Role};
use tokio::sync::watch;
use uuid::Uuid;

use super::{ProfileStore, SessionWatch};
use crate::clock::{Clock, SystemClock};
use crate::error::{AuthError, StoreError};
use crate::profile::{Identity, NewAccount, Profile, ProfileId};

/// In-process [`ProfileStore`].
///
/// Accounts and profiles live behind a mutex; the session feed is a watch
/// channel shared by all clones. Passwords are kept in plain text, which is
/// acceptable only because this store never outlives the process; the hosted
/// adapter owns real credential handling.
///
/// Lookups are O(1); `list_drivers` is O(profiles).
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    session: Arc<watch::Sender<Option<Identity>>>,
    clock: Arc<dyn Clock>,
}

struct Inner {
    /// Credential records keyed by normalized email.
    accounts: HashMap<String, Account>,

    /// Profile rows keyed by id.
    profiles: HashMap<ProfileId, Profile>,
}

struct Account {
    id: ProfileId,
    password: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl MemoryStore {
    /// Creates an empty store on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let (session, _) = watch::channel(None);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                accounts: HashMap::new(),
                profiles: HashMap::new(),
            })),
            session: Arc::new(session),
            clock,
        }
    }

    /// Creates an account and profile row synchronously.
    ///
    /// Same semantics as [`ProfileStore::register`]; exists as an inherent
    /// method so demo and test seeding does not need an async context.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned (a thread panicked while
    /// holding the lock). Acceptable for an in-process store.
    #[allow(clippy::expect_used)]
    pub fn insert_account(&self, account: NewAccount) -> Result<Profile, AuthError> {
        let email = normalize_email(&account.email);
        let mut inner = self.inner.lock().expect("Mutex poisoned");

        if inner.accounts.contains_key(&email) {
            return Err(AuthError::EmailTaken { email });
        }

        let id = ProfileId::new(Uuid::new_v4().to_string());
        let clearance = if account.role == Role::Driver {
            Some(ClearanceStatus::NotCleared)
        } else {
            None
        };
        let profile = Profile {
            id: id.clone(),
            email: email.clone(),
            display_name: account.display_name,
            role: account.role,
            clearance,
            last_updated: None,
        };

        inner
            .accounts
            .insert(email, Account { id: id.clone(), password: account.password });
        inner.profiles.insert(id, profile.clone());
        Ok(profile)
    }

    /// Inserts a profile row directly, without credentials.
    ///
    /// For seeding roster/verification tests that never sign in as the row.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn insert_profile(&self, profile: Profile) {
        let mut inner = self.inner.lock().expect("Mutex poisoned");
        inner.profiles.insert(profile.id.clone(), profile);
    }

    /// Number of profile rows. Useful for debugging and testing.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    pub fn profile_count(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").profiles.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = normalize_email(email);
        let identity = {
            let inner = self.inner.lock().expect("Mutex poisoned");
            let account = inner.accounts.get(&email).ok_or(AuthError::InvalidCredentials)?;
            if account.password != password {
                return Err(AuthError::InvalidCredentials);
            }
            Identity { id: account.id.clone(), email }
        };

        self.session.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn register(&self, account: NewAccount) -> Result<Identity, AuthError> {
        let profile = self.insert_account(account)?;
        Ok(Identity { id: profile.id, email: profile.email })
    }

    async fn end_session(&self) -> Result<(), AuthError> {
        self.session.send_replace(None);
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    async fn fetch_profile(&self, id: &ProfileId) -> Result<Profile, StoreError> {
        let inner = self.inner.lock().expect("Mutex poisoned");
        inner
            .profiles
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    async fn update_clearance(
        &self,
        id: &ProfileId,
        status: ClearanceStatus,
    ) -> Result<(), StoreError> {
        let now = self.clock.now();
        let mut inner = self.inner.lock().expect("Mutex poisoned");
        // The write is scoped to driver rows; a non-driver id misses.
        let profile = inner
            .profiles
            .get_mut(id)
            .filter(|profile| profile.is_driver())
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })?;

        profile.clearance = Some(status);
        profile.last_updated = Some(now);
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[allow(clippy::expect_used)]
    async fn list_drivers(&self) -> Result<Vec<Profile>, StoreError> {
        let inner = self.inner.lock().expect("Mutex poisoned");
        let mut drivers: Vec<Profile> =
            inner.profiles.values().filter(|p| p.is_driver()).cloned().collect();
        drivers.sort_by(|a, b| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(drivers)
    }

    fn subscribe_session(&self) -> SessionWatch {
        SessionWatch::new(self.session.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn new_driver(email: &str, name: &str) -> NewAccount {
        NewAccount {
            email: email.to_owned(),
            password: "pw123456".to_owned(),
            display_name: name.to_owned(),
            role: Role::Driver,
        }
    }

    #[tokio::test]
    async fn register_creates_not_cleared_driver() {
        let store = MemoryStore::new();
        let identity = store.register(new_driver("dana@example.com", "Dana")).await.unwrap();

        let profile = store.fetch_profile(&identity.id).await.unwrap();
        assert_eq!(profile.role, Role::Driver);
        assert_eq!(profile.clearance, Some(ClearanceStatus::NotCleared));
        assert!(profile.last_updated.is_none());
    }

    #[tokio::test]
    async fn register_creates_non_driver_without_clearance() {
        let store = MemoryStore::new();
        let identity = store
            .register(NewAccount {
                email: "sam@example.com".to_owned(),
                password: "pw123456".to_owned(),
                display_name: "Sam".to_owned(),
                role: Role::Supervisor,
            })
            .await
            .unwrap();

        let profile = store.fetch_profile(&identity.id).await.unwrap();
        assert_eq!(profile.clearance, None);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        store.register(new_driver("dana@example.com", "Dana")).await.unwrap();

        let err = store.register(new_driver("DANA@example.com ", "Dana Again")).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken { .. }));
    }

    #[tokio::test]
    async fn register_does_not_start_a_session() {
        let store = MemoryStore::new();
        store.register(new_driver("dana@example.com", "Dana")).await.unwrap();
        assert_eq!(store.subscribe_session().current(), None);
    }

    #[tokio::test]
    async fn authenticate_feeds_session_and_sign_out_clears_it() {
        let store = MemoryStore::new();
        store.register(new_driver("dana@example.com", "Dana")).await.unwrap();

        let identity = store.authenticate("dana@example.com", "pw123456").await.unwrap();
        assert_eq!(store.subscribe_session().current(), Some(identity));

        store.end_session().await.unwrap();
        assert_eq!(store.subscribe_session().current(), None);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_identical() {
        let store = MemoryStore::new();
        store.register(new_driver("dana@example.com", "Dana")).await.unwrap();

        let wrong_pw = store.authenticate("dana@example.com", "nope").await.unwrap_err();
        let unknown = store.authenticate("ghost@example.com", "nope").await.unwrap_err();
        assert_eq!(wrong_pw, AuthError::InvalidCredentials);
        assert_eq!(unknown, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn update_clearance_stamps_last_updated() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let store = MemoryStore::with_clock(Arc::new(FixedClock(at)));
        let identity = store.register(new_driver("dana@example.com", "Dana")).await.unwrap();

        store.update_clearance(&identity.id, ClearanceStatus::Cleared).await.unwrap();

        let profile = store.fetch_profile(&identity.id).await.unwrap();
        assert_eq!(profile.clearance, Some(ClearanceStatus::Cleared));
        assert_eq!(profile.last_updated, Some(at));
    }

    #[tokio::test]
    async fn update_clearance_misses_non_drivers() {
        let store = MemoryStore::new();
        let identity = store
            .register(NewAccount {
                email: "sam@example.com".to_owned(),
                password: "pw123456".to_owned(),
                display_name: "Sam".to_owned(),
                role: Role::Supervisor,
            })
            .await
            .unwrap();

        let err = store.update_clearance(&identity.id, ClearanceStatus::Cleared).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        // The supervisor row itself is untouched.
        let profile = store.fetch_profile(&identity.id).await.unwrap();
        assert_eq!(profile.clearance, None);
    }

    #[tokio::test]
    async fn update_clearance_for_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_clearance(&ProfileId::new("ghost"), ClearanceStatus::Cleared)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_drivers_filters_and_sorts() {
        let store = MemoryStore::new();
        store.register(new_driver("zoe@example.com", "Zoe")).await.unwrap();
        store.register(new_driver("al@example.com", "al")).await.unwrap();
        store
            .register(NewAccount {
                email: "sam@example.com".to_owned(),
                password: "pw123456".to_owned(),
                display_name: "Sam".to_owned(),
                role: Role::Supervisor,
            })
            .await
            .unwrap();

        let drivers = store.list_drivers().await.unwrap();
        let names: Vec<&str> = drivers.iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, ["al", "Zoe"]);
        assert!(drivers.iter().all(Profile::is_driver));
    }

    #[tokio::test]
    async fn session_watch_sees_transitions_in_order() {
        let store = MemoryStore::new();
        store.register(new_driver("dana@example.com", "Dana")).await.unwrap();
        let mut watch = store.subscribe_session();
        assert_eq!(watch.current(), None);

        let identity = store.authenticate("dana@example.com", "pw123456").await.unwrap();
        assert_eq!(watch.changed().await, Some(Some(identity)));

        store.end_session().await.unwrap();
        assert_eq!(watch.changed().await, Some(None));
    }
}
