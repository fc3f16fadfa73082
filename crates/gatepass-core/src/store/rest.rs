//! Hosted REST adapter for a Supabase-style backend.
//!
//! Auth goes through GoTrue (`/auth/v1/*`), profile rows through PostgREST
//! (`/rest/v1/users`). Every request carries the project `apikey`; the
//! bearer token is the signed-in access token when a session exists, the
//! anonymous key otherwise.
//!
//! The `users` table is wider than [`Profile`]; unknown columns are ignored
//! on read. Non-driver rows carry the `"active"` status marker, which maps
//! to no clearance at all, never to a clearance state.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatepass_proto::{ClearanceStatus, Role};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::watch;

use super::{ProfileStore, SessionWatch};
use crate::error::{AuthError, StoreError};
use crate::profile::{Identity, NewAccount, Profile, ProfileId};

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// Anonymous API key. Sent as `apikey` on every request and as the
    /// bearer token until someone signs in.
    pub anon_key: String,
}

/// [`ProfileStore`] backed by the hosted REST API.
pub struct RestStore {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: Arc<watch::Sender<Option<Identity>>>,
    access_token: RwLock<Option<String>>,
}

/// Profile row as stored in the `users` table (snake_case columns).
#[derive(Debug, Deserialize)]
struct UserRow {
    id: ProfileId,
    email: String,
    role: Role,
    display_name: String,
    status: Option<String>,
    last_updated: Option<DateTime<Utc>>,
}

impl UserRow {
    fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            email: self.email,
            display_name: self.display_name,
            role: self.role,
            // "active" and anything else outside the vocabulary reads as no
            // clearance, not as a clearance state.
            clearance: self.status.as_deref().and_then(ClearanceStatus::from_wire),
            last_updated: self.last_updated,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: ProfileId,
    #[serde(default)]
    email: Option<String>,
}

/// Signup returns either a session envelope or a bare user object,
/// depending on the project's email-confirmation setting. Accept both.
#[derive(Debug, Deserialize)]
struct SignupResponse {
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    id: Option<ProfileId>,
    #[serde(default)]
    email: Option<String>,
}

impl SignupResponse {
    fn into_user(self) -> Option<AuthUser> {
        match (self.user, self.id) {
            (Some(user), _) => Some(user),
            (None, Some(id)) => Some(AuthUser { id, email: self.email }),
            (None, None) => None,
        }
    }
}

fn unavailable(err: &reqwest::Error) -> StoreError {
    StoreError::Unavailable { detail: err.to_string() }
}

impl RestStore {
    /// Builds a store for `config`. Fails only if the HTTP client cannot
    /// initialize its TLS backend.
    pub fn new(config: RestConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| StoreError::Backend { detail: format!("http client: {err}") })?;
        let (session, _) = watch::channel(None);
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            anon_key: config.anon_key,
            session: Arc::new(session),
            access_token: RwLock::new(None),
        })
    }

    /// Current bearer token: the session's access token, or the anonymous
    /// key when signed out.
    ///
    /// # Panics
    ///
    /// Panics if the token lock is poisoned.
    #[allow(clippy::expect_used)]
    fn bearer(&self) -> String {
        self.access_token
            .read()
            .expect("RwLock poisoned")
            .clone()
            .unwrap_or_else(|| self.anon_key.clone())
    }

    #[allow(clippy::expect_used)]
    fn set_token(&self, token: Option<String>) {
        *self.access_token.write().expect("RwLock poisoned") = token;
    }

    fn rest_url(&self, query: &str) -> String {
        format!("{}/rest/v1/users?{query}", self.base_url)
    }

    async fn fetch_rows(&self, query: &str) -> Result<Vec<UserRow>, StoreError> {
        let response = self
            .http
            .get(self.rest_url(query))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|err| unavailable(&err))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_else(|err| err.to_string());
            return Err(StoreError::Backend { detail: format!("{status}: {detail}") });
        }
        response
            .json::<Vec<UserRow>>()
            .await
            .map_err(|err| StoreError::Backend { detail: format!("row decode: {err}") })
    }
}

#[async_trait]
impl ProfileStore for RestStore {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let response = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|err| AuthError::Unavailable { detail: err.to_string() })?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_else(|err| err.to_string());
            return Err(AuthError::Backend { detail: format!("{status}: {detail}") });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| AuthError::Backend { detail: format!("token decode: {err}") })?;
        let identity = Identity {
            id: token.user.id,
            email: token.user.email.unwrap_or_else(|| email.to_owned()),
        };

        self.set_token(Some(token.access_token));
        self.session.send_replace(Some(identity.clone()));
        tracing::info!(subject = %identity.id, "signed in");
        Ok(identity)
    }

    async fn register(&self, account: NewAccount) -> Result<Identity, AuthError> {
        let url = format!("{}/auth/v1/signup", self.base_url);
        let response = self
            .http
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": account.email, "password": account.password }))
            .send()
            .await
            .map_err(|err| AuthError::Unavailable { detail: err.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_else(|err| err.to_string());
            if detail.contains("already registered") || detail.contains("already exists") {
                return Err(AuthError::EmailTaken { email: account.email });
            }
            return Err(AuthError::Backend { detail: format!("signup failed ({status}): {detail}") });
        }

        let created: SignupResponse = response
            .json()
            .await
            .map_err(|err| AuthError::Backend { detail: format!("signup decode: {err}") })?;
        let user = created
            .into_user()
            .ok_or_else(|| AuthError::Backend { detail: "signup returned no user".to_owned() })?;

        let marker = if account.role == Role::Driver {
            ClearanceStatus::NotCleared.as_str()
        } else {
            "active"
        };
        let row = json!({
            "id": user.id,
            "email": account.email,
            "role": account.role.as_str(),
            "display_name": account.display_name,
            "status": marker,
        });
        let response = self
            .http
            .post(format!("{}/rest/v1/users", self.base_url))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=minimal")
            .bearer_auth(self.bearer())
            .json(&row)
            .send()
            .await
            .map_err(|err| AuthError::Unavailable { detail: err.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_else(|err| err.to_string());
            return Err(AuthError::Backend {
                detail: format!("profile row insert failed ({status}): {detail}"),
            });
        }

        tracing::info!(subject = %user.id, role = %account.role, "registered");
        let email = user.email.clone().unwrap_or(account.email);
        Ok(Identity { id: user.id, email })
    }

    async fn end_session(&self) -> Result<(), AuthError> {
        // Remote revocation is best-effort; the local session always ends.
        let result = self
            .http
            .post(format!("{}/auth/v1/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .send()
            .await;
        if let Err(err) = result {
            tracing::warn!("logout request failed: {err}");
        }

        self.set_token(None);
        self.session.send_replace(None);
        Ok(())
    }

    async fn fetch_profile(&self, id: &ProfileId) -> Result<Profile, StoreError> {
        let rows = self.fetch_rows(&format!("id=eq.{id}&select=*")).await?;
        rows.into_iter()
            .next()
            .map(UserRow::into_profile)
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })
    }

    async fn update_clearance(
        &self,
        id: &ProfileId,
        status: ClearanceStatus,
    ) -> Result<(), StoreError> {
        let body = json!({
            "status": status.as_str(),
            "last_updated": Utc::now(),
        });
        let response = self
            .http
            .patch(self.rest_url(&format!("id=eq.{id}&role=eq.driver")))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(self.bearer())
            .json(&body)
            .send()
            .await
            .map_err(|err| unavailable(&err))?;

        let http_status = response.status();
        if !http_status.is_success() {
            let detail = response.text().await.unwrap_or_else(|err| err.to_string());
            return Err(StoreError::Backend { detail: format!("{http_status}: {detail}") });
        }

        // PostgREST reports success even when the filter matched nothing;
        // the returned representation tells us whether a row was written.
        let written: Vec<UserRow> = response
            .json()
            .await
            .map_err(|err| StoreError::Backend { detail: format!("row decode: {err}") })?;
        if written.is_empty() {
            return Err(StoreError::NotFound { id: id.clone() });
        }

        tracing::info!(subject = %id, status = %status, "clearance updated");
        Ok(())
    }

    async fn list_drivers(&self) -> Result<Vec<Profile>, StoreError> {
        let rows = self.fetch_rows("role=eq.driver&select=*&order=display_name.asc").await?;
        Ok(rows.into_iter().map(UserRow::into_profile).collect())
    }

    fn subscribe_session(&self) -> SessionWatch {
        SessionWatch::new(self.session.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_marker_maps_to_no_clearance() {
        let row = UserRow {
            id: ProfileId::new("s-1"),
            email: "sam@example.com".to_owned(),
            role: Role::Supervisor,
            display_name: "Sam".to_owned(),
            status: Some("active".to_owned()),
            last_updated: None,
        };
        assert_eq!(row.into_profile().clearance, None);
    }

    #[test]
    fn driver_row_round_trips_clearance() {
        let row = UserRow {
            id: ProfileId::new("d-1"),
            email: "dana@example.com".to_owned(),
            role: Role::Driver,
            display_name: "Dana".to_owned(),
            status: Some("cleared".to_owned()),
            last_updated: None,
        };
        assert_eq!(row.into_profile().clearance, Some(ClearanceStatus::Cleared));
    }

    #[test]
    fn null_status_reads_as_no_clearance() {
        let row = UserRow {
            id: ProfileId::new("d-2"),
            email: "drew@example.com".to_owned(),
            role: Role::Driver,
            display_name: "Drew".to_owned(),
            status: None,
            last_updated: None,
        };
        let profile = row.into_profile();
        assert_eq!(profile.clearance, None);
        assert_eq!(profile.clearance_or_default(), ClearanceStatus::NotCleared);
    }

    #[test]
    fn rows_tolerate_unknown_columns() {
        let raw = r#"[{
            "id": "d-1",
            "email": "dana@example.com",
            "role": "driver",
            "display_name": "Dana",
            "status": "not_cleared",
            "last_updated": null,
            "created_at": "2024-03-01T00:00:00Z",
            "fcm_token": "abc"
        }]"#;
        let rows: Vec<UserRow> = serde_json::from_str(raw).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].role, Role::Driver);
    }

    #[test]
    fn signup_response_accepts_both_shapes() {
        let envelope: SignupResponse = serde_json::from_str(
            r#"{"access_token":"t","user":{"id":"u-1","email":"a@b.c"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.into_user().map(|u| u.id), Some(ProfileId::new("u-1")));

        let bare: SignupResponse =
            serde_json::from_str(r#"{"id":"u-2","email":"a@b.c","aud":"authenticated"}"#).unwrap();
        assert_eq!(bare.into_user().map(|u| u.id), Some(ProfileId::new("u-2")));
    }
}
