// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the hosted backend.
//!
//! Talks to a Supabase-style API surface:
//! - `/auth/v1/*` for sign-up, password and refresh-token grants, sign-out,
//!   and the current-user endpoint
//! - `/rest/v1/*` for row-level-secured table access
//!
//! Every request carries the public `apikey` header; per-user requests add
//! the user's bearer token, which is what the backend's row-level policy
//! keys on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::backend::{tables, AuthGateway, BookmarkStore};
use crate::config::Config;
use crate::error::BackendError;
use crate::models::{
    Bookmark, BookmarkDraft, Profile, RefreshedSession, SessionCookies, SessionTokens, UserContext,
};

/// Bounded timeout so a hung backend surfaces as an error banner instead of
/// a wedged request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Hosted backend client.
#[derive(Clone)]
pub struct HostedBackend {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl HostedBackend {
    /// Create a new client from the connection parameters in `Config`.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: config.backend_url.clone(),
            anon_key: config.backend_anon_key.clone(),
        })
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, endpoint)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Fetch the user behind an access token.
    ///
    /// `Ok(None)` means the token was rejected (expired or revoked); only a
    /// transport failure or unexpected status is an `Err`.
    async fn fetch_user(&self, access_token: &str) -> Result<Option<AuthUserPayload>, BackendError> {
        let response = self
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| BackendError::new(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            _ => Ok(Some(check_json(response).await?)),
        }
    }

    /// Exchange a refresh token for a new session.
    ///
    /// `Ok(None)` means the refresh token is no longer valid.
    async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<TokenResponse>, BackendError> {
        let response = self
            .http
            .post(self.auth_url("token?grant_type=refresh_token"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| BackendError::new(e.to_string()))?;

        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            _ => Ok(Some(check_json(response).await?)),
        }
    }
}

#[async_trait]
impl AuthGateway for HostedBackend {
    async fn refresh_session(
        &self,
        cookies: &SessionCookies,
    ) -> Result<RefreshedSession, BackendError> {
        // A live access token resolves directly, with no rotation.
        if let Some(access_token) = &cookies.access_token {
            if let Some(user) = self.fetch_user(access_token).await? {
                return Ok(RefreshedSession {
                    user: Some(user.into_context(access_token)),
                    rotated: None,
                });
            }
        }

        // Otherwise fall back to the refresh token.
        let Some(refresh_token) = &cookies.refresh_token else {
            return Ok(RefreshedSession::default());
        };

        match self.exchange_refresh_token(refresh_token).await? {
            Some(tokens) => {
                let user = tokens.user.clone().into_context(&tokens.access_token);
                Ok(RefreshedSession {
                    user: Some(user),
                    rotated: Some(tokens.into_session_tokens()),
                })
            }
            // Expired session: unauthenticated, not an error.
            None => Ok(RefreshedSession::default()),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, BackendError> {
        let response = self
            .http
            .post(self.auth_url("token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| BackendError::new(e.to_string()))?;

        let tokens: TokenResponse = check_json(response).await?;
        Ok(tokens.into_session_tokens())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<SessionTokens, BackendError> {
        let response = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }))
            .send()
            .await
            .map_err(|e| BackendError::new(e.to_string()))?;

        let tokens: TokenResponse = check_json(response).await?;
        Ok(tokens.into_session_tokens())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let response = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| BackendError::new(e.to_string()))?;

        check_status(response).await
    }

    async fn profile(&self, user: &UserContext) -> Result<Profile, BackendError> {
        let response = self
            .http
            .get(self.table_url(tables::PROFILES))
            .header("apikey", &self.anon_key)
            .bearer_auth(&user.access_token)
            .query(&[
                ("select", "id,email,full_name".to_string()),
                ("id", format!("eq.{}", user.id)),
            ])
            .send()
            .await
            .map_err(|e| BackendError::new(e.to_string()))?;

        let mut rows: Vec<Profile> = check_json(response).await?;
        rows.pop()
            .ok_or_else(|| BackendError::new("Profile not found"))
    }
}

#[async_trait]
impl BookmarkStore for HostedBackend {
    async fn list(&self, user: &UserContext) -> Result<Vec<Bookmark>, BackendError> {
        let response = self
            .http
            .get(self.table_url(tables::BOOKMARKS))
            .header("apikey", &self.anon_key)
            .bearer_auth(&user.access_token)
            .query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", user.id)),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await
            .map_err(|e| BackendError::new(e.to_string()))?;

        check_json(response).await
    }

    async fn create(
        &self,
        user: &UserContext,
        draft: &BookmarkDraft,
    ) -> Result<Bookmark, BackendError> {
        let response = self
            .http
            .post(self.table_url(tables::BOOKMARKS))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(&user.access_token)
            .json(&serde_json::json!({
                "user_id": user.id,
                "title": draft.title,
                "url": draft.url,
            }))
            .send()
            .await
            .map_err(|e| BackendError::new(e.to_string()))?;

        let mut rows: Vec<Bookmark> = check_json(response).await?;
        rows.pop()
            .ok_or_else(|| BackendError::new("Backend returned no row for the created bookmark"))
    }

    async fn delete(&self, user: &UserContext, id: &str) -> Result<(), BackendError> {
        // The REST layer reports success even when the row-level policy hides
        // the row; ask for the deleted rows back so a no-op delete is an error.
        let response = self
            .http
            .delete(self.table_url(tables::BOOKMARKS))
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(&user.access_token)
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(|e| BackendError::new(e.to_string()))?;

        let rows: Vec<Bookmark> = check_json(response).await?;
        if rows.is_empty() {
            return Err(BackendError::new("Bookmark not found"));
        }
        Ok(())
    }
}

// ─── Wire Types ──────────────────────────────────────────────

/// Current-user payload from the auth service.
#[derive(Debug, Clone, Deserialize)]
struct AuthUserPayload {
    id: String,
    email: Option<String>,
}

impl AuthUserPayload {
    fn into_context(self, access_token: &str) -> UserContext {
        UserContext {
            id: self.id,
            email: self.email,
            access_token: access_token.to_string(),
        }
    }
}

/// Token grant response from the auth service.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: Option<i64>,
    user: AuthUserPayload,
}

impl TokenResponse {
    fn into_session_tokens(self) -> SessionTokens {
        SessionTokens {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_in: self.expires_in,
        }
    }
}

// ─── Response Handling ───────────────────────────────────────

/// Check response status and return the backend's message on failure.
async fn check_status(response: reqwest::Response) -> Result<(), BackendError> {
    if response.status().is_success() {
        return Ok(());
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::new(error_message(status, &body)))
}

/// Check response status and parse the JSON body.
async fn check_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, BackendError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::new(error_message(status, &body)));
    }

    response
        .json()
        .await
        .map_err(|e| BackendError::new(format!("JSON parse error: {}", e)))
}

/// Pull a human-readable message out of a backend error body.
///
/// The auth and REST surfaces disagree on the field name, so try the known
/// spellings before falling back to the raw body.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }

    format!("HTTP {}: {}", status, body)
}
