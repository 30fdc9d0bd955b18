// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hosted backend access layer.
//!
//! The backend owns persistence, session management, and row-level
//! authorization. This server consumes it through two narrow capabilities,
//! injected as trait objects so tests can substitute fakes.

pub mod client;

pub use client::HostedBackend;

use async_trait::async_trait;

use crate::error::BackendError;
use crate::models::{
    Bookmark, BookmarkDraft, Profile, RefreshedSession, SessionCookies, SessionTokens, UserContext,
};

/// Table names as constants.
pub mod tables {
    pub const BOOKMARKS: &str = "bookmarks";
    pub const PROFILES: &str = "profiles";
}

/// Session and identity operations against the hosted auth service.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Refresh the session for one incoming request.
    ///
    /// An expired or absent session resolves to `user: None`; only a
    /// transport-level failure reaching the auth service is an `Err`.
    async fn refresh_session(
        &self,
        cookies: &SessionCookies,
    ) -> Result<RefreshedSession, BackendError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, BackendError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<SessionTokens, BackendError>;

    /// Revoke the session server-side. Cookie clearing is the caller's job.
    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;

    /// Read-only profile for the settings page.
    async fn profile(&self, user: &UserContext) -> Result<Profile, BackendError>;
}

/// Operations against the `bookmarks` table, scoped to the calling user by
/// the backend's row-level policy.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// All bookmarks owned by the user, newest-created first.
    async fn list(&self, user: &UserContext) -> Result<Vec<Bookmark>, BackendError>;

    /// Insert a bookmark; the backend assigns id and timestamps.
    async fn create(
        &self,
        user: &UserContext,
        draft: &BookmarkDraft,
    ) -> Result<Bookmark, BackendError>;

    /// Delete by id. Deleting a non-existent or non-owned id fails rather
    /// than silently succeeding.
    async fn delete(&self, user: &UserContext, id: &str) -> Result<(), BackendError>;
}
