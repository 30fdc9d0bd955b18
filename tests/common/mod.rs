// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test fixtures: a scripted in-memory backend and an app builder.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::DashMap;

use linkstash::backend::{AuthGateway, BookmarkStore};
use linkstash::config::Config;
use linkstash::error::BackendError;
use linkstash::models::{
    Bookmark, BookmarkDraft, Profile, RefreshedSession, SessionCookies, SessionTokens, UserContext,
};
use linkstash::routes::create_router;
use linkstash::AppState;

pub const TEST_EMAIL: &str = "user@example.com";
pub const TEST_PASSWORD: &str = "password";

/// Scripted stand-in for the hosted backend.
///
/// Auth behaviour and per-operation failures are set by the test; bookmark
/// rows live in memory with deterministic ids and strictly increasing
/// creation timestamps.
#[derive(Default)]
pub struct MockBackend {
    user: Mutex<Option<UserContext>>,
    rotated: Mutex<Option<SessionTokens>>,
    refresh_fails: AtomicBool,
    profile: Mutex<Option<Profile>>,

    rows: Mutex<Vec<Bookmark>>,
    next_seq: AtomicU64,
    fail_list: Mutex<Option<String>>,
    fail_create: Mutex<Option<String>>,
    fail_delete: Mutex<Option<String>>,

    pub refresh_calls: AtomicU64,
    pub list_calls: AtomicU64,
    pub create_calls: AtomicU64,
    pub delete_calls: AtomicU64,
    pub sign_out_calls: AtomicU64,
}

impl MockBackend {
    /// Backend that resolves no identity.
    pub fn signed_out() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Backend that resolves a fixed identity on every refresh.
    pub fn signed_in(user_id: &str) -> Arc<Self> {
        let backend = Self::default();
        *backend.user.lock().unwrap() = Some(UserContext {
            id: user_id.to_string(),
            email: Some(TEST_EMAIL.to_string()),
            access_token: "access-token".to_string(),
        });
        *backend.profile.lock().unwrap() = Some(Profile {
            id: user_id.to_string(),
            email: TEST_EMAIL.to_string(),
            full_name: Some("Test User".to_string()),
        });
        Arc::new(backend)
    }

    /// Backend whose session refresh fails at the transport level.
    #[allow(dead_code)]
    pub fn failing_refresh() -> Arc<Self> {
        let backend = Self::default();
        backend.refresh_fails.store(true, Ordering::SeqCst);
        Arc::new(backend)
    }

    /// Report rotated tokens on the next refreshes.
    #[allow(dead_code)]
    pub fn set_rotation(&self, tokens: SessionTokens) {
        *self.rotated.lock().unwrap() = Some(tokens);
    }

    #[allow(dead_code)]
    pub fn set_list_failure(&self, message: Option<&str>) {
        *self.fail_list.lock().unwrap() = message.map(String::from);
    }

    #[allow(dead_code)]
    pub fn set_create_failure(&self, message: Option<&str>) {
        *self.fail_create.lock().unwrap() = message.map(String::from);
    }

    #[allow(dead_code)]
    pub fn set_delete_failure(&self, message: Option<&str>) {
        *self.fail_delete.lock().unwrap() = message.map(String::from);
    }

    /// The identity this backend resolves, for driving the controller
    /// directly.
    #[allow(dead_code)]
    pub fn user_context(&self) -> Option<UserContext> {
        self.user.lock().unwrap().clone()
    }

    /// Seed a bookmark row, oldest first.
    #[allow(dead_code)]
    pub fn seed_bookmark(&self, user_id: &str, title: &str, url: &str) -> Bookmark {
        let bookmark = self.new_row(user_id, title, url);
        self.rows.lock().unwrap().push(bookmark.clone());
        bookmark
    }

    fn new_row(&self, user_id: &str, title: &str, url: &str) -> Bookmark {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let created_at = chrono::DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc)
            + chrono::Duration::seconds(seq as i64);

        Bookmark {
            id: format!("bm-{}", seq),
            user_id: user_id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            created_at: created_at.to_rfc3339(),
            updated_at: created_at.to_rfc3339(),
        }
    }

    fn fixed_tokens() -> SessionTokens {
        SessionTokens {
            access_token: "access-token".to_string(),
            refresh_token: "refresh-token".to_string(),
            expires_in: Some(3600),
        }
    }
}

#[async_trait]
impl AuthGateway for MockBackend {
    async fn refresh_session(
        &self,
        _cookies: &SessionCookies,
    ) -> Result<RefreshedSession, BackendError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);

        if self.refresh_fails.load(Ordering::SeqCst) {
            return Err(BackendError::new("auth service unreachable"));
        }

        Ok(RefreshedSession {
            user: self.user.lock().unwrap().clone(),
            rotated: self.rotated.lock().unwrap().clone(),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, BackendError> {
        if email == TEST_EMAIL && password == TEST_PASSWORD {
            Ok(Self::fixed_tokens())
        } else {
            Err(BackendError::new("Invalid login credentials"))
        }
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _full_name: Option<&str>,
    ) -> Result<SessionTokens, BackendError> {
        Ok(Self::fixed_tokens())
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), BackendError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn profile(&self, _user: &UserContext) -> Result<Profile, BackendError> {
        self.profile
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| BackendError::new("Profile not found"))
    }
}

#[async_trait]
impl BookmarkStore for MockBackend {
    async fn list(&self, user: &UserContext) -> Result<Vec<Bookmark>, BackendError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.fail_list.lock().unwrap().clone() {
            return Err(BackendError::new(message));
        }

        let mut rows: Vec<Bookmark> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.user_id == user.id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create(
        &self,
        user: &UserContext,
        draft: &BookmarkDraft,
    ) -> Result<Bookmark, BackendError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.fail_create.lock().unwrap().clone() {
            return Err(BackendError::new(message));
        }

        let bookmark = self.new_row(&user.id, &draft.title, &draft.url);
        self.rows.lock().unwrap().push(bookmark.clone());
        Ok(bookmark)
    }

    async fn delete(&self, user: &UserContext, id: &str) -> Result<(), BackendError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.fail_delete.lock().unwrap().clone() {
            return Err(BackendError::new(message));
        }

        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| !(row.id == id && row.user_id == user.id));

        if rows.len() == before {
            return Err(BackendError::new("Bookmark not found"));
        }
        Ok(())
    }
}

/// Create a test app over the given mock backend.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(backend: Arc<MockBackend>) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        auth: backend.clone(),
        store: backend,
        controllers: DashMap::new(),
    });

    (create_router(state.clone()), state)
}
