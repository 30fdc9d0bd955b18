//! Identity and session models.

use serde::{Deserialize, Serialize};

/// The authenticated identity resolved for one request.
///
/// Carries the access token used to act as this user against the hosted
/// backend; the backend's row-level policy derives ownership from it.
#[derive(Debug, Clone)]
pub struct UserContext {
    /// Backend-assigned user id
    pub id: String,
    /// Email address (may be absent for some identity providers)
    pub email: Option<String>,
    /// Bearer token for backend calls on behalf of this user
    pub access_token: String,
}

/// User profile, read-only in this app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
}

/// Opaque session tokens issued by the hosted auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds, when the auth service reports one
    pub expires_in: Option<i64>,
}

/// Session cookies as read from an incoming request.
#[derive(Debug, Clone, Default)]
pub struct SessionCookies {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Outcome of a per-request session refresh.
#[derive(Debug, Clone, Default)]
pub struct RefreshedSession {
    /// Resolved identity, absent when the session is missing or expired
    pub user: Option<UserContext>,
    /// New tokens to write back when the auth service rotated the session
    pub rotated: Option<SessionTokens>,
}
