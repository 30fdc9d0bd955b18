// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session guard middleware.
//!
//! Runs on every incoming request: refreshes the auth session through the
//! gateway, then applies two routing rules in order.
//!
//! 1. No identity on a protected path: redirect to the login page with the
//!    requested path recorded in the `redirect` parameter.
//! 2. An identity on an auth page: redirect to the recorded return target
//!    (default `/`), with the `redirect` parameter stripped.
//!
//! A failure to reach the auth service is treated as unauthenticated
//! (fail-closed); the guard sits on a security boundary.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::models::{RefreshedSession, SessionCookies, SessionTokens};
use crate::AppState;

/// Session cookie names.
pub const ACCESS_COOKIE: &str = "linkstash_access";
pub const REFRESH_COOKIE: &str = "linkstash_refresh";

/// Refresh cookie lifetime in seconds. The auth service bounds the real
/// session; this only keeps the cookie alive long enough to be refreshed.
pub const REFRESH_COOKIE_MAX_AGE_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Auth pages: reachable without a session, bounced when one is present.
pub const AUTH_PAGE_PREFIXES: &[&str] = &["/auth/login", "/auth/signup"];

/// Paths exempt from protection (served regardless of auth state).
pub const EXEMPT_PATH_PREFIXES: &[&str] = &["/assets/", "/favicon.ico", "/health"];

/// Static file extensions exempt from protection.
pub const EXEMPT_EXTENSIONS: &[&str] = &[".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Whether a path is one of the auth pages (login or signup).
pub fn is_auth_page(path: &str) -> bool {
    AUTH_PAGE_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// Whether a path requires an authenticated identity.
///
/// Everything is protected except the enumerated asset patterns and the
/// auth pages.
pub fn is_protected_path(path: &str) -> bool {
    if is_auth_page(path) {
        return false;
    }
    if EXEMPT_PATH_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        return false;
    }
    if EXEMPT_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return false;
    }
    true
}

/// Middleware that refreshes the session and enforces the routing rules.
pub async fn session_guard(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let cookies = SessionCookies {
        access_token: jar.get(ACCESS_COOKIE).map(|c| c.value().to_string()),
        refresh_token: jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()),
    };

    // Refresh exactly once, before any routing decision. Fail-closed: if the
    // auth service is unreachable the request counts as unauthenticated.
    let session = match state.auth.refresh_session(&cookies).await {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(
                error = %err,
                "Session refresh failed, treating request as unauthenticated"
            );
            RefreshedSession::default()
        }
    };

    let path = request.uri().path().to_string();
    let query = request.uri().query().map(|q| q.to_string());

    let response = match &session.user {
        None if is_protected_path(&path) => {
            let login = format!("/auth/login?redirect={}", urlencoding::encode(&path));
            Redirect::temporary(&login).into_response()
        }
        Some(_) if is_auth_page(&path) => {
            Redirect::temporary(&return_target(query.as_deref())).into_response()
        }
        _ => {
            if let Some(user) = session.user.clone() {
                request.extensions_mut().insert(user);
            }
            next.run(request).await
        }
    };

    apply_rotated_cookies(response, session.rotated, state.config.cookie_secure)
}

/// Resolve the return target from a query string: the decoded `redirect`
/// parameter (default `/`), with that parameter stripped and all other
/// parameters preserved. Only same-site targets are honoured.
fn return_target(query: Option<&str>) -> String {
    let mut target: Option<String> = None;
    let mut rest: Vec<&str> = Vec::new();

    for pair in query.unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == "redirect" {
            if let Ok(decoded) = urlencoding::decode(value) {
                target = Some(decoded.into_owned());
            }
        } else {
            rest.push(pair);
        }
    }

    let mut target = match target {
        Some(t) if t.starts_with('/') && !t.starts_with("//") => t,
        _ => "/".to_string(),
    };

    if !rest.is_empty() {
        target.push(if target.contains('?') { '&' } else { '?' });
        target.push_str(&rest.join("&"));
    }

    target
}

/// Write rotated session tokens onto the outgoing response.
///
/// Applied to redirects as well as pass-throughs so a rotated refresh token
/// is never dropped.
fn apply_rotated_cookies(
    response: Response,
    rotated: Option<SessionTokens>,
    secure: bool,
) -> Response {
    let Some(tokens) = rotated else {
        return response;
    };

    // The auth routes set or clear these cookies themselves (sign-in,
    // logout); their decision wins over the rotation.
    if response_sets_session_cookie(&response) {
        return response;
    }

    let jar = CookieJar::new()
        .add(session_cookie(
            ACCESS_COOKIE,
            tokens.access_token,
            tokens.expires_in,
            secure,
        ))
        .add(session_cookie(
            REFRESH_COOKIE,
            tokens.refresh_token,
            Some(REFRESH_COOKIE_MAX_AGE_SECONDS),
            secure,
        ));

    (jar, response).into_response()
}

/// Whether the response already carries a Set-Cookie for either session
/// cookie.
fn response_sets_session_cookie(response: &Response) -> bool {
    response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| {
            value.starts_with(&format!("{}=", ACCESS_COOKIE))
                || value.starts_with(&format!("{}=", REFRESH_COOKIE))
        })
}

/// Build a session cookie with the attributes shared by set and clear paths.
pub fn session_cookie(
    name: &'static str,
    value: String,
    max_age_seconds: Option<i64>,
    secure: bool,
) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();

    if let Some(seconds) = max_age_seconds {
        cookie.set_max_age(time::Duration::seconds(seconds));
    }

    cookie
}

/// Removal cookie matching the attributes of `session_cookie`.
pub fn expired_session_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(name, String::new(), None, secure);
    cookie.make_removal();
    cookie
}
