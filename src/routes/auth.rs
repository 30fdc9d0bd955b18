// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth pages and session routes.
//!
//! Credentials are exchanged with the hosted auth service; the resulting
//! opaque tokens are stored in HttpOnly cookies and refreshed per-request
//! by the session guard.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use crate::middleware::session::{
    expired_session_cookie, session_cookie, ACCESS_COOKIE, REFRESH_COOKIE,
    REFRESH_COOKIE_MAX_AGE_SECONDS,
};
use crate::models::{SessionTokens, UserContext};
use crate::render;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", get(login_page).post(login_submit))
        .route("/auth/signup", get(signup_page).post(signup_submit))
        .route("/auth/logout", post(logout))
}

/// Return target carried through the auth pages.
#[derive(Deserialize)]
pub struct AuthPageQuery {
    redirect: Option<String>,
}

async fn login_page(Query(query): Query<AuthPageQuery>) -> Html<String> {
    Html(render::login_page(query.redirect.as_deref(), "", None))
}

async fn signup_page(Query(query): Query<AuthPageQuery>) -> Html<String> {
    Html(render::signup_page(query.redirect.as_deref(), "", "", None))
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
    redirect: Option<String>,
}

/// `POST /auth/login` — password grant against the hosted auth service.
async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth.sign_in(form.email.trim(), &form.password).await {
        Ok(tokens) => {
            tracing::info!("User signed in");
            session_response(tokens, form.redirect.as_deref(), state.config.cookie_secure)
        }
        Err(err) => Html(render::login_page(
            form.redirect.as_deref(),
            form.email.trim(),
            Some(&err.message),
        ))
        .into_response(),
    }
}

#[derive(Deserialize)]
pub struct SignupForm {
    email: String,
    password: String,
    full_name: Option<String>,
    redirect: Option<String>,
}

/// `POST /auth/signup` — create an account, then start a session.
async fn signup_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SignupForm>,
) -> Response {
    let full_name = form
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    match state
        .auth
        .sign_up(form.email.trim(), &form.password, full_name)
        .await
    {
        Ok(tokens) => {
            tracing::info!("User signed up");
            session_response(tokens, form.redirect.as_deref(), state.config.cookie_secure)
        }
        Err(err) => Html(render::signup_page(
            form.redirect.as_deref(),
            form.email.trim(),
            full_name.unwrap_or(""),
            Some(&err.message),
        ))
        .into_response(),
    }
}

/// `POST /auth/logout` — revoke the backend session and clear cookies.
///
/// Clearing the cookies is the outcome that matters; revocation is best
/// effort and a missing identity still gets a clean sign-out.
async fn logout(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<UserContext>>,
) -> Response {
    if let Some(Extension(user)) = user {
        if let Err(err) = state.auth.sign_out(&user.access_token).await {
            tracing::warn!(error = %err, "Backend sign-out failed, clearing cookies anyway");
        }
    }

    let jar = CookieJar::new()
        .add(expired_session_cookie(
            ACCESS_COOKIE,
            state.config.cookie_secure,
        ))
        .add(expired_session_cookie(
            REFRESH_COOKIE,
            state.config.cookie_secure,
        ));

    (jar, Redirect::to("/auth/login")).into_response()
}

/// Set the session cookies and send the user to their return target.
fn session_response(tokens: SessionTokens, redirect: Option<&str>, secure: bool) -> Response {
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

    // Only same-site return targets are honoured.
    let target = match redirect {
        Some(t) if t.starts_with('/') && !t.starts_with("//") => t,
        _ => "/",
    };

    (jar, Redirect::to(target)).into_response()
}
