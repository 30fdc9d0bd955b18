// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page handlers for the signed-in surfaces.
//!
//! The session guard has already resolved the identity and stored it in
//! request extensions; a request arriving here without one is a routing
//! bug, answered with 401 rather than a panic.

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Extension, Form,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::UserContext;
use crate::render;
use crate::services::BookmarkController;
use crate::AppState;

/// Identity inserted by the session guard.
fn current_user(user: Option<Extension<UserContext>>) -> Result<UserContext> {
    user.map(|Extension(user)| user)
        .ok_or(AppError::Unauthorized)
}

/// Fetch or lazily create the per-user collection controller.
fn controller_for(state: &AppState, user: &UserContext) -> Arc<BookmarkController> {
    state
        .controllers
        .entry(user.id.clone())
        .or_insert_with(|| Arc::new(BookmarkController::new(state.store.clone())))
        .clone()
}

/// `GET /` — dashboard with the bookmark count.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<UserContext>>,
) -> Result<Html<String>> {
    let user = current_user(user)?;

    // The dashboard is a summary; a failed count renders as zero rather
    // than blocking the page.
    let count = state
        .store
        .list(&user)
        .await
        .map(|bookmarks| bookmarks.len())
        .unwrap_or(0);

    Ok(Html(render::dashboard_page(count)))
}

/// `GET /bookmarks` — reload the collection and render it.
pub async fn bookmarks(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<UserContext>>,
) -> Result<Html<String>> {
    let user = current_user(user)?;

    let controller = controller_for(&state, &user);
    controller.refresh(Some(&user)).await;

    Ok(Html(render::bookmarks_page(&controller.snapshot())))
}

/// Add-bookmark form fields.
#[derive(Deserialize)]
pub struct BookmarkForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

/// `POST /bookmarks` — submit the add-bookmark form.
///
/// Outcome (field errors, banner, cleared or preserved form) lands in the
/// controller state and renders on the follow-up GET.
pub async fn create_bookmark(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<UserContext>>,
    Form(form): Form<BookmarkForm>,
) -> Result<Redirect> {
    let user = current_user(user)?;

    let controller = controller_for(&state, &user);
    controller.create(Some(&user), &form.title, &form.url).await;

    Ok(Redirect::to("/bookmarks"))
}

/// `POST /bookmarks/{id}/delete` — delete one bookmark.
pub async fn delete_bookmark(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<UserContext>>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let user = current_user(user)?;

    let controller = controller_for(&state, &user);
    controller.delete(&user, &id).await;

    Ok(Redirect::to("/bookmarks"))
}

/// `GET /settings` — profile and sign-out.
pub async fn settings(
    State(state): State<Arc<AppState>>,
    user: Option<Extension<UserContext>>,
) -> Result<Html<String>> {
    let user = current_user(user)?;

    let page = match state.auth.profile(&user).await {
        Ok(profile) => render::settings_page(Some(&profile), user.email.as_deref(), None),
        Err(err) => render::settings_page(None, user.email.as_deref(), Some(&err.message)),
    };

    Ok(Html(page))
}
