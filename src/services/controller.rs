// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bookmark collection view-model.
//!
//! Reconciles the rendered bookmark list with backend state across List,
//! Create, and Delete. The displayed list is rewritten wholesale on every
//! successful List and never touched on failure, so an error leaves the
//! last good view on screen. Out-of-order List completions are discarded
//! via a monotonic sequence ticket.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use validator::Validate;

use crate::backend::BookmarkStore;
use crate::models::{Bookmark, BookmarkDraft, UserContext};

/// Per-user controller for the bookmark collection.
pub struct BookmarkController {
    store: Arc<dyn BookmarkStore>,
    /// Sequence of issued List calls; only the newest may apply its result.
    list_seq: AtomicU64,
    /// View state. The lock is never held across an await point.
    view: Mutex<ViewState>,
}

/// What the bookmarks page renders.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Bookmarks as last confirmed by the backend, newest-created first
    pub bookmarks: Vec<Bookmark>,
    /// True until the first List settles; distinguishes "still loading"
    /// from "no bookmarks yet"
    pub loading: bool,
    /// Page-level banner, kept until the next successful action
    pub error: Option<String>,
    pub form: FormState,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            bookmarks: Vec::new(),
            loading: true,
            error: None,
            form: FormState::default(),
        }
    }
}

/// Add-bookmark form state, preserved across failed submissions.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub title: String,
    pub url: String,
    pub title_error: Option<String>,
    pub url_error: Option<String>,
}

impl BookmarkController {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self {
            store,
            list_seq: AtomicU64::new(0),
            view: Mutex::new(ViewState::default()),
        }
    }

    /// Clone of the current view state for rendering.
    pub fn snapshot(&self) -> ViewState {
        self.view.lock().unwrap().clone()
    }

    /// List: reload the collection from the backend.
    ///
    /// With no identity the backend is not called and the view settles
    /// empty. On failure the previously displayed list stays put and the
    /// banner carries the backend message. A completion that lost the race
    /// to a newer List is dropped.
    pub async fn refresh(&self, user: Option<&UserContext>) {
        let Some(user) = user else {
            let mut view = self.view.lock().unwrap();
            view.bookmarks.clear();
            view.loading = false;
            return;
        };

        let ticket = self.list_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.store.list(user).await;

        let mut view = self.view.lock().unwrap();
        if ticket != self.list_seq.load(Ordering::SeqCst) {
            // A newer List was issued while this one was in flight.
            return;
        }

        view.loading = false;
        match result {
            Ok(bookmarks) => {
                view.bookmarks = bookmarks;
                view.error = None;
            }
            Err(err) => view.error = Some(err.message),
        }
    }

    /// Create: validate locally, then insert and re-run List.
    ///
    /// Invalid input records field errors and issues no backend call. A
    /// backend failure keeps the form populated so the user can retry
    /// without retyping.
    pub async fn create(&self, user: Option<&UserContext>, title: &str, url: &str) {
        let draft = BookmarkDraft::from_input(title, url);

        {
            let mut view = self.view.lock().unwrap();
            view.form.title = draft.title.clone();
            view.form.url = draft.url.clone();

            match draft.validate() {
                Ok(()) => {
                    view.form.title_error = None;
                    view.form.url_error = None;
                    view.error = None;
                }
                Err(errors) => {
                    let fields = errors.field_errors();
                    view.form.title_error = field_message(fields.get("title"));
                    view.form.url_error = field_message(fields.get("url"));
                    return;
                }
            }
        }

        let Some(user) = user else { return };

        match self.store.create(user, &draft).await {
            Ok(_) => {
                self.view.lock().unwrap().form = FormState::default();
                self.refresh(Some(user)).await;
            }
            Err(err) => self.view.lock().unwrap().error = Some(err.message),
        }
    }

    /// Delete: remove by id, then re-run List.
    ///
    /// The item is never removed optimistically; on failure it stays
    /// visible and the banner carries the backend message.
    pub async fn delete(&self, user: &UserContext, id: &str) {
        match self.store.delete(user, id).await {
            Ok(()) => self.refresh(Some(user)).await,
            Err(err) => self.view.lock().unwrap().error = Some(err.message),
        }
    }
}

/// First message recorded for a field, if any.
fn field_message(errors: Option<&&Vec<validator::ValidationError>>) -> Option<String> {
    errors
        .and_then(|errs| errs.first())
        .map(|err| match &err.message {
            Some(message) => message.to_string(),
            None => err.code.to_string(),
        })
}
