// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Linkstash: a small personal bookmark manager.
//!
//! This crate is the presentation layer over a hosted auth + data backend;
//! persistence, session management, and row-level authorization all live
//! in the backend and are consumed through the capability traits in
//! [`backend`].

pub mod backend;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;

use std::sync::Arc;

use backend::{AuthGateway, BookmarkStore};
use config::Config;
use dashmap::DashMap;
use services::BookmarkController;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub auth: Arc<dyn AuthGateway>,
    pub store: Arc<dyn BookmarkStore>,
    /// Per-user bookmark view-models, created lazily on first page view
    pub controllers: DashMap<String, Arc<BookmarkController>>,
}
