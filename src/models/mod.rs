// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod bookmark;
pub mod user;

pub use bookmark::{Bookmark, BookmarkDraft};
pub use user::{Profile, RefreshedSession, SessionCookies, SessionTokens, UserContext};
