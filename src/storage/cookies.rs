// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cookie-style flags shared with the login flow.
//!
//! Only `logged_state` is consulted by the session core: it records whether
//! the user was logged in before the current run and decides how an invalid
//! token is recovered.

use serde::Serialize;

use super::backend::{MemoryBackend, StorageBackend, StorageResult, WriteBatch};

/// Cookie recording the prior logged-in state (`"true"` / `"false"`).
pub const LOGGED_STATE_COOKIE: &str = "logged_state";

/// Prior logged-in flag as read from the cookie jar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggedState {
    /// Cookie is `"true"`.
    LoggedIn,
    /// Cookie is `"false"`.
    LoggedOut,
    /// Cookie absent or any other value.
    Unknown,
}

impl LoggedState {
    pub fn from_cookie(value: Option<&str>) -> Self {
        match value {
            Some("true") => LoggedState::LoggedIn,
            Some("false") => LoggedState::LoggedOut,
            _ => LoggedState::Unknown,
        }
    }
}

/// Small cookie jar on top of a storage backend.
pub struct CookieJar {
    backend: Box<dyn StorageBackend>,
}

impl CookieJar {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub fn get(&self, name: &str) -> StorageResult<Option<String>> {
        self.backend.get(name)
    }

    pub fn set(&mut self, name: &str, value: &str) -> StorageResult<()> {
        self.backend.commit(WriteBatch::new().set(name, value))
    }

    pub fn logged_state(&self) -> StorageResult<LoggedState> {
        Ok(LoggedState::from_cookie(
            self.get(LOGGED_STATE_COOKIE)?.as_deref(),
        ))
    }

    pub fn set_logged_state(&mut self, logged_in: bool) -> StorageResult<()> {
        self.set(LOGGED_STATE_COOKIE, if logged_in { "true" } else { "false" })
    }
}
