// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Storage Module
//!
//! Persistent, device-local state that survives restarts: the credential
//! store (known accounts and the active account) and the cookie jar
//! (`logged_state`).
//!
//! ## Storage Layout
//!
//! ```text
//! .tradebot/
//!   session.json    # accountsList, clientAccounts, authToken, active_loginid
//!   cookies.json    # logged_state
//! ```
//!
//! Both files are flat string maps. Every mutation is a single
//! [`WriteBatch`] committed through a temp-file + rename, so readers never
//! observe a half-applied update (e.g. `active_loginid` without
//! `authToken`).

pub mod backend;
pub mod cookies;
pub mod credentials;
pub mod paths;

pub use backend::{
    FileBackend, MemoryBackend, StorageBackend, StorageError, StorageResult, WriteBatch,
};
pub use cookies::{CookieJar, LoggedState, LOGGED_STATE_COOKIE};
pub use credentials::{ActiveSession, CredentialSnapshot, CredentialStore};
pub use paths::StoragePaths;

/// Open the file-backed credential store and cookie jar under `paths`.
pub fn open_on_disk(paths: &StoragePaths) -> StorageResult<(CredentialStore, CookieJar)> {
    let store = CredentialStore::new(FileBackend::open(paths.session_file())?);
    let cookies = CookieJar::new(FileBackend::open(paths.cookies_file())?);
    Ok((store, cookies))
}
