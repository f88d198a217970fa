// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store: known accounts and the active session.
//!
//! ## Persisted Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `accountsList` | JSON object `login_id -> token` |
//! | `clientAccounts` | JSON object `login_id -> {loginid, token, currency}` |
//! | `authToken` | active token |
//! | `active_loginid` | active account id |
//!
//! Object key order is preserved, so "first demo account" and "first real
//! account with currency X" follow the order in which accounts were first
//! stored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::backend::{MemoryBackend, StorageBackend, StorageError, StorageResult, WriteBatch};
use crate::models::AccountCredential;

pub const ACCOUNTS_LIST_KEY: &str = "accountsList";
pub const CLIENT_ACCOUNTS_KEY: &str = "clientAccounts";
pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const ACTIVE_LOGINID_KEY: &str = "active_loginid";

/// The currently selected account.
#[derive(Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub login_id: String,
    pub token: String,
}

impl std::fmt::Debug for ActiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveSession")
            .field("login_id", &self.login_id)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Token-free view of the store, safe to print or log.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CredentialSnapshot {
    pub login_ids: Vec<String>,
    pub active_login_id: Option<String>,
    pub has_active_token: bool,
}

/// Lenient shape of a `clientAccounts` entry.
#[derive(Debug, Deserialize)]
struct StoredDetail {
    #[serde(default)]
    loginid: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    currency: Option<String>,
}

/// Persisted record of known accounts and the active account.
pub struct CredentialStore {
    backend: Box<dyn StorageBackend>,
}

impl CredentialStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Ephemeral store, used by tests and one-shot runs.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    // ========== Readers ==========

    /// `accountsList` as ordered `(login_id, token)` pairs.
    pub fn accounts_index(&self) -> StorageResult<Vec<(String, String)>> {
        let Some(object) = self.read_object(ACCOUNTS_LIST_KEY)? else {
            return Ok(Vec::new());
        };

        object
            .into_iter()
            .map(|(login_id, token)| match token {
                Value::String(token) => Ok((login_id, token)),
                other => Err(StorageError::Corrupt {
                    key: ACCOUNTS_LIST_KEY.to_string(),
                    reason: format!("token for {login_id} is not a string: {other}"),
                }),
            })
            .collect()
    }

    /// `clientAccounts` as ordered credentials.
    ///
    /// Entries without a token keep an empty token; the map key wins over a
    /// missing `loginid` field.
    pub fn accounts_detail(&self) -> StorageResult<Vec<AccountCredential>> {
        let Some(object) = self.read_object(CLIENT_ACCOUNTS_KEY)? else {
            return Ok(Vec::new());
        };

        object
            .into_iter()
            .map(|(key, value)| {
                let detail: StoredDetail =
                    serde_json::from_value(value).map_err(|e| StorageError::Corrupt {
                        key: CLIENT_ACCOUNTS_KEY.to_string(),
                        reason: format!("entry {key}: {e}"),
                    })?;
                Ok(AccountCredential {
                    login_id: detail.loginid.unwrap_or(key),
                    token: detail.token.unwrap_or_default(),
                    currency: detail.currency.unwrap_or_default(),
                })
            })
            .collect()
    }

    pub fn active_login_id(&self) -> StorageResult<Option<String>> {
        self.backend.get(ACTIVE_LOGINID_KEY)
    }

    pub fn active_token(&self) -> StorageResult<Option<String>> {
        Ok(self
            .backend
            .get(AUTH_TOKEN_KEY)?
            .filter(|token| !token.is_empty()))
    }

    /// Both active fields, or `None` when either is missing.
    pub fn active_session(&self) -> StorageResult<Option<ActiveSession>> {
        let token = self.active_token()?;
        let login_id = self.active_login_id()?;
        Ok(match (login_id, token) {
            (Some(login_id), Some(token)) => Some(ActiveSession { login_id, token }),
            _ => None,
        })
    }

    /// True when a non-empty active token is stored.
    pub fn has_usable_token(&self) -> StorageResult<bool> {
        Ok(self.active_token()?.is_some())
    }

    pub fn snapshot(&self) -> StorageResult<CredentialSnapshot> {
        Ok(CredentialSnapshot {
            login_ids: self
                .accounts_index()?
                .into_iter()
                .map(|(login_id, _)| login_id)
                .collect(),
            active_login_id: self.active_login_id()?,
            has_active_token: self.has_usable_token()?,
        })
    }

    // ========== Mutations ==========

    /// Upsert credentials into `accountsList` and `clientAccounts`.
    ///
    /// Later entries for the same login id overwrite earlier ones. Existing
    /// entries that are unreadable are replaced rather than merged.
    pub fn merge_batch(&mut self, credentials: &[AccountCredential]) -> StorageResult<()> {
        if credentials.is_empty() {
            return Ok(());
        }

        let mut index = self.read_object_or_reset(ACCOUNTS_LIST_KEY)?;
        let mut detail = self.read_object_or_reset(CLIENT_ACCOUNTS_KEY)?;

        for credential in credentials {
            index.insert(
                credential.login_id.clone(),
                Value::String(credential.token.clone()),
            );
            detail.insert(credential.login_id.clone(), serde_json::to_value(credential)?);
        }

        self.backend.commit(
            WriteBatch::new()
                .set(ACCOUNTS_LIST_KEY, Value::Object(index).to_string())
                .set(CLIENT_ACCOUNTS_KEY, Value::Object(detail).to_string()),
        )
    }

    /// Make `login_id`/`token` the active session.
    pub fn select_active(&mut self, login_id: &str, token: &str) -> StorageResult<()> {
        self.backend.commit(
            WriteBatch::new()
                .set(AUTH_TOKEN_KEY, token)
                .set(ACTIVE_LOGINID_KEY, login_id),
        )
    }

    /// Drop the active session but keep the known accounts.
    pub fn deactivate(&mut self) -> StorageResult<()> {
        self.backend.commit(
            WriteBatch::new()
                .remove(AUTH_TOKEN_KEY)
                .remove(ACTIVE_LOGINID_KEY),
        )
    }

    /// Remove every credential key.
    pub fn clear(&mut self) -> StorageResult<()> {
        self.backend.commit(
            WriteBatch::new()
                .remove(ACCOUNTS_LIST_KEY)
                .remove(CLIENT_ACCOUNTS_KEY)
                .remove(AUTH_TOKEN_KEY)
                .remove(ACTIVE_LOGINID_KEY),
        )
    }

    // ========== Helpers ==========

    fn read_object(&self, key: &str) -> StorageResult<Option<Map<String, Value>>> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(object)) => Ok(Some(object)),
            Ok(other) => Err(StorageError::Corrupt {
                key: key.to_string(),
                reason: format!("expected a JSON object, found {other}"),
            }),
            Err(e) => Err(StorageError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn read_object_or_reset(&self, key: &str) -> StorageResult<Map<String, Value>> {
        match self.read_object(key) {
            Ok(object) => Ok(object.unwrap_or_default()),
            Err(StorageError::Corrupt { key, reason }) => {
                warn!(key = %key, reason = %reason, "Discarding unreadable stored accounts");
                Ok(Map::new())
            }
            Err(e) => Err(e),
        }
    }
}
