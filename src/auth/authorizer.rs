// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Remote authorizer contract.
//!
//! The session core only needs two things from the authorization service:
//! validate a token and return the accounts it is entitled to. A connection
//! is opened per use and always disconnected afterwards.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::AuthorizerError;

/// Error code reported when a token is unknown, expired or revoked.
pub const INVALID_TOKEN_CODE: &str = "InvalidToken";

/// One entry of the authoritative account list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorizedAccount {
    pub loginid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Successful `authorize` payload. Unused fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Authorization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loginid: Option<String>,
    #[serde(default)]
    pub account_list: Vec<AuthorizedAccount>,
}

impl Authorization {
    /// The account the server lists first for this token.
    pub fn primary_login_id(&self) -> Option<&str> {
        self.account_list.first().map(|a| a.loginid.as_str())
    }
}

/// API error body (`{"code": ..., "message": ...}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorDetail {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl ApiErrorDetail {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_invalid_token(&self) -> bool {
        self.code == INVALID_TOKEN_CODE
    }
}

/// Either half of the authorize reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizeResponse {
    Authorized(Authorization),
    Rejected(ApiErrorDetail),
}

/// Opens connections to the authorization service.
#[async_trait]
pub trait AuthorizerConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn AuthorizerConnection>, AuthorizerError>;
}

/// A live connection. Callers must call [`disconnect`](Self::disconnect)
/// once they are done, whatever the outcome of `authorize`.
#[async_trait]
pub trait AuthorizerConnection: Send {
    async fn authorize(&mut self, token: &str) -> Result<AuthorizeResponse, AuthorizerError>;

    async fn disconnect(&mut self);
}
