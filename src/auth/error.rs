// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Remote authorizer transport errors.
//!
//! These cover everything that prevents an authorize reply from being read.
//! An API-level rejection (e.g. `InvalidToken`) is not an error here: it is
//! a regular [`AuthorizeResponse::Rejected`](super::AuthorizeResponse).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthorizerError {
    #[error("WebSocket connection failed: {0}")]
    Connection(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Authorizer did not answer in time")]
    Timeout,

    #[error("Stream ended before the authorize reply")]
    StreamEnded,

    #[error("Unexpected authorize reply: {0}")]
    Protocol(String),
}

impl AuthorizerError {
    /// Short machine-readable label, used in logs and reports.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthorizerError::Connection(_) => "connection",
            AuthorizerError::WebSocket(_) => "websocket",
            AuthorizerError::Timeout => "timeout",
            AuthorizerError::StreamEnded => "stream_ended",
            AuthorizerError::Protocol(_) => "protocol",
        }
    }
}
