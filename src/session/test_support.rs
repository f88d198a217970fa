// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Scripted authorizer used by the session tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::auth::{
    ApiErrorDetail, AuthorizeResponse, AuthorizedAccount, Authorization, AuthorizerConnection,
    AuthorizerConnector, AuthorizerError,
};

/// What the fake server does for every call.
#[derive(Debug, Clone)]
pub enum Script {
    /// Reply with an account list, first entry primary.
    Authorize(Vec<&'static str>),
    /// Reply with an API error.
    Reject(&'static str, &'static str),
    /// Transport error after connecting.
    Fail,
    /// Never reply.
    Hang,
    /// Refuse the connection.
    ConnectFail,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Calls {
    pub connects: usize,
    pub tokens: Vec<String>,
    pub disconnects: usize,
}

#[derive(Clone)]
pub struct FakeConnector {
    script: Script,
    calls: Arc<Mutex<Calls>>,
}

impl FakeConnector {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthorizerConnector for FakeConnector {
    async fn connect(&self) -> Result<Box<dyn AuthorizerConnection>, AuthorizerError> {
        if matches!(self.script, Script::ConnectFail) {
            return Err(AuthorizerError::Connection("connection refused".into()));
        }
        self.calls.lock().unwrap().connects += 1;
        Ok(Box::new(FakeConnection {
            script: self.script.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }
}

struct FakeConnection {
    script: Script,
    calls: Arc<Mutex<Calls>>,
}

#[async_trait]
impl AuthorizerConnection for FakeConnection {
    async fn authorize(&mut self, token: &str) -> Result<AuthorizeResponse, AuthorizerError> {
        self.calls.lock().unwrap().tokens.push(token.to_string());
        match &self.script {
            Script::Authorize(ids) => Ok(AuthorizeResponse::Authorized(Authorization {
                loginid: ids.first().map(|id| id.to_string()),
                account_list: ids
                    .iter()
                    .map(|id| AuthorizedAccount {
                        loginid: id.to_string(),
                        currency: None,
                    })
                    .collect(),
            })),
            Script::Reject(code, message) => {
                Ok(AuthorizeResponse::Rejected(ApiErrorDetail::new(*code, *message)))
            }
            Script::Fail => Err(AuthorizerError::WebSocket("connection reset".into())),
            Script::Hang | Script::ConnectFail => std::future::pending().await,
        }
    }

    async fn disconnect(&mut self) {
        self.calls.lock().unwrap().disconnects += 1;
    }
}
