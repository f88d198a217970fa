// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deriv WebSocket API client for the `authorize` call.
//!
//! Connects to `wss://ws.derivws.com/websockets/v3?app_id=<id>&l=<lang>`,
//! sends `{"authorize": <token>, "req_id": <n>}` and waits for the frame
//! carrying the same `req_id`. Unrelated frames (pings, other replies) are
//! skipped.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};
use tracing::debug;
use url::Url;

use super::authorizer::{
    ApiErrorDetail, AuthorizeResponse, Authorization, AuthorizerConnection, AuthorizerConnector,
};
use super::error::AuthorizerError;
use crate::config::SessionConfig;

/// Default connect timeout for the WebSocket handshake.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens authorize connections against the Deriv WebSocket API.
#[derive(Debug, Clone)]
pub struct DerivConnector {
    endpoint: Url,
    connect_timeout: Duration,
}

impl DerivConnector {
    /// Build the endpoint from the base WebSocket URL, app id and language.
    pub fn new(ws_url: &Url, app_id: &str, language: &str) -> Self {
        let mut endpoint = ws_url.clone();
        endpoint
            .query_pairs_mut()
            .append_pair("app_id", app_id)
            .append_pair("l", &language.to_ascii_uppercase());
        Self {
            endpoint,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(&config.ws_url, &config.app_id, &config.language)
            .with_connect_timeout(config.authorize_timeout)
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AuthorizerConnector for DerivConnector {
    async fn connect(&self) -> Result<Box<dyn AuthorizerConnection>, AuthorizerError> {
        debug!(endpoint = %self.endpoint, "Connecting to authorizer");

        let connect_result =
            tokio::time::timeout(self.connect_timeout, connect_async(self.endpoint.as_str())).await;

        let stream = match connect_result {
            Ok(Ok((stream, _response))) => stream,
            Ok(Err(e)) => return Err(AuthorizerError::Connection(e.to_string())),
            Err(_) => return Err(AuthorizerError::Timeout),
        };

        Ok(Box::new(DerivConnection {
            stream,
            next_req_id: 1,
        }))
    }
}

/// One open WebSocket session.
pub struct DerivConnection {
    stream: WsStream,
    next_req_id: u64,
}

#[async_trait]
impl AuthorizerConnection for DerivConnection {
    async fn authorize(&mut self, token: &str) -> Result<AuthorizeResponse, AuthorizerError> {
        let req_id = self.next_req_id;
        self.next_req_id += 1;

        let request = serde_json::json!({ "authorize": token, "req_id": req_id });
        self.stream
            .send(Message::Text(request.to_string().into()))
            .await
            .map_err(|e| AuthorizerError::WebSocket(e.to_string()))?;

        while let Some(frame) = self.stream.next().await {
            let frame = frame.map_err(|e| AuthorizerError::WebSocket(e.to_string()))?;
            match frame {
                Message::Text(text) => {
                    if let Some(reply) = parse_authorize_reply(text.as_str(), req_id)? {
                        return Ok(reply);
                    }
                }
                Message::Close(_) => return Err(AuthorizerError::StreamEnded),
                _ => {}
            }
        }

        Err(AuthorizerError::StreamEnded)
    }

    async fn disconnect(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!(error = %e, "Authorizer connection did not close cleanly");
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireReply {
    #[serde(default)]
    msg_type: Option<String>,
    #[serde(default)]
    req_id: Option<u64>,
    #[serde(default)]
    authorize: Option<Authorization>,
    #[serde(default)]
    error: Option<ApiErrorDetail>,
}

/// Decode one text frame.
///
/// Returns `Ok(None)` for frames that belong to another request.
fn parse_authorize_reply(
    text: &str,
    req_id: u64,
) -> Result<Option<AuthorizeResponse>, AuthorizerError> {
    let reply: WireReply =
        serde_json::from_str(text).map_err(|e| AuthorizerError::Protocol(e.to_string()))?;

    let ours = match reply.req_id {
        Some(id) => id == req_id,
        None => reply.msg_type.as_deref() == Some("authorize"),
    };
    if !ours {
        return Ok(None);
    }

    if let Some(error) = reply.error {
        return Ok(Some(AuthorizeResponse::Rejected(error)));
    }

    match reply.authorize {
        Some(authorization) => Ok(Some(AuthorizeResponse::Authorized(authorization))),
        None => Err(AuthorizerError::Protocol(
            "authorize reply carries neither payload nor error".to_string(),
        )),
    }
}
