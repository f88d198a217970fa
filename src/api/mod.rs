// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local HTTP listener for the OAuth login redirect.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /callback` | OAuth redirect target, carries the account credentials |
//! | `GET /health` | Liveness, reports whether a callback is still awaited |

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use url::Url;

use crate::error::CallbackError;
use crate::state::CallbackState;

pub mod callback;
pub mod health;

pub fn router(state: CallbackState) -> Router {
    Router::new()
        .route("/callback", get(callback::oauth_callback))
        .route("/health", get(health::health))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Bind the callback listener.
pub async fn bind(addr: &str) -> Result<TcpListener, CallbackError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| CallbackError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Serve the callback routes until the first valid OAuth redirect arrives,
/// then shut down gracefully and return the full redirect URL.
pub async fn serve_until_callback(
    listener: TcpListener,
    base_url: Url,
    cancel: CancellationToken,
) -> Result<Url, CallbackError> {
    let (state, receiver) = CallbackState::new(base_url);
    let app = router(state);

    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Waiting for OAuth callback");
    }

    let stop = CancellationToken::new();
    let stop_signal = stop.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { stop_signal.cancelled().await })
            .await
    });

    let received = tokio::select! {
        received = receiver => received.map_err(|_| CallbackError::Cancelled),
        _ = cancel.cancelled() => Err(CallbackError::Cancelled),
        finished = &mut server => {
            return Err(match finished {
                Ok(Ok(())) => CallbackError::Cancelled,
                Ok(Err(e)) => CallbackError::Serve(e),
                Err(join) => CallbackError::Serve(std::io::Error::other(join)),
            });
        }
    };

    stop.cancel();
    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Callback server stopped with an error"),
        Err(e) => warn!(error = %e, "Callback server task failed"),
    }

    received
}
