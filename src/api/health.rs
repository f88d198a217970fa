// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::CallbackState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Whether the listener is still waiting for the OAuth redirect.
    pub waiting_for_callback: bool,
}

/// Liveness check for the callback listener.
pub async fn health(State(state): State<CallbackState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        waiting_for_callback: state.is_waiting().await,
    })
}
