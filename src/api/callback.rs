// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{OriginalUri, State},
    response::Html,
};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::session::url::extract;
use crate::state::CallbackState;

const LOGIN_COMPLETE_PAGE: &str = "<!doctype html>\
<html><head><title>Login complete</title></head>\
<body><p>Login complete. You can close this window and return to the terminal.</p></body></html>";

/// OAuth redirect target.
///
/// Accepts `acctN` / `tokenN` / `curN` query parameters and hands the full
/// URL to the waiting login command. Only the first valid callback is
/// accepted.
pub async fn oauth_callback(
    State(state): State<CallbackState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Html<&'static str>, ApiError> {
    let url = state
        .base_url
        .join(&uri.to_string())
        .map_err(|e| ApiError::bad_request(format!("invalid callback URL: {e}")))?;

    let batch = extract(&url);
    if batch.is_empty() {
        warn!("Callback without account credentials");
        return Err(ApiError::bad_request("no account credentials in callback"));
    }

    if !state.deliver(url).await {
        return Err(ApiError::gone("login already completed"));
    }

    info!(accounts = batch.credentials.len(), "OAuth callback received");
    Ok(Html(LOGIN_COMPLETE_PAGE))
}
