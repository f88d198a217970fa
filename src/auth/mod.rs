// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Client side of the account authorization service.
//!
//! ## Auth Flow
//!
//! 1. Login shell sends the user to the OAuth authorize page
//!    ([`oauth::login_url`])
//! 2. OAuth redirects back with `acctN` / `tokenN` / `curN` parameters
//! 3. The session reconciler picks a candidate token and calls
//!    `authorize` over the WebSocket API ([`DerivConnector`])
//! 4. The reply is either the authoritative account list or an API error
//!    such as `InvalidToken`
//!
//! ## Notes
//!
//! - One connection per authorize call; it is always disconnected afterwards
//! - Tokens are never logged

pub mod authorizer;
pub mod deriv;
pub mod error;
pub mod oauth;

pub use authorizer::{
    ApiErrorDetail, AuthorizeResponse, AuthorizedAccount, Authorization, AuthorizerConnection,
    AuthorizerConnector, INVALID_TOKEN_CODE,
};
pub use deriv::DerivConnector;
pub use error::AuthorizerError;
pub use oauth::login_url;
