// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tradebot Session - multi-account session bootstrap for the trading bot
//!
//! Merges account credentials delivered in the navigation URL with the
//! credentials cached on the device, confirms the chosen one against the
//! Deriv `authorize` call and settles on exactly one active account.
//!
//! ## Modules
//!
//! - `api` - Local OAuth callback listener (Axum)
//! - `auth` - Remote authorizer contract, Deriv WebSocket client, OAuth URL
//! - `session` - URL extraction, reconciler, observer, bootstrap controller
//! - `storage` - Persisted credential store and cookie jar

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod state;
pub mod storage;
pub mod telemetry;
