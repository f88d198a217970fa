// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Module
//!
//! Turns a navigation URL plus cached device state into one active
//! session.
//!
//! ## Flow
//!
//! ```text
//! BootstrapController::run(url)
//!   -> url::extract            acctN / tokenN / curN, account selector
//!   -> SessionReconciler       merge, pick candidate, authorize, commit
//!        -> SessionObserver    InvalidToken for logged-in users
//!   -> url::purge_params       strip consumed keys and `lang`
//!   -> Shell                   authenticated or login
//! ```

pub mod bootstrap;
pub mod observer;
pub mod reconciler;
pub mod url;

#[cfg(test)]
pub(crate) mod test_support;

pub use bootstrap::{BootstrapController, BootstrapError, BootstrapPhase, BootstrapReport, Shell};
pub use observer::{EventKind, SessionEvent, SessionObserver, SubscriptionId};
pub use reconciler::{FallbackReason, ReconcileOutcome, SessionReconciler};
pub use self::url::{extract, purge_params, UrlCredentialBatch};
