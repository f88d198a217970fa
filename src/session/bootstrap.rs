// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Bootstrap Controller
//!
//! Drives one session bootstrap: `Pending -> Checking -> Ready(shell)`.
//!
//! The phase is published on a [`watch`] channel so a front end can show a
//! loading state until `Ready`. The shell is decided once, from the store
//! state left by the reconciler, and is not re-evaluated until a new
//! controller runs.

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, warn, Instrument};
use url::Url;
use uuid::Uuid;

use super::reconciler::{override_candidate, ReconcileOutcome, SessionReconciler};
use super::url::{extract, purge_params, UrlCredentialBatch, LANG_PARAM};
use crate::models::{AccountCredential, CurrencySelector};
use crate::storage::{
    CookieJar, CredentialSnapshot, CredentialStore, LoggedState, StorageError, StorageResult,
};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Bootstrap already ran for this controller")]
    AlreadyStarted,

    #[error("Bootstrap cancelled")]
    Cancelled,

    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Which application shell to show once bootstrap is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shell {
    Authenticated { login_id: String },
    Login,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapPhase {
    Pending,
    Checking,
    Ready(Shell),
}

impl BootstrapPhase {
    pub fn is_ready(&self) -> bool {
        matches!(self, BootstrapPhase::Ready(_))
    }
}

/// What a bootstrap run did, safe to print.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub run_id: String,
    pub outcome: ReconcileOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switched_to: Option<String>,
    pub used_dev_credential: bool,
    pub shell: Shell,
    pub cleaned_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<CredentialSnapshot>,
}

pub struct BootstrapController {
    store: CredentialStore,
    cookies: CookieJar,
    reconciler: SessionReconciler,
    dev_fallback: Option<AccountCredential>,
    cancel: CancellationToken,
    phase: watch::Sender<BootstrapPhase>,
    started: bool,
}

impl BootstrapController {
    pub fn new(store: CredentialStore, cookies: CookieJar, reconciler: SessionReconciler) -> Self {
        let (phase, _) = watch::channel(BootstrapPhase::Pending);
        Self {
            store,
            cookies,
            reconciler,
            dev_fallback: None,
            cancel: CancellationToken::new(),
            phase,
            started: false,
        }
    }

    /// Credential used when the URL carries none (development only).
    pub fn with_dev_fallback(mut self, credential: Option<AccountCredential>) -> Self {
        self.dev_fallback = credential;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that tears the run down; any in-flight result is discarded.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BootstrapPhase> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> BootstrapPhase {
        self.phase.borrow().clone()
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Run the bootstrap for `location`. Allowed once per controller.
    pub async fn run(&mut self, location: &Url) -> Result<BootstrapReport, BootstrapError> {
        if self.started {
            return Err(BootstrapError::AlreadyStarted);
        }
        self.started = true;

        let run_id = Uuid::new_v4();
        let span = info_span!("bootstrap", %run_id);
        self.run_inner(run_id, location).instrument(span).await
    }

    async fn run_inner(
        &mut self,
        run_id: Uuid,
        location: &Url,
    ) -> Result<BootstrapReport, BootstrapError> {
        self.phase.send_replace(BootstrapPhase::Checking);

        let mut batch = extract(location);
        let used_dev_credential = self.apply_dev_fallback(&mut batch);

        let logged_state = self.cookies.logged_state().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read logged_state cookie");
            LoggedState::Unknown
        });

        let reconciled = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            result = self.reconciler.reconcile(&mut self.store, logged_state, &batch) => Some(result),
        };

        let Some(reconciled) = reconciled else {
            info!("Bootstrap cancelled, discarding authorizer result");
            return Err(BootstrapError::Cancelled);
        };

        let result = match reconciled {
            Ok(outcome) => self
                .switch_account(&outcome, batch.selector.as_ref())
                .map(|switched_to| (outcome, switched_to)),
            Err(e) => Err(e),
        };

        let mut purge = batch.params_to_delete.clone();
        purge.push(LANG_PARAM.to_string());
        let cleaned_url = purge_params(location, &purge);

        let shell = self.decide_shell();
        self.phase.send_replace(BootstrapPhase::Ready(shell.clone()));

        let (outcome, switched_to) = match result {
            Ok(parts) => parts,
            Err(e) => {
                error!(error = %e, shell = ?shell, "Bootstrap finished with a storage error");
                return Err(e.into());
            }
        };

        info!(outcome = ?outcome, shell = ?shell, "Bootstrap ready");

        Ok(BootstrapReport {
            run_id: run_id.to_string(),
            outcome,
            switched_to,
            used_dev_credential,
            shell,
            cleaned_url: cleaned_url.to_string(),
            session: self.store.snapshot().ok(),
        })
    }

    fn apply_dev_fallback(&self, batch: &mut UrlCredentialBatch) -> bool {
        if !batch.is_empty() {
            return false;
        }
        match &self.dev_fallback {
            Some(credential) => {
                info!(login_id = %credential.login_id, "Using development credential");
                batch.credentials.push(credential.clone());
                true
            }
            None => false,
        }
    }

    /// Returning user with `?account=`: switch among stored accounts
    /// without a remote call.
    ///
    /// Only applies when nothing was reconciled and a session is already
    /// active, so a deactivated session is never revived.
    fn switch_account(
        &mut self,
        outcome: &ReconcileOutcome,
        selector: Option<&CurrencySelector>,
    ) -> StorageResult<Option<String>> {
        let (ReconcileOutcome::Skipped, Some(selector)) = (outcome, selector) else {
            return Ok(None);
        };
        let Some(current) = self.store.active_session()? else {
            return Ok(None);
        };
        let Some(target) = override_candidate(&self.store, selector)? else {
            info!(selector = ?selector, "No stored account matches selector");
            return Ok(None);
        };
        if target.login_id == current.login_id {
            return Ok(None);
        }

        self.store.select_active(&target.login_id, &target.token)?;
        info!(from = %current.login_id, to = %target.login_id, "Switched active account");
        Ok(Some(target.login_id))
    }

    fn decide_shell(&self) -> Shell {
        match self.store.active_session() {
            Ok(Some(session)) => Shell::Authenticated {
                login_id: session.login_id,
            },
            Ok(None) => Shell::Login,
            Err(e) => {
                warn!(error = %e, "Stored session unreadable, showing login");
                Shell::Login
            }
        }
    }
}
