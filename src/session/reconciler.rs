// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Reconciler
//!
//! Merges a URL credential batch into the store, picks one candidate,
//! confirms it with the remote authorizer and commits exactly one active
//! session.
//!
//! ## Algorithm
//!
//! 1. Empty batch: nothing to do.
//! 2. Merge the batch into the credential store.
//! 3. Candidate defaults to the first credential of the batch.
//! 4. The `account` selector may override it:
//!    - `DEMO`: first known demo account (whole store, insertion order)
//!    - currency: first known real account holding that currency
//! 5. One authorize round trip with the candidate token, bounded by
//!    `authorize_timeout`:
//!    - authorized: the server's primary account is committed if the batch
//!      holds a credential for it, otherwise step 6
//!    - `InvalidToken`: no active session; notify or clear depending on
//!      the prior `logged_state`
//!    - any other error: step 6
//! 6. Fallback: commit the candidate as-is.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, info, warn};

use super::observer::{SessionEvent, SessionObserver};
use super::url::UrlCredentialBatch;
use crate::auth::{
    ApiErrorDetail, AuthorizeResponse, AuthorizerConnection, AuthorizerConnector, AuthorizerError,
};
use crate::models::{is_demo_login_id, AccountCredential, CurrencySelector};
use crate::storage::{CredentialStore, LoggedState, StorageResult};

/// Upper bound on closing a connection after use.
const DISCONNECT_GRACE: Duration = Duration::from_secs(2);

/// Why the candidate was committed without server confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    /// Authorized, but the primary account is not in the batch.
    UnknownAccount { primary: Option<String> },
    /// The server answered with an error other than `InvalidToken`.
    ApiError { code: String },
    /// Connect or authorize failed, or the deadline elapsed.
    Transport { error: &'static str },
}

/// Result of one reconcile pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// Empty batch; the store was not touched.
    Skipped,
    /// The server confirmed the account that is now active.
    Confirmed { login_id: String },
    /// The candidate was committed without confirmation.
    Fallback {
        login_id: String,
        reason: FallbackReason,
    },
    /// The token was rejected; no session is active.
    InvalidToken { cleared: bool, notified: bool },
}

/// Candidate chosen by the `account` selector among stored accounts.
///
/// Returns `None` when no selector applies or nothing matches, in which
/// case the caller keeps its default.
pub fn override_candidate(
    store: &CredentialStore,
    selector: &CurrencySelector,
) -> StorageResult<Option<AccountCredential>> {
    match selector {
        CurrencySelector::Demo => {
            let Some((login_id, token)) = store
                .accounts_index()?
                .into_iter()
                .find(|(login_id, token)| {
                    is_demo_login_id(login_id) && !token.is_empty()
                })
            else {
                return Ok(None);
            };
            let currency = store
                .accounts_detail()?
                .into_iter()
                .find(|detail| detail.login_id == login_id)
                .map(|detail| detail.currency)
                .unwrap_or_default();
            Ok(Some(AccountCredential {
                login_id,
                token,
                currency,
            }))
        }
        CurrencySelector::Currency(code) => Ok(store
            .accounts_detail()?
            .into_iter()
            .find(|account| {
                !account.is_demo() && account.has_currency(code) && !account.token.is_empty()
            })),
    }
}

/// Owns an open connection and makes sure it is disconnected.
///
/// [`close`](Self::close) disconnects in place. If the owner is dropped
/// first (a cancelled bootstrap), the disconnect is spawned on the runtime.
struct ConnectionGuard {
    connection: Option<Box<dyn AuthorizerConnection>>,
}

impl ConnectionGuard {
    async fn close(mut self) {
        if let Some(mut connection) = self.connection.take() {
            disconnect(connection.as_mut()).await;
        }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let Some(mut connection) = self.connection.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!("Authorize abandoned, disconnecting in background");
                handle.spawn(async move { disconnect(connection.as_mut()).await });
            }
            Err(_) => debug!("No runtime left to disconnect the authorizer"),
        }
    }
}

async fn disconnect(connection: &mut dyn AuthorizerConnection) {
    if timeout(DISCONNECT_GRACE, connection.disconnect())
        .await
        .is_err()
    {
        debug!("Authorizer disconnect timed out");
    }
}

pub struct SessionReconciler {
    connector: Arc<dyn AuthorizerConnector>,
    observer: SessionObserver,
    authorize_timeout: Duration,
}

impl SessionReconciler {
    pub fn new(
        connector: Arc<dyn AuthorizerConnector>,
        observer: SessionObserver,
        authorize_timeout: Duration,
    ) -> Self {
        Self {
            connector,
            observer,
            authorize_timeout,
        }
    }

    pub fn observer(&self) -> &SessionObserver {
        &self.observer
    }

    /// Run one reconcile pass against `store`.
    ///
    /// Only storage failures are returned as errors; every authorizer
    /// outcome resolves to a [`ReconcileOutcome`].
    pub async fn reconcile(
        &self,
        store: &mut CredentialStore,
        logged_state: LoggedState,
        batch: &UrlCredentialBatch,
    ) -> StorageResult<ReconcileOutcome> {
        let Some(first) = batch.first() else {
            debug!("No credentials in URL, keeping stored session");
            return Ok(ReconcileOutcome::Skipped);
        };

        store.merge_batch(&batch.credentials)?;

        let overridden = match &batch.selector {
            Some(selector) => override_candidate(store, selector)?,
            None => None,
        };
        let candidate = overridden.unwrap_or_else(|| first.clone());

        info!(
            login_id = %candidate.login_id,
            batch_size = batch.credentials.len(),
            selector = ?batch.selector,
            "Selected session candidate"
        );

        match self.authorize(&candidate.token).await {
            Ok(AuthorizeResponse::Authorized(authorization)) => {
                let primary = authorization.primary_login_id();
                if let Some(confirmed) = primary.and_then(|id| batch.find(id)) {
                    store.select_active(&confirmed.login_id, &confirmed.token)?;
                    info!(login_id = %confirmed.login_id, "Session confirmed by authorizer");
                    return Ok(ReconcileOutcome::Confirmed {
                        login_id: confirmed.login_id.clone(),
                    });
                }

                warn!(
                    primary = ?primary,
                    candidate = %candidate.login_id,
                    "Authorized account not in URL batch"
                );
                let reason = FallbackReason::UnknownAccount {
                    primary: primary.map(str::to_string),
                };
                self.fallback(store, &candidate, reason)
            }
            Ok(AuthorizeResponse::Rejected(error)) if error.is_invalid_token() => {
                self.invalid_token(store, logged_state, error)
            }
            Ok(AuthorizeResponse::Rejected(error)) => {
                warn!(code = %error.code, message = %error.message, "Authorize rejected");
                let reason = FallbackReason::ApiError { code: error.code };
                self.fallback(store, &candidate, reason)
            }
            Err(e) => {
                warn!(error = %e, "Authorize call failed");
                let reason = FallbackReason::Transport {
                    error: e.error_code(),
                };
                self.fallback(store, &candidate, reason)
            }
        }
    }

    /// Connect, authorize and disconnect within one deadline.
    ///
    /// Disconnect runs whenever a connection was opened, whatever happened
    /// afterwards, including when this future is dropped mid-call.
    async fn authorize(&self, token: &str) -> Result<AuthorizeResponse, AuthorizerError> {
        let deadline = Instant::now() + self.authorize_timeout;

        let connection = timeout_at(deadline, self.connector.connect())
            .await
            .map_err(|_| AuthorizerError::Timeout)??;
        let mut guard = ConnectionGuard {
            connection: Some(connection),
        };

        let result = match guard.connection.as_mut() {
            Some(connection) => timeout_at(deadline, connection.authorize(token))
                .await
                .unwrap_or(Err(AuthorizerError::Timeout)),
            None => Err(AuthorizerError::StreamEnded),
        };

        guard.close().await;
        result
    }

    fn fallback(
        &self,
        store: &mut CredentialStore,
        candidate: &AccountCredential,
        reason: FallbackReason,
    ) -> StorageResult<ReconcileOutcome> {
        store.select_active(&candidate.login_id, &candidate.token)?;
        info!(login_id = %candidate.login_id, reason = ?reason, "Committed unconfirmed session");
        Ok(ReconcileOutcome::Fallback {
            login_id: candidate.login_id.clone(),
            reason,
        })
    }

    fn invalid_token(
        &self,
        store: &mut CredentialStore,
        logged_state: LoggedState,
        error: ApiErrorDetail,
    ) -> StorageResult<ReconcileOutcome> {
        match logged_state {
            LoggedState::LoggedIn => {
                store.deactivate()?;
                let delivered = self.observer.emit(SessionEvent::InvalidToken { error });
                warn!(subscribers = delivered, "Token rejected for a logged-in user");
                Ok(ReconcileOutcome::InvalidToken {
                    cleared: false,
                    notified: true,
                })
            }
            LoggedState::LoggedOut => {
                store.clear()?;
                warn!("Token rejected, cleared stored accounts");
                Ok(ReconcileOutcome::InvalidToken {
                    cleared: true,
                    notified: false,
                })
            }
            LoggedState::Unknown => {
                store.deactivate()?;
                warn!("Token rejected");
                Ok(ReconcileOutcome::InvalidToken {
                    cleared: false,
                    notified: false,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::observer::EventKind;
    use crate::session::test_support::{FakeConnector, Script};
    use crate::session::url::extract;
    use std::sync::Mutex;
    use url::Url;

    fn reconciler(fake: &FakeConnector) -> SessionReconciler {
        SessionReconciler::new(
            Arc::new(fake.clone()),
            SessionObserver::new(),
            Duration::from_millis(200),
        )
    }

    fn batch(query: &str) -> UrlCredentialBatch {
        extract(&Url::parse(&format!("https://bot.example/?{query}")).unwrap())
    }

    fn active(store: &CredentialStore) -> (Option<String>, Option<String>) {
        (
            store.active_login_id().unwrap(),
            store.active_token().unwrap(),
        )
    }

    #[tokio::test]
    async fn empty_batch_is_skipped() {
        let fake = FakeConnector::new(Script::Authorize(vec!["CR1"]));
        let mut store = CredentialStore::in_memory();
        store.select_active("CR9", "tokC").unwrap();

        let outcome = reconciler(&fake)
            .reconcile(&mut store, LoggedState::Unknown, &batch("lang=en"))
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::Skipped);
        assert_eq!(fake.calls().connects, 0);
        assert_eq!(active(&store), (Some("CR9".into()), Some("tokC".into())));
    }

    #[tokio::test]
    async fn confirmed_single_account() {
        let fake = FakeConnector::new(Script::Authorize(vec!["CR1"]));
        let mut store = CredentialStore::in_memory();

        let outcome = reconciler(&fake)
            .reconcile(
                &mut store,
                LoggedState::Unknown,
                &batch("acct1=CR1&token1=tokA&cur1=USD"),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::Confirmed {
                login_id: "CR1".into()
            }
        );
        assert_eq!(active(&store), (Some("CR1".into()), Some("tokA".into())));
        let calls = fake.calls();
        assert_eq!(calls.tokens, vec!["tokA"]);
        assert_eq!(calls.disconnects, 1);
    }

    #[tokio::test]
    async fn demo_selector_picks_demo_account_regardless_of_order() {
        let fake = FakeConnector::new(Script::Authorize(vec!["VR1", "CR1"]));
        let mut store = CredentialStore::in_memory();

        let outcome = reconciler(&fake)
            .reconcile(
                &mut store,
                LoggedState::Unknown,
                &batch("acct1=CR1&token1=tokA&cur1=USD&acct2=VR1&token2=tokB&cur2=USD&account=demo"),
            )
            .await
            .unwrap();

        assert_eq!(fake.calls().tokens, vec!["tokB"]);
        assert_eq!(
            outcome,
            ReconcileOutcome::Confirmed {
                login_id: "VR1".into()
            }
        );
        assert_eq!(active(&store), (Some("VR1".into()), Some("tokB".into())));
    }

    #[tokio::test]
    async fn demo_selector_scans_previously_known_accounts() {
        let fake = FakeConnector::new(Script::Fail);
        let mut store = CredentialStore::in_memory();
        store
            .merge_batch(&[AccountCredential::new("VR7", "tokOld", "USD")])
            .unwrap();

        reconciler(&fake)
            .reconcile(
                &mut store,
                LoggedState::Unknown,
                &batch("acct1=CR1&token1=tokA&cur1=USD&account=DEMO"),
            )
            .await
            .unwrap();

        assert_eq!(fake.calls().tokens, vec!["tokOld"]);
        assert_eq!(active(&store).0.as_deref(), Some("VR7"));
    }

    #[tokio::test]
    async fn currency_selector_overrides_arrival_order() {
        let fake = FakeConnector::new(Script::Authorize(vec!["CR2"]));
        let mut store = CredentialStore::in_memory();

        let outcome = reconciler(&fake)
            .reconcile(
                &mut store,
                LoggedState::Unknown,
                &batch(
                    "acct1=CR1&token1=tokA&cur1=USD&acct2=CR2&token2=tokB&cur2=btc&acct3=VR1&token3=tokC&cur3=BTC&account=BTC",
                ),
            )
            .await
            .unwrap();

        assert_eq!(fake.calls().tokens, vec!["tokB"]);
        assert_eq!(
            outcome,
            ReconcileOutcome::Confirmed {
                login_id: "CR2".into()
            }
        );
    }

    #[tokio::test]
    async fn unmatched_selector_keeps_default_candidate() {
        let fake = FakeConnector::new(Script::Fail);
        let mut store = CredentialStore::in_memory();

        reconciler(&fake)
            .reconcile(
                &mut store,
                LoggedState::Unknown,
                &batch("acct1=CR1&token1=tokA&cur1=USD&account=EUR"),
            )
            .await
            .unwrap();

        assert_eq!(fake.calls().tokens, vec!["tokA"]);
    }

    #[tokio::test]
    async fn primary_account_is_committed_from_batch() {
        // Server treats CR2 as primary for the candidate token.
        let fake = FakeConnector::new(Script::Authorize(vec!["CR2", "CR1"]));
        let mut store = CredentialStore::in_memory();

        let outcome = reconciler(&fake)
            .reconcile(
                &mut store,
                LoggedState::Unknown,
                &batch("acct1=CR1&token1=tokA&acct2=CR2&token2=tokB"),
            )
            .await
            .unwrap();

        assert_eq!(fake.calls().tokens, vec!["tokA"]);
        assert_eq!(
            outcome,
            ReconcileOutcome::Confirmed {
                login_id: "CR2".into()
            }
        );
        assert_eq!(active(&store), (Some("CR2".into()), Some("tokB".into())));
    }

    #[tokio::test]
    async fn unknown_primary_account_falls_back_to_candidate() {
        let fake = FakeConnector::new(Script::Authorize(vec!["CR404"]));
        let mut store = CredentialStore::in_memory();

        let outcome = reconciler(&fake)
            .reconcile(
                &mut store,
                LoggedState::Unknown,
                &batch("acct1=CR1&token1=tokA"),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::Fallback {
                login_id: "CR1".into(),
                reason: FallbackReason::UnknownAccount {
                    primary: Some("CR404".into())
                },
            }
        );
        assert_eq!(active(&store), (Some("CR1".into()), Some("tokA".into())));
    }

    #[tokio::test]
    async fn transport_failures_fall_back_to_candidate_token() {
        for script in [Script::Fail, Script::ConnectFail, Script::Hang] {
            let fake = FakeConnector::new(script.clone());
            let mut store = CredentialStore::in_memory();

            let outcome = reconciler(&fake)
                .reconcile(
                    &mut store,
                    LoggedState::LoggedIn,
                    &batch("acct1=CR1&token1=tokA&acct2=CR2&token2=tokB"),
                )
                .await
                .unwrap();

            assert!(
                matches!(outcome, ReconcileOutcome::Fallback { reason: FallbackReason::Transport { .. }, .. }),
                "{script:?} gave {outcome:?}"
            );
            assert_eq!(store.active_token().unwrap().as_deref(), Some("tokA"));

            let calls = fake.calls();
            // A connection that was opened is always closed.
            assert_eq!(calls.disconnects, calls.connects);
        }
    }

    #[tokio::test]
    async fn timeout_is_reported_as_transport_failure() {
        let fake = FakeConnector::new(Script::Hang);
        let mut store = CredentialStore::in_memory();

        let outcome = reconciler(&fake)
            .reconcile(&mut store, LoggedState::Unknown, &batch("acct1=CR1&token1=tokA"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::Fallback {
                login_id: "CR1".into(),
                reason: FallbackReason::Transport { error: "timeout" },
            }
        );
    }

    #[tokio::test]
    async fn other_api_errors_fall_back() {
        let fake = FakeConnector::new(Script::Reject("RateLimit", "Too many requests"));
        let mut store = CredentialStore::in_memory();

        let outcome = reconciler(&fake)
            .reconcile(&mut store, LoggedState::LoggedIn, &batch("acct1=CR1&token1=tokA"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::Fallback {
                login_id: "CR1".into(),
                reason: FallbackReason::ApiError {
                    code: "RateLimit".into()
                },
            }
        );
        assert_eq!(store.active_token().unwrap().as_deref(), Some("tokA"));
    }

    #[tokio::test]
    async fn invalid_token_when_logged_in_notifies_once() {
        let fake = FakeConnector::new(Script::Reject("InvalidToken", "The token is invalid."));
        let mut store = CredentialStore::in_memory();
        store.select_active("CR0", "stale").unwrap();

        let reconciler = reconciler(&fake);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        reconciler
            .observer()
            .subscribe(EventKind::InvalidToken, move |event| {
                sink.lock().unwrap().push(event.clone());
            });

        let outcome = reconciler
            .reconcile(&mut store, LoggedState::LoggedIn, &batch("acct1=CR1&token1=tokA"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::InvalidToken {
                cleared: false,
                notified: true
            }
        );
        assert_eq!(
            *seen.lock().unwrap(),
            vec![SessionEvent::InvalidToken {
                error: ApiErrorDetail::new("InvalidToken", "The token is invalid.")
            }]
        );
        // Unauthenticated, but the known accounts are kept.
        assert_eq!(active(&store), (None, None));
        assert_eq!(store.accounts_index().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_token_when_logged_out_clears_store() {
        let fake = FakeConnector::new(Script::Reject("InvalidToken", "The token is invalid."));
        let mut store = CredentialStore::in_memory();

        let reconciler = reconciler(&fake);
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        reconciler
            .observer()
            .subscribe(EventKind::InvalidToken, move |_| *counter.lock().unwrap() += 1);

        let outcome = reconciler
            .reconcile(&mut store, LoggedState::LoggedOut, &batch("acct1=CR1&token1=tokA"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::InvalidToken {
                cleared: true,
                notified: false
            }
        );
        assert_eq!(*hits.lock().unwrap(), 0);
        assert_eq!(active(&store), (None, None));
        assert!(store.accounts_index().unwrap().is_empty());
        assert!(store.accounts_detail().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_token_without_flag_only_deactivates() {
        let fake = FakeConnector::new(Script::Reject("InvalidToken", "The token is invalid."));
        let mut store = CredentialStore::in_memory();

        let outcome = reconciler(&fake)
            .reconcile(&mut store, LoggedState::Unknown, &batch("acct1=CR1&token1=tokA"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::InvalidToken {
                cleared: false,
                notified: false
            }
        );
        assert_eq!(active(&store), (None, None));
        assert_eq!(store.accounts_index().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reconcile_is_idempotent() {
        let fake = FakeConnector::new(Script::Authorize(vec!["CR1"]));
        let reconciler = reconciler(&fake);
        let mut store = CredentialStore::in_memory();
        let batch = batch("acct1=CR1&token1=tokA&acct2=VR1&token2=tokB");

        let first = reconciler
            .reconcile(&mut store, LoggedState::Unknown, &batch)
            .await
            .unwrap();
        let after_first = active(&store);
        let second = reconciler
            .reconcile(&mut store, LoggedState::Unknown, &batch)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(active(&store), after_first);
        assert_eq!(store.accounts_index().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn repeated_login_id_confirms_with_latest_token() {
        let fake = FakeConnector::new(Script::Authorize(vec!["CR1"]));
        let mut store = CredentialStore::in_memory();

        let outcome = reconciler(&fake)
            .reconcile(
                &mut store,
                LoggedState::Unknown,
                &batch("acct1=CR1&token1=old&acct2=CR1&token2=new"),
            )
            .await
            .unwrap();

        assert_eq!(fake.calls().tokens, vec!["new"]);
        assert_eq!(
            outcome,
            ReconcileOutcome::Confirmed {
                login_id: "CR1".into()
            }
        );
        assert_eq!(active(&store), (Some("CR1".into()), Some("new".into())));
        assert_eq!(
            store.accounts_index().unwrap(),
            vec![("CR1".to_string(), "new".to_string())]
        );
    }

    #[tokio::test]
    async fn repeated_login_id_falls_back_with_latest_token() {
        let fake = FakeConnector::new(Script::Fail);
        let mut store = CredentialStore::in_memory();

        let outcome = reconciler(&fake)
            .reconcile(
                &mut store,
                LoggedState::Unknown,
                &batch("acct1=CR1&token1=old&acct2=CR1&token2=new"),
            )
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            ReconcileOutcome::Fallback { ref login_id, .. } if login_id == "CR1"
        ));
        assert_eq!(active(&store), (Some("CR1".into()), Some("new".into())));
        assert_eq!(
            store.accounts_index().unwrap(),
            vec![("CR1".to_string(), "new".to_string())]
        );
    }

    #[tokio::test]
    async fn dropped_reconcile_still_disconnects() {
        let fake = FakeConnector::new(Script::Hang);
        let reconciler = SessionReconciler::new(
            Arc::new(fake.clone()),
            SessionObserver::new(),
            Duration::from_secs(30),
        );
        let mut store = CredentialStore::in_memory();
        let batch = batch("acct1=CR1&token1=tokA");

        let pending = reconciler.reconcile(&mut store, LoggedState::Unknown, &batch);
        let abandoned = tokio::time::timeout(Duration::from_millis(20), pending).await;
        assert!(abandoned.is_err());

        // The disconnect is spawned when the future is dropped.
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        let calls = fake.calls();
        assert_eq!(calls.connects, 1);
        assert_eq!(calls.disconnects, 1);
    }

    #[test]
    fn override_candidate_skips_accounts_without_token() {
        let mut store = CredentialStore::in_memory();
        store
            .merge_batch(&[
                AccountCredential::new("VR1", "", "USD"),
                AccountCredential::new("CR1", "", "EUR"),
                AccountCredential::new("VR2", "tokD", "USD"),
                AccountCredential::new("CR2", "tokE", "eur"),
            ])
            .unwrap();

        let demo = override_candidate(&store, &CurrencySelector::Demo)
            .unwrap()
            .unwrap();
        assert_eq!(demo, AccountCredential::new("VR2", "tokD", "USD"));

        let eur = override_candidate(&store, &CurrencySelector::Currency("EUR".into()))
            .unwrap()
            .unwrap();
        assert_eq!(eur.login_id, "CR2");

        assert!(
            override_candidate(&store, &CurrencySelector::Currency("GBP".into()))
                .unwrap()
                .is_none()
        );
    }
}
