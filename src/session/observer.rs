// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session event channel.
//!
//! A small publish/subscribe registry owned by the composition root and
//! cloned into whoever needs to emit. Delivery is synchronous and
//! best-effort: an event emitted with no subscriber is simply dropped.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::debug;

use crate::auth::ApiErrorDetail;

/// Kinds of session events handlers can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    InvalidToken,
}

/// An event and its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The authorizer rejected the active token; the application should run
    /// its re-authentication flow.
    InvalidToken { error: ApiErrorDetail },
}

impl SessionEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SessionEvent::InvalidToken { .. } => EventKind::InvalidToken,
        }
    }
}

/// Handle returned by [`SessionObserver::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(SubscriptionId, EventKind, Handler)>,
}

/// Process-lifetime event channel. Clones share the same registry.
#[derive(Clone, Default)]
pub struct SessionObserver {
    registry: Arc<Mutex<Registry>>,
}

impl SessionObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind`.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        let mut registry = self
            .registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        registry.next_id += 1;
        let id = SubscriptionId(registry.next_id);
        registry.handlers.push((id, kind, Arc::new(handler)));
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self
            .registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = registry.handlers.len();
        registry.handlers.retain(|(sub, _, _)| *sub != id);
        registry.handlers.len() != before
    }

    /// Deliver `event` to every current subscriber of its kind.
    ///
    /// Handlers run on the caller's task, outside the registry lock, so they
    /// may subscribe or unsubscribe themselves. Returns the number of
    /// handlers invoked.
    pub fn emit(&self, event: SessionEvent) -> usize {
        let kind = event.kind();
        let handlers: Vec<Handler> = {
            let registry = self
                .registry
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            registry
                .handlers
                .iter()
                .filter(|(_, k, _)| *k == kind)
                .map(|(_, _, handler)| Arc::clone(handler))
                .collect()
        };

        if handlers.is_empty() {
            debug!(kind = ?kind, "Session event dropped: no subscribers");
        }

        for handler in &handlers {
            handler(&event);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.registry
            .lock()
            .map(|registry| registry.handlers.iter().filter(|(_, k, _)| *k == kind).count())
            .unwrap_or(0)
    }
}
