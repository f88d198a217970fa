// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::{oneshot, Mutex};
use url::Url;

/// Shared state of the OAuth callback listener.
///
/// Holds the one-shot hand-off to the waiting login command. The first
/// accepted callback takes the sender; later callbacks find it gone.
#[derive(Clone)]
pub struct CallbackState {
    /// Base used to rebuild the full callback URL from the request URI.
    pub base_url: Url,
    pending: Arc<Mutex<Option<oneshot::Sender<Url>>>>,
}

impl CallbackState {
    pub fn new(base_url: Url) -> (Self, oneshot::Receiver<Url>) {
        let (sender, receiver) = oneshot::channel();
        let state = Self {
            base_url,
            pending: Arc::new(Mutex::new(Some(sender))),
        };
        (state, receiver)
    }

    /// Hand `url` to the waiting receiver. Returns false if a callback was
    /// already delivered or nobody is waiting any more.
    pub async fn deliver(&self, url: Url) -> bool {
        match self.pending.lock().await.take() {
            Some(sender) => sender.send(url).is_ok(),
            None => false,
        }
    }

    pub async fn is_waiting(&self) -> bool {
        self.pending
            .lock()
            .await
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }
}
