//! Shared relay state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into the websocket route via the `State` extractor.
//! It holds the router and the live consumer set. Every accepted connection
//! is a consumer: it gets an outbound queue drained by its own read loop, and
//! broadcast only ever pushes into those queues.
//!
//! The consumer set is the only shared mutable resource. Adds, removals and
//! broadcast iteration all go through its lock. Broadcast iterates under the
//! read lock with non-blocking pushes, then retakes the write lock briefly to
//! prune consumers whose queue has closed.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::Utf8Bytes;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{RwLock, mpsc, watch};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::router::GestureRouter;

/// Encoded frame queued for one consumer. Cheap to clone across consumers.
pub type Outbound = Utf8Bytes;

// =============================================================================
// CONSUMERS
// =============================================================================

/// Live consumers: `client_id` -> sender for outgoing frames.
#[derive(Clone, Default)]
pub struct Consumers {
    inner: Arc<RwLock<HashMap<Uuid, mpsc::Sender<Outbound>>>>,
}

impl Consumers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a consumer. Returns the live count afterwards.
    pub async fn add(&self, client_id: Uuid, tx: mpsc::Sender<Outbound>) -> usize {
        let mut consumers = self.inner.write().await;
        consumers.insert(client_id, tx);
        consumers.len()
    }

    /// Stop tracking a consumer. Returns whether it was present.
    pub async fn remove(&self, client_id: Uuid) -> bool {
        self.inner.write().await.remove(&client_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Drop every consumer sender. Their read loops see the queue close.
    pub async fn clear(&self) -> usize {
        let mut consumers = self.inner.write().await;
        let count = consumers.len();
        consumers.clear();
        count
    }

    /// Queue `frame` for every consumer connected right now and return how
    /// many accepted it.
    ///
    /// A closed queue means the consumer is gone: it is pruned. A full queue
    /// drops this frame for that consumer only. Neither affects the others or
    /// the caller.
    pub async fn broadcast(&self, frame: &str) -> usize {
        let frame = Outbound::from(frame);
        let mut delivered = 0;
        let mut closed = Vec::new();

        {
            let consumers = self.inner.read().await;
            for (client_id, tx) in consumers.iter() {
                match tx.try_send(frame.clone()) {
                    Ok(()) => delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        warn!(%client_id, "broadcast: consumer queue full, frame dropped");
                    }
                    Err(TrySendError::Closed(_)) => closed.push(*client_id),
                }
            }
        }

        if !closed.is_empty() {
            let mut consumers = self.inner.write().await;
            for client_id in &closed {
                if consumers.remove(client_id).is_some() {
                    debug!(%client_id, "broadcast: pruned closed consumer");
                }
            }
        }

        delivered
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared state for the websocket route. Clone is required by Axum; all inner
/// fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<GestureRouter>,
    pub consumers: Consumers,
    /// Flips to `true` once when the hub stops.
    pub shutdown: watch::Receiver<bool>,
    /// Outbound queue depth per consumer.
    pub buffer: usize,
}

/// Resolve once `shutdown` reads `true` (or its sender is gone).
pub async fn wait_for_stop(mut shutdown: watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
