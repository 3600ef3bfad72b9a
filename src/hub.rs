//! Connection hub — listener lifecycle and broadcast.
//!
//! DESIGN
//! ======
//! The hub owns the router (and through it the registry) plus the stop
//! signal. `start` binds the gesture port and runs the accept loop on a
//! spawned task; each accepted websocket gets its own read loop (see
//! `routes::ws`). `stop` flips the shutdown watch, which ends the accept
//! loop and every read loop, and drops every consumer queue.
//!
//! ERROR HANDLING
//! ==============
//! Only binding can fail from the caller's point of view. Everything that
//! goes wrong on a connection stays on that connection.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::registry::HandlerRegistry;
use crate::router::GestureRouter;
use crate::routes;
use crate::state::{AppState, Consumers, wait_for_stop};

/// How long `stop` waits for the accept loop to drain before aborting it.
const STOP_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("hub already started")]
    AlreadyStarted,
    #[error("hub has been stopped")]
    Stopped,
}

pub struct Hub {
    addr: String,
    state: AppState,
    shutdown: watch::Sender<bool>,
    started: AtomicBool,
    stopped: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Hub {
    /// Build a hub that will listen on `addr` (`host:port`).
    pub fn new(addr: impl Into<String>, registry: HandlerRegistry, buffer: usize) -> Self {
        let consumers = Consumers::new();
        let router = GestureRouter::new(registry, consumers.clone());
        let (shutdown, shutdown_rx) = watch::channel(false);
        let state = AppState { router: Arc::new(router), consumers, shutdown: shutdown_rx, buffer: buffer.max(1) };

        Self {
            addr: addr.into(),
            state,
            shutdown,
            started: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            task: Mutex::new(None),
        }
    }

    /// Bind the listener and start accepting connections in the background.
    /// Returns the bound address (useful with port 0).
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Bind`] if the port cannot be bound,
    /// [`HubError::AlreadyStarted`] on a second call, and
    /// [`HubError::Stopped`] after `stop`.
    pub async fn start(&self) -> Result<SocketAddr, HubError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(HubError::Stopped);
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(HubError::AlreadyStarted);
        }

        let (listener, local) = match bind(&self.addr).await {
            Ok(bound) => bound,
            Err(e) => {
                self.started.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let app = routes::gesture_app(self.state.clone());
        let stop = wait_for_stop(self.shutdown.subscribe());
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(stop).await {
                error!(error = %e, "hub: accept loop failed");
            }
        });
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(task);

        info!(%local, "hub: accepting gesture connections");
        Ok(local)
    }

    /// Stop accepting, close every connection and drop all consumers.
    /// Calling it again is a no-op.
    pub async fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            debug!("hub: already stopped");
            return;
        }

        self.shutdown.send_replace(true);
        let dropped = self.state.consumers.clear().await;

        let task = self.task.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(mut task) = task {
            if tokio::time::timeout(STOP_GRACE, &mut task).await.is_err() {
                warn!("hub: accept loop did not drain in time, aborting");
                task.abort();
            }
        }

        info!(consumers = dropped, "hub: stopped");
    }

    /// Write `frame` to every currently connected consumer. Returns how many
    /// accepted it; failures are isolated per consumer.
    // Entry point for in-process producers; the binary itself only relays.
    #[allow(dead_code)]
    pub async fn broadcast(&self, frame: &str) -> usize {
        self.state.consumers.broadcast(frame).await
    }

    pub async fn consumer_count(&self) -> usize {
        self.state.consumers.len().await
    }
}

async fn bind(addr: &str) -> Result<(TcpListener, SocketAddr), HubError> {
    let to_bind_error = |source: std::io::Error| HubError::Bind { addr: addr.to_string(), source };
    let listener = TcpListener::bind(addr).await.map_err(to_bind_error)?;
    let local = listener.local_addr().map_err(to_bind_error)?;
    Ok((listener, local))
}

#[cfg(test)]
#[path = "hub_test.rs"]
mod tests;
