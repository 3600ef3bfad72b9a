//! Gesture router — decode, dispatch by type, broadcast.
//!
//! DESIGN
//! ======
//! The router owns the handler registry and a handle on the live consumer
//! set. Handlers return display updates; the router encodes and broadcasts
//! them itself, so handlers never reference the transport.
//!
//! Nothing that happens here is fatal. Malformed frames and unknown types
//! are logged and dropped, and the originating connection stays open.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::frame::{self, DecodeError};
use crate::registry::HandlerRegistry;
use crate::state::Consumers;

/// What happened to one inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Frame could not be decoded.
    Malformed,
    /// No handler is registered for the decoded type.
    Unrouted,
    /// Handler ran; `updates` frames went out to `recipients` total queues.
    Delivered { updates: usize, recipients: usize },
}

pub struct GestureRouter {
    registry: HandlerRegistry,
    consumers: Consumers,
}

impl GestureRouter {
    #[must_use]
    pub fn new(registry: HandlerRegistry, consumers: Consumers) -> Self {
        Self { registry, consumers }
    }

    /// Route one raw frame received from `client_id`.
    ///
    /// Updates are broadcast in the order the handler returned them. No
    /// ordering is promised across connections or gesture types.
    pub async fn on_message(&self, raw: &str, client_id: Uuid) -> Dispatch {
        let msg = match frame::decode(raw) {
            Ok(msg) => msg,
            Err(DecodeError::MissingType) => {
                warn!(%client_id, "router: frame without gesture type dropped");
                return Dispatch::Malformed;
            }
            Err(e) => {
                warn!(%client_id, error = %e, "router: invalid inbound frame");
                return Dispatch::Malformed;
            }
        };

        let Some(handler) = self.registry.lookup(&msg.kind) else {
            debug!(%client_id, kind = %msg.kind, "router: no handler registered");
            return Dispatch::Unrouted;
        };

        let updates = handler.handle(&msg.payload);
        let mut recipients = 0;
        for update in &updates {
            recipients += self.consumers.broadcast(&frame::encode(update)).await;
        }

        debug!(%client_id, kind = %msg.kind, updates = updates.len(), recipients, "router: frame dispatched");
        Dispatch::Delivered { updates: updates.len(), recipients }
    }
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
