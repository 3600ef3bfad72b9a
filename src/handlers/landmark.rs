//! Hand landmark handler — drives pointer position.
//!
//! Emits the raw normalized coordinates unchanged. When a local observer is
//! attached (the overlay), it is told about the move before the update is
//! returned, so the overlay never lags behind remote consumers.

use std::sync::Arc;

use tracing::debug;

use super::{GestureHandler, HandObserver, position};
use crate::frame::{Data, DisplayUpdate};

pub const HAND_LANDMARKS: &str = "HAND_LANDMARKS";

pub struct LandmarkHandler {
    kind: String,
    observer: Option<Arc<dyn HandObserver>>,
}

impl LandmarkHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::tagged(HAND_LANDMARKS)
    }

    pub fn tagged(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), observer: None }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn HandObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

impl Default for LandmarkHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureHandler for LandmarkHandler {
    fn handle(&self, payload: &Data) -> Vec<DisplayUpdate> {
        let Some((x, y)) = position(payload) else {
            debug!(kind = %self.kind, "landmark: missing x/y, nothing emitted");
            return Vec::new();
        };

        if let Some(observer) = &self.observer {
            observer.on_hand_moved(x, y);
        }

        vec![DisplayUpdate::new(&self.kind).with_position(Some((x, y)))]
    }
}

#[cfg(test)]
#[path = "landmark_test.rs"]
mod tests;
