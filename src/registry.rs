//! Handler registry — gesture type tag to handler.
//!
//! Built once at startup and handed to the router. Registering the same tag
//! twice replaces the earlier handler (last registration wins), which lets a
//! handler be swapped before traffic starts.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::handlers::{DragHandler, GestureHandler, HandObserver, LandmarkHandler, PinchHandler, ZoomHandler};
use crate::handlers::{drag::DRAG, landmark::HAND_LANDMARKS, pinch::PINCH, zoom::PINCH_ZOOM};

/// Pointer frames from the camera client (index fingertip).
pub const POINTER: &str = "pointer";

/// Pinch performed with the left hand.
pub const LEFT_PINCH: &str = "left_pinch";

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn GestureHandler>>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in gesture. The observer, when given, is
    /// attached to the `HAND_LANDMARKS` handler only.
    #[must_use]
    pub fn with_defaults(observer: Option<Arc<dyn HandObserver>>) -> Self {
        let mut landmarks = LandmarkHandler::new();
        if let Some(observer) = observer {
            landmarks = landmarks.with_observer(observer);
        }

        let mut registry = Self::new();
        registry.register(HAND_LANDMARKS, Arc::new(landmarks));
        registry.register(POINTER, Arc::new(LandmarkHandler::tagged(POINTER)));
        registry.register(PINCH, Arc::new(PinchHandler::new()));
        registry.register(LEFT_PINCH, Arc::new(PinchHandler::tagged(LEFT_PINCH)));
        registry.register(PINCH_ZOOM, Arc::new(ZoomHandler::new()));
        registry.register(DRAG, Arc::new(DragHandler::new()));
        registry
    }

    /// Register `handler` for `kind`, returning the handler it replaced.
    pub fn register(&mut self, kind: impl Into<String>, handler: Arc<dyn GestureHandler>) -> Option<Arc<dyn GestureHandler>> {
        let kind = kind.into();
        let previous = self.handlers.insert(kind.clone(), handler);
        if previous.is_some() {
            info!(%kind, "registry: handler replaced");
        }
        previous
    }

    /// Handler registered for `kind`. `None` is a normal outcome for
    /// unrecognized gestures.
    #[must_use]
    pub fn lookup(&self, kind: &str) -> Option<Arc<dyn GestureHandler>> {
        self.handlers.get(kind).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }
}
