//! Gesture handlers.
//!
//! ARCHITECTURE
//! ============
//! Each handler interprets one gesture payload shape and returns the display
//! updates it produces. Handlers never touch the transport: the router owns
//! broadcasting, so a handler holds no reference back to the hub.
//!
//! Every handler is constructed with the type tag it stamps on its output, so
//! one implementation can serve several gesture names (e.g. `pinch` and
//! `left_pinch`).
//!
//! Handlers are shared across every connection's read loop. Stateless ones
//! need nothing extra; the zoom handler guards its baseline with a mutex.

pub mod drag;
pub mod landmark;
pub mod pinch;
pub mod zoom;

pub use drag::DragHandler;
pub use landmark::LandmarkHandler;
pub use pinch::PinchHandler;
pub use zoom::ZoomHandler;

use crate::frame::{self, Data, DisplayUpdate};

/// Interprets one gesture type's payload.
pub trait GestureHandler: Send + Sync {
    /// Produce zero or more display updates. Missing or malformed fields
    /// yield an empty vec, never an error.
    fn handle(&self, payload: &Data) -> Vec<DisplayUpdate>;
}

/// Local observer notified synchronously when the tracked hand moves.
///
/// Called from whichever read loop processed the frame; implementations
/// marshal to their own context if they need one.
pub trait HandObserver: Send + Sync {
    fn on_hand_moved(&self, x: f64, y: f64);
}

/// Both `x` and `y`, or nothing.
fn position(payload: &Data) -> Option<(f64, f64)> {
    Some((frame::number(payload, "x")?, frame::number(payload, "y")?))
}
