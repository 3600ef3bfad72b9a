//! Local pointer overlay.
//!
//! Stand-in for the desktop HUD when the relay runs headless: tracks where
//! the pointer marker would be drawn on a fixed-size screen and traces the
//! coordinate label. Attached to the landmark handler as its observer.

use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::handlers::HandObserver;

/// Pointer position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

pub struct ScreenPointer {
    width: f64,
    height: f64,
    last: Mutex<Option<ScreenPoint>>,
}

impl ScreenPointer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width: f64::from(width), height: f64::from(height), last: Mutex::new(None) }
    }

    /// Latest pointer position, `None` until the first hand move.
    #[cfg(test)]
    #[must_use]
    pub fn position(&self) -> Option<ScreenPoint> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// HUD label text for a normalized position.
#[must_use]
pub fn label(x: f64, y: f64) -> String {
    format!("X: {x:.2} , Y: {y:.2}")
}

impl HandObserver for ScreenPointer {
    fn on_hand_moved(&self, x: f64, y: f64) {
        let point = ScreenPoint { x: x * self.width, y: y * self.height };
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(point);
        debug!(px = point.x, py = point.y, label = %label(x, y), "overlay: pointer moved");
    }
}
