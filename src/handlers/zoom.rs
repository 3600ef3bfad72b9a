//! Pinch-zoom handler.
//!
//! DESIGN
//! ======
//! Clients may send an explicit `scale`. The camera client instead sends the
//! raw thumb/index distance (`current_dist`) every frame, so the handler
//! derives the scale relative to the distance that opened the gesture.
//!
//! The baseline is shared by every connection's read loop and sits behind a
//! mutex. A gap longer than [`ZOOM_IDLE_RESET`] between zoom frames ends the
//! gesture; the next frame opens a new one at scale 1.0.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::{GestureHandler, position};
use crate::frame::{self, Data, DisplayUpdate};

pub const PINCH_ZOOM: &str = "pinch_zoom";

/// Idle gap after which the next zoom frame starts a fresh gesture.
pub const ZOOM_IDLE_RESET: Duration = Duration::from_millis(500);

#[derive(Clone, Copy)]
struct Baseline {
    distance: f64,
    last_seen: Instant,
}

pub struct ZoomHandler {
    kind: String,
    baseline: Mutex<Option<Baseline>>,
}

impl ZoomHandler {
    #[must_use]
    pub fn new() -> Self {
        Self { kind: PINCH_ZOOM.into(), baseline: Mutex::new(None) }
    }

    fn handle_at(&self, payload: &Data, now: Instant) -> Vec<DisplayUpdate> {
        let scale = match frame::number(payload, "scale") {
            Some(scale) => Some(scale),
            None => frame::number(payload, "current_dist").and_then(|d| self.scale_from_distance(d, now)),
        };
        let Some(scale) = scale.filter(|s| s.is_finite() && *s > 0.0) else {
            return Vec::new();
        };

        vec![
            DisplayUpdate::new(&self.kind)
                .with_data("scale", scale)
                .with_position(position(payload)),
        ]
    }

    fn scale_from_distance(&self, distance: f64, now: Instant) -> Option<f64> {
        let mut baseline = self.baseline.lock().unwrap_or_else(PoisonError::into_inner);

        let start = match *baseline {
            Some(b) if now.saturating_duration_since(b.last_seen) <= ZOOM_IDLE_RESET => b.distance,
            _ => distance,
        };
        if start <= 0.0 {
            *baseline = None;
            return None;
        }

        *baseline = Some(Baseline { distance: start, last_seen: now });
        Some(distance / start)
    }
}

impl Default for ZoomHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureHandler for ZoomHandler {
    fn handle(&self, payload: &Data) -> Vec<DisplayUpdate> {
        self.handle_at(payload, Instant::now())
    }
}
