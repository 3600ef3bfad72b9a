//! Pinch handler.
//!
//! A pinch frame may carry any mix of a position (thumb tip `x`/`y`), a
//! distance metric (`distance`, or the camera client's `current_dist`), and an
//! `active` flag. Whatever is present is forwarded; a frame with none of them
//! emits nothing.

use super::{GestureHandler, position};
use crate::frame::{self, Data, DisplayUpdate};

pub const PINCH: &str = "pinch";

pub struct PinchHandler {
    kind: String,
}

impl PinchHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::tagged(PINCH)
    }

    pub fn tagged(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

impl Default for PinchHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureHandler for PinchHandler {
    fn handle(&self, payload: &Data) -> Vec<DisplayUpdate> {
        let at = position(payload);
        let distance = frame::number(payload, "distance").or_else(|| frame::number(payload, "current_dist"));
        let active = frame::flag(payload, "active");

        if at.is_none() && distance.is_none() && active.is_none() {
            return Vec::new();
        }

        let mut update = DisplayUpdate::new(&self.kind).with_position(at);
        if let Some(distance) = distance {
            update = update.with_data("distance", distance);
        }
        if let Some(active) = active {
            update = update.with_data("active", active);
        }
        vec![update]
    }
}
