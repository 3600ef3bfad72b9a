//! Drag handler. Requires a delta vector (`dx`, `dy`); the current position
//! rides along when the client sends one.

use super::{GestureHandler, position};
use crate::frame::{self, Data, DisplayUpdate};

pub const DRAG: &str = "drag";

pub struct DragHandler {
    kind: String,
}

impl DragHandler {
    #[must_use]
    pub fn new() -> Self {
        Self { kind: DRAG.into() }
    }
}

impl Default for DragHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureHandler for DragHandler {
    fn handle(&self, payload: &Data) -> Vec<DisplayUpdate> {
        let (Some(dx), Some(dy)) = (frame::number(payload, "dx"), frame::number(payload, "dy")) else {
            return Vec::new();
        };

        vec![
            DisplayUpdate::new(&self.kind)
                .with_data("dx", dx)
                .with_data("dy", dy)
                .with_position(position(payload)),
        ]
    }
}
