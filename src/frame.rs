//! Frame codec — raw text frames in, typed gesture messages out.
//!
//! DESIGN
//! ======
//! Inbound frames are JSON objects. Two shapes are accepted:
//! - Tagged: `{"type":"pinch","x":0.31,"y":0.62}` — `type` names the gesture,
//!   every other field is payload.
//! - Envelope: `{"pinch":{"x":0.31,"y":0.62}}` — a single key naming the
//!   gesture wrapping the payload object. This is what the camera client emits.
//!
//! The payload is passed through opaquely; handlers pick out the fields they
//! care about and ignore the rest.
//!
//! Outbound display updates are always tagged frames. Numeric fields are
//! rendered as fixed two-decimal strings so consumers draw from identical
//! values regardless of float formatting on either side.

use serde::Deserialize;
use serde_json::Value;

// =============================================================================
// FIELD CONSTANTS
// =============================================================================

/// Frame key carrying the gesture type tag.
pub const FRAME_TYPE: &str = "type";

/// Decimal places used when rendering numeric display fields.
pub const DISPLAY_PRECISION: usize = 2;

// =============================================================================
// TYPES
// =============================================================================

/// Flat key-value payload. Alias to reduce noise in signatures.
pub type Data = serde_json::Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("frame has no gesture type")]
    MissingType,
}

/// One decoded inbound gesture event.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureMessage {
    /// Case-sensitive gesture type. Never empty.
    pub kind: String,
    pub payload: Data,
}

/// Handler output destined for every connected consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayUpdate {
    pub kind: String,
    pub data: Data,
}

/// Wire shape before the type tag is resolved.
#[derive(Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    kind: Option<Value>,
    #[serde(flatten)]
    rest: Data,
}

// =============================================================================
// DECODE
// =============================================================================

/// Parse one raw text frame into a [`GestureMessage`].
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] when the text is not a JSON object and
/// [`DecodeError::MissingType`] when no usable gesture type can be found.
pub fn decode(raw: &str) -> Result<GestureMessage, DecodeError> {
    let RawFrame { kind, rest } = serde_json::from_str(raw)?;
    match kind {
        Some(Value::String(kind)) if !kind.is_empty() => Ok(GestureMessage { kind, payload: rest }),
        Some(_) => Err(DecodeError::MissingType),
        None => unwrap_envelope(rest),
    }
}

fn unwrap_envelope(rest: Data) -> Result<GestureMessage, DecodeError> {
    if rest.len() != 1 {
        return Err(DecodeError::MissingType);
    }
    let Some((kind, Value::Object(payload))) = rest.into_iter().next() else {
        return Err(DecodeError::MissingType);
    };
    if kind.is_empty() {
        return Err(DecodeError::MissingType);
    }
    Ok(GestureMessage { kind, payload })
}

// =============================================================================
// ENCODE
// =============================================================================

/// Serialize a display update into an outbound text frame.
#[must_use]
pub fn encode(update: &DisplayUpdate) -> String {
    let mut out = Data::new();
    out.insert(FRAME_TYPE.into(), Value::String(update.kind.clone()));
    for (key, value) in &update.data {
        if key == FRAME_TYPE {
            continue;
        }
        out.insert(key.clone(), render(value));
    }
    Value::Object(out).to_string()
}

fn render(value: &Value) -> Value {
    match value.as_f64() {
        Some(n) if value.is_number() => Value::String(format!("{:.*}", DISPLAY_PRECISION, n)),
        _ => value.clone(),
    }
}

// =============================================================================
// FIELD ACCESS
// =============================================================================

/// Read a finite number from a payload. Accepts JSON numbers and numeric
/// strings, so re-decoded outbound frames read back the same way.
#[must_use]
pub fn number(payload: &Data, key: &str) -> Option<f64> {
    let value = match payload.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

#[must_use]
pub fn flag(payload: &Data, key: &str) -> Option<bool> {
    payload.get(key).and_then(Value::as_bool)
}

// =============================================================================
// BUILDERS
// =============================================================================

impl DisplayUpdate {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), data: Data::new() }
    }

    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Attach `x`/`y` when both are present.
    #[must_use]
    pub fn with_position(self, position: Option<(f64, f64)>) -> Self {
        match position {
            Some((x, y)) => self.with_data("x", x).with_data("y", y),
            None => self,
        }
    }
}

#[cfg(test)]
#[path = "frame_test.rs"]
mod tests;
