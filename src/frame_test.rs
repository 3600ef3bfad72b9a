use super::*;
use serde_json::json;

fn parse(text: &str) -> Value {
    serde_json::from_str(text).expect("encoded frame should be valid json")
}

// =============================================================================
// decode
// =============================================================================

#[test]
fn decode_tagged_frame() {
    let msg = decode(r#"{"type":"HAND_LANDMARKS","x":0.42,"y":0.77}"#).unwrap();
    assert_eq!(msg.kind, "HAND_LANDMARKS");
    assert_eq!(number(&msg.payload, "x"), Some(0.42));
    assert_eq!(number(&msg.payload, "y"), Some(0.77));
    assert!(!msg.payload.contains_key("type"));
}

#[test]
fn decode_keeps_unknown_fields() {
    let msg = decode(r#"{"type":"pinch","x":0.1,"y":0.2,"hands":[{"id":4}],"extra":"kept"}"#).unwrap();
    assert_eq!(msg.payload.get("extra"), Some(&json!("kept")));
    assert_eq!(msg.payload.get("hands"), Some(&json!([{"id": 4}])));
}

#[test]
fn decode_envelope_frame() {
    let msg = decode(r#"{"pinch_zoom":{"action":"pinch_zoom","x":0.3,"y":0.4,"current_dist":0.12}}"#).unwrap();
    assert_eq!(msg.kind, "pinch_zoom");
    assert_eq!(number(&msg.payload, "current_dist"), Some(0.12));
    assert_eq!(msg.payload.get("action"), Some(&json!("pinch_zoom")));
}

#[test]
fn decode_type_is_case_sensitive() {
    let msg = decode(r#"{"type":"Pinch"}"#).unwrap();
    assert_eq!(msg.kind, "Pinch");
}

#[test]
fn decode_rejects_non_json() {
    let err = decode("not json at all").unwrap_err();
    assert!(matches!(err, DecodeError::Malformed(_)));
}

#[test]
fn decode_rejects_non_object() {
    assert!(matches!(decode("[1,2,3]").unwrap_err(), DecodeError::Malformed(_)));
    assert!(matches!(decode("42").unwrap_err(), DecodeError::Malformed(_)));
}

#[test]
fn decode_rejects_missing_type() {
    let err = decode(r#"{"x":0.5,"y":0.5}"#).unwrap_err();
    assert!(matches!(err, DecodeError::MissingType));
}

#[test]
fn decode_rejects_empty_or_non_string_type() {
    assert!(matches!(decode(r#"{"type":""}"#).unwrap_err(), DecodeError::MissingType));
    assert!(matches!(decode(r#"{"type":7}"#).unwrap_err(), DecodeError::MissingType));
    assert!(matches!(decode(r#"{"type":null}"#).unwrap_err(), DecodeError::MissingType));
}

#[test]
fn decode_rejects_envelope_with_scalar_body() {
    let err = decode(r#"{"pinch":3}"#).unwrap_err();
    assert!(matches!(err, DecodeError::MissingType));
}

#[test]
fn decode_rejects_empty_object() {
    assert!(matches!(decode("{}").unwrap_err(), DecodeError::MissingType));
}

// =============================================================================
// encode
// =============================================================================

#[test]
fn encode_renders_two_decimals() {
    let update = DisplayUpdate::new("HAND_LANDMARKS")
        .with_data("x", 0.5)
        .with_data("y", 0.5);
    let value = parse(&encode(&update));
    assert_eq!(value, json!({"type": "HAND_LANDMARKS", "x": "0.50", "y": "0.50"}));
}

#[test]
fn encode_rounds_long_fractions() {
    let update = DisplayUpdate::new("pinch_zoom").with_data("scale", 1.146_9);
    let value = parse(&encode(&update));
    assert_eq!(value.get("scale"), Some(&json!("1.15")));
}

#[test]
fn encode_passes_non_numeric_fields_through() {
    let update = DisplayUpdate::new("pinch")
        .with_data("active", true)
        .with_data("label", "thumb");
    let value = parse(&encode(&update));
    assert_eq!(value.get("active"), Some(&json!(true)));
    assert_eq!(value.get("label"), Some(&json!("thumb")));
}

#[test]
fn encode_type_field_cannot_be_overridden_by_data() {
    let update = DisplayUpdate::new("drag").with_data("type", "spoofed");
    let value = parse(&encode(&update));
    assert_eq!(value.get("type"), Some(&json!("drag")));
}

#[test]
fn encoded_update_decodes_to_same_type_and_rounded_numbers() {
    let update = DisplayUpdate::new("drag")
        .with_data("dx", -0.123_4)
        .with_data("dy", 0.456_7)
        .with_position(Some((0.25, 0.75)));
    let msg = decode(&encode(&update)).unwrap();
    assert_eq!(msg.kind, "drag");
    assert_eq!(number(&msg.payload, "dx"), Some(-0.12));
    assert_eq!(number(&msg.payload, "dy"), Some(0.46));
    assert_eq!(number(&msg.payload, "x"), Some(0.25));
    assert_eq!(number(&msg.payload, "y"), Some(0.75));
}

// =============================================================================
// field access
// =============================================================================

#[test]
fn number_accepts_numeric_strings() {
    let mut data = Data::new();
    data.insert("x".into(), json!(" 0.30 "));
    assert_eq!(number(&data, "x"), Some(0.3));
}

#[test]
fn number_rejects_non_finite_and_wrong_types() {
    let mut data = Data::new();
    data.insert("nan".into(), json!("NaN"));
    data.insert("inf".into(), json!("inf"));
    data.insert("flag".into(), json!(true));
    data.insert("word".into(), json!("left"));
    assert_eq!(number(&data, "nan"), None);
    assert_eq!(number(&data, "inf"), None);
    assert_eq!(number(&data, "flag"), None);
    assert_eq!(number(&data, "word"), None);
    assert_eq!(number(&data, "missing"), None);
}

#[test]
fn with_position_skips_absent_position() {
    let update = DisplayUpdate::new("pinch").with_position(None);
    assert!(update.data.is_empty());
}
