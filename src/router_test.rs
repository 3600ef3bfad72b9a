use super::*;
use crate::frame::{Data, DisplayUpdate};
use crate::handlers::{GestureHandler, HandObserver, LandmarkHandler};
use crate::state::Outbound;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};

/// Counts invocations and echoes one update tagged with its label.
struct CountingHandler {
    label: &'static str,
    calls: AtomicUsize,
}

impl CountingHandler {
    fn new(label: &'static str) -> Arc<Self> {
        Arc::new(Self { label, calls: AtomicUsize::new(0) })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GestureHandler for CountingHandler {
    fn handle(&self, _payload: &Data) -> Vec<DisplayUpdate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        vec![DisplayUpdate::new(self.label)]
    }
}

#[derive(Default)]
struct RecordingObserver {
    moves: Mutex<Vec<(f64, f64)>>,
}

impl HandObserver for RecordingObserver {
    fn on_hand_moved(&self, x: f64, y: f64) {
        self.moves.lock().expect("observer mutex should lock").push((x, y));
    }
}

async fn recv_broadcast(rx: &mut mpsc::Receiver<Outbound>) -> Value {
    let frame = timeout(Duration::from_millis(200), rx.recv())
        .await
        .expect("broadcast receive timed out")
        .expect("broadcast channel closed unexpectedly");
    serde_json::from_str(frame.as_str()).expect("broadcast frame should be json")
}

async fn assert_no_broadcast(rx: &mut mpsc::Receiver<Outbound>) {
    assert!(
        timeout(Duration::from_millis(80), rx.recv()).await.is_err(),
        "expected no broadcast frame"
    );
}

async fn router_with_consumer(registry: HandlerRegistry) -> (GestureRouter, mpsc::Receiver<Outbound>) {
    let consumers = Consumers::new();
    let (tx, rx) = mpsc::channel(16);
    consumers.add(Uuid::new_v4(), tx).await;
    (GestureRouter::new(registry, consumers), rx)
}

#[tokio::test]
async fn registered_type_invokes_exactly_its_handler_once() {
    let pinch = CountingHandler::new("pinch");
    let drag = CountingHandler::new("drag");
    let mut registry = HandlerRegistry::new();
    registry.register("pinch", pinch.clone());
    registry.register("drag", drag.clone());
    let (router, mut rx) = router_with_consumer(registry).await;

    let outcome = router.on_message(r#"{"type":"pinch","x":0.1,"y":0.2}"#, Uuid::new_v4()).await;

    assert_eq!(outcome, Dispatch::Delivered { updates: 1, recipients: 1 });
    assert_eq!(pinch.calls(), 1);
    assert_eq!(drag.calls(), 0);
    assert_eq!(recv_broadcast(&mut rx).await, json!({"type": "pinch"}));
}

#[tokio::test]
async fn unknown_type_is_dropped_without_broadcast() {
    let pinch = CountingHandler::new("pinch");
    let mut registry = HandlerRegistry::new();
    registry.register("pinch", pinch.clone());
    let (router, mut rx) = router_with_consumer(registry).await;

    let outcome = router.on_message(r#"{"type":"swipe"}"#, Uuid::new_v4()).await;

    assert_eq!(outcome, Dispatch::Unrouted);
    assert_eq!(pinch.calls(), 0);
    assert_no_broadcast(&mut rx).await;
}

#[tokio::test]
async fn missing_type_and_garbage_are_malformed() {
    let pinch = CountingHandler::new("pinch");
    let mut registry = HandlerRegistry::new();
    registry.register("pinch", pinch.clone());
    let (router, mut rx) = router_with_consumer(registry).await;

    assert_eq!(router.on_message(r#"{"x":0.5}"#, Uuid::new_v4()).await, Dispatch::Malformed);
    assert_eq!(router.on_message("{not json", Uuid::new_v4()).await, Dispatch::Malformed);
    assert_eq!(pinch.calls(), 0);
    assert_no_broadcast(&mut rx).await;
}

#[tokio::test]
async fn replacement_handler_receives_subsequent_frames() {
    let first = CountingHandler::new("first");
    let second = CountingHandler::new("second");
    let mut registry = HandlerRegistry::new();
    registry.register("pinch", first.clone());
    registry.register("pinch", second.clone());
    let router = GestureRouter::new(registry, Consumers::new());

    router.on_message(r#"{"type":"pinch"}"#, Uuid::new_v4()).await;
    router.on_message(r#"{"type":"pinch"}"#, Uuid::new_v4()).await;

    assert_eq!(first.calls(), 0);
    assert_eq!(second.calls(), 2);
}

#[tokio::test]
async fn handler_with_no_output_broadcasts_nothing() {
    let (router, mut rx) = router_with_consumer(HandlerRegistry::with_defaults(None)).await;

    let outcome = router.on_message(r#"{"type":"HAND_LANDMARKS","x":0.5}"#, Uuid::new_v4()).await;

    assert_eq!(outcome, Dispatch::Delivered { updates: 0, recipients: 0 });
    assert_no_broadcast(&mut rx).await;
}

#[tokio::test]
async fn landmark_frame_notifies_observer_and_broadcasts_rounded_coordinates() {
    let observer = Arc::new(RecordingObserver::default());
    let mut registry = HandlerRegistry::new();
    registry.register(
        "HAND_LANDMARKS",
        Arc::new(LandmarkHandler::new().with_observer(observer.clone())),
    );
    let (router, mut rx) = router_with_consumer(registry).await;

    router
        .on_message(r#"{"type":"HAND_LANDMARKS","x":0.5,"y":0.5}"#, Uuid::new_v4())
        .await;

    assert_eq!(observer.moves.lock().unwrap().as_slice(), &[(0.5, 0.5)]);
    assert_eq!(
        recv_broadcast(&mut rx).await,
        json!({"type": "HAND_LANDMARKS", "x": "0.50", "y": "0.50"})
    );
}

#[tokio::test]
async fn envelope_frame_from_camera_client_routes_by_key() {
    let (router, mut rx) = router_with_consumer(HandlerRegistry::with_defaults(None)).await;

    router
        .on_message(r#"{"pinch":{"action":"pinch","x":0.314,"y":0.627}}"#, Uuid::new_v4())
        .await;

    assert_eq!(recv_broadcast(&mut rx).await, json!({"type": "pinch", "x": "0.31", "y": "0.63"}));
}

#[tokio::test]
async fn idle_heartbeat_is_unrouted() {
    let (router, mut rx) = router_with_consumer(HandlerRegistry::with_defaults(None)).await;

    let outcome = router.on_message(r#"{"none":{"action":"none"}}"#, Uuid::new_v4()).await;

    assert_eq!(outcome, Dispatch::Unrouted);
    assert_no_broadcast(&mut rx).await;
}

#[tokio::test]
async fn pinch_with_one_closed_consumer_reaches_the_other_two() {
    let consumers = Consumers::new();
    let (tx_a, mut rx_a) = mpsc::channel(8);
    let (tx_b, rx_b) = mpsc::channel(8);
    let (tx_c, mut rx_c) = mpsc::channel(8);
    consumers.add(Uuid::new_v4(), tx_a).await;
    consumers.add(Uuid::new_v4(), tx_b).await;
    consumers.add(Uuid::new_v4(), tx_c).await;
    drop(rx_b);
    let router = GestureRouter::new(HandlerRegistry::with_defaults(None), consumers.clone());

    let outcome = router.on_message(r#"{"type":"pinch","x":0.2,"y":0.3}"#, Uuid::new_v4()).await;

    assert_eq!(outcome, Dispatch::Delivered { updates: 1, recipients: 2 });
    assert_eq!(consumers.len().await, 2);
    let expected = json!({"type": "pinch", "x": "0.20", "y": "0.30"});
    assert_eq!(recv_broadcast(&mut rx_a).await, expected);
    assert_eq!(recv_broadcast(&mut rx_c).await, expected);
}

#[tokio::test]
async fn zoom_scale_is_broadcast_with_fixed_precision() {
    let (router, mut rx) = router_with_consumer(HandlerRegistry::with_defaults(None)).await;

    router.on_message(r#"{"type":"pinch_zoom","scale":1.149}"#, Uuid::new_v4()).await;

    assert_eq!(recv_broadcast(&mut rx).await, json!({"type": "pinch_zoom", "scale": "1.15"}));
}
