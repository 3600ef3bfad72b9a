//! WebSocket handler — per-connection read loop.
//!
//! DESIGN
//! ======
//! On upgrade, generates a client ID, registers the connection as a consumer
//! and splits the socket:
//! - A writer task drains this consumer's queue into the sink
//! - The read loop routes incoming text frames (one call per non-blank line)
//!   until the peer leaves or the hub stops
//!
//! Reads never wait on writes. A peer that never reads (the camera client)
//! only stalls its own writer; its frames keep being routed.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → consumer added to the live set, writer spawned
//! 2. Frames are routed; broadcasts are written as they arrive
//! 3. Peer close, read error, write error or hub stop → consumer removed,
//!    writer sends Close once its queue closes, or is aborted after a grace
//!    period

use std::time::Duration;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::state::{AppState, Outbound, wait_for_stop};

/// How long a finished connection waits for its writer to flush and close.
const WRITER_GRACE: Duration = Duration::from_secs(1);

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(socket: WebSocket, state: AppState) {
    let client_id = Uuid::new_v4();
    let (sink, mut stream) = socket.split();

    // Per-connection queue for frames broadcast to this consumer.
    let (client_tx, client_rx) = mpsc::channel::<Outbound>(state.buffer);
    let live = state.consumers.add(client_id, client_tx).await;
    info!(%client_id, consumers = live, "ws: consumer connected");

    let mut writer = tokio::spawn(write_frames(sink, client_rx, client_id));
    let mut writer_done = false;

    let stop = wait_for_stop(state.shutdown.clone());
    tokio::pin!(stop);

    loop {
        tokio::select! {
            () = &mut stop => break,
            _ = &mut writer => {
                writer_done = true;
                break;
            }
            msg = stream.next() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Text(text) => route_lines(&state, client_id, text.as_str()).await,
                    Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                        Ok(text) => route_lines(&state, client_id, text).await,
                        Err(e) => warn!(%client_id, error = %e, "ws: non-utf8 binary frame dropped"),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    }

    // Dropping our queue sender lets the writer finish with a Close frame.
    state.consumers.remove(client_id).await;
    if !writer_done && tokio::time::timeout(WRITER_GRACE, &mut writer).await.is_err() {
        debug!(%client_id, "ws: writer stalled, aborting");
        writer.abort();
    }
    info!(%client_id, "ws: consumer disconnected");
}

/// Forward queued frames to the peer until the queue closes or a write fails.
async fn write_frames(
    mut sink: SplitSink<WebSocket, Message>,
    mut client_rx: mpsc::Receiver<Outbound>,
    client_id: Uuid,
) {
    while let Some(frame) = client_rx.recv().await {
        if let Err(e) = sink.send(Message::Text(frame)).await {
            warn!(%client_id, error = %e, "ws: write failed");
            return;
        }
    }
    let _ = sink.send(Message::Close(None)).await;
}

/// Route every non-blank line of one message, in order.
async fn route_lines(state: &AppState, client_id: Uuid, text: &str) {
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        state.router.on_message(line, client_id).await;
    }
}
