//! ConversationRelay WebSocket handler.
//!
//! Wires one WebSocket connection to one voice session: a sender task
//! owns the outgoing half of the socket, an ingestion loop relays
//! inbound frames onto the session queue in arrival order, and the
//! session controller consumes the queue.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::state::AppState;

use super::messages::{RelayIncomingMessage, RelayMessageRoute};
use super::session::SessionController;

/// Outbound channel depth; token events are small JSON frames.
const CHANNEL_BUFFER_SIZE: usize = 256;

/// ConversationRelay WebSocket handler.
///
/// Upgrades the HTTP connection for a single voice session. The bridge
/// sends transcript fragments and interrupts; the server streams reply
/// tokens back, one reply at a time.
pub async fn relay_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_relay_socket(socket, state))
}

/// Handle one relay session for the lifetime of the socket.
async fn handle_relay_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4();
    info!(%session_id, "relay session established");

    let (sender, receiver) = socket.split();
    let (message_tx, message_rx) = mpsc::channel::<RelayMessageRoute>(CHANNEL_BUFFER_SIZE);

    // Sender task: sole writer on the socket sink.
    let sender_task = tokio::spawn(send_outgoing(sender, message_rx));

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let controller = SessionController::new(
        Arc::clone(&state.llm),
        &state.config.system_prompt,
        state.config.max_new_tokens,
        event_rx,
        message_tx.clone(),
    );

    // Ingestion and the controller run concurrently for the whole
    // session. When the socket closes, ingestion ends, the queue drains
    // and the controller unwinds any in-flight generation.
    tokio::join!(ingest_events(receiver, event_tx), controller.run());

    let _ = message_tx.send(RelayMessageRoute::Close).await;
    drop(message_tx);
    if let Err(e) = sender_task.await {
        error!(%session_id, error = %e, "sender task failed");
    }

    info!(%session_id, "relay session terminated");
}

/// Drain the outbound route channel into the socket sink.
async fn send_outgoing(
    mut sender: SplitSink<WebSocket, Message>,
    mut message_rx: mpsc::Receiver<RelayMessageRoute>,
) {
    while let Some(route) = message_rx.recv().await {
        let result = match route {
            RelayMessageRoute::Outgoing(message) => match serde_json::to_string(&message) {
                Ok(json) => sender.send(Message::Text(json.into())).await,
                Err(e) => {
                    error!(error = %e, "failed to serialize outgoing message");
                    continue;
                }
            },
            RelayMessageRoute::Close => {
                debug!("closing relay socket");
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
        };

        if let Err(e) = result {
            warn!(error = %e, "failed to send WebSocket message");
            break;
        }
    }
}

/// Ingestion loop: pure relay from the socket to the session queue,
/// preserving arrival order.
async fn ingest_events(
    mut receiver: SplitStream<WebSocket>,
    events: mpsc::UnboundedSender<RelayIncomingMessage>,
) {
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<RelayIncomingMessage>(&text) {
                Ok(event) => {
                    if events.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "ignoring malformed relay frame"),
            },
            Ok(Message::Close(_)) => {
                info!("relay socket closed by bridge");
                break;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Binary(_)) => debug!("ignoring binary frame"),
            Err(e) => {
                warn!(error = %e, "relay socket error");
                break;
            }
        }
    }
}
