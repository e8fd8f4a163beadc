//! ConversationRelay WebSocket route configuration.
//!
//! # Endpoint
//!
//! `GET /chat/ws` - WebSocket upgrade for one voice session
//!
//! # Protocol
//!
//! After the upgrade, the telephony bridge sends transcript fragments
//! and interrupts; the server streams reply tokens back:
//!
//! ```json
//! // Bridge sends transcript fragments; `last` closes the turn
//! {"type": "prompt", "voicePrompt": "Hello", "last": true}
//!
//! // Bridge may interrupt an in-flight reply at any time
//! {"type": "interrupt"}
//!
//! // Server streams tokens, then a terminal marker
//! {"type": "text", "token": "Hi", "last": false}
//! {"type": "text", "token": "", "last": true}
//! ```

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::relay::relay_handler;
use crate::state::AppState;

/// Create the ConversationRelay WebSocket router.
pub fn create_relay_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat/ws", get(relay_handler))
        .layer(TraceLayer::new_for_http())
}
