//! ConversationRelay WebSocket message types.
//!
//! Wire schema spoken by the telephony bridge on the `/chat/ws` socket.
//! Inbound frames carry transcript fragments and interrupts; outbound
//! frames carry reply tokens, with `token == "" && last == true` marking
//! the end of one reply.

use serde::{Deserialize, Serialize};

// =============================================================================
// Incoming Messages (Bridge -> Server)
// =============================================================================

/// Incoming WebSocket messages from the telephony bridge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RelayIncomingMessage {
    /// A fragment of the caller's spoken turn
    Prompt {
        /// Transcribed text fragment
        #[serde(rename = "voicePrompt")]
        voice_prompt: String,
        /// Marks the last fragment of the turn
        last: bool,
    },

    /// Abandon any in-flight reply and discard buffered fragments
    Interrupt,
}

// =============================================================================
// Outgoing Messages (Server -> Bridge)
// =============================================================================

/// Outgoing WebSocket messages to the telephony bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RelayOutgoingMessage {
    /// A reply token, or the end-of-reply marker
    Text { token: String, last: bool },
}

impl RelayOutgoingMessage {
    /// A single non-terminal reply token.
    pub fn token(token: impl Into<String>) -> Self {
        Self::Text {
            token: token.into(),
            last: false,
        }
    }

    /// The terminal marker closing one reply.
    pub fn terminal() -> Self {
        Self::Text {
            token: String::new(),
            last: true,
        }
    }
}

/// Routing wrapper for the socket sender task.
#[derive(Debug)]
pub enum RelayMessageRoute {
    /// JSON message for the bridge
    Outgoing(RelayOutgoingMessage),
    /// Close the connection
    Close,
}
