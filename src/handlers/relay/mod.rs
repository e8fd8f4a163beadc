//! ConversationRelay WebSocket endpoint.
//!
//! Bridges one telephony voice session to the streaming generation
//! backend. The handler splits the socket into a sender task and an
//! ingestion loop around a [`SessionController`], which assembles
//! transcript fragments into turns, drives one cancellable generation
//! at a time and keeps the conversation history linear.

mod generation;
mod handler;
mod messages;
mod session;

pub use handler::relay_handler;
pub use messages::{RelayIncomingMessage, RelayMessageRoute, RelayOutgoingMessage};
pub use session::SessionController;
