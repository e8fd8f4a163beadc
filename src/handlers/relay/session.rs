//! Session controller: turn assembly and generation lifecycle.
//!
//! Single consumer of the inbound event queue. Exactly one generation
//! task may exist at a time; a new finalized turn or an interrupt first
//! cancels the running task and waits for it to unwind, which
//! serializes all history mutation and all socket writes without any
//! extra locking discipline.

use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info};

use crate::core::llm::{BaseLlm, ChatMessage};

use super::generation::GenerationHandle;
use super::messages::{RelayIncomingMessage, RelayMessageRoute};

/// State machine owning the input buffer, the conversation history and
/// the at-most-one in-flight generation task.
pub struct SessionController {
    llm: Arc<dyn BaseLlm>,
    history: Arc<RwLock<Vec<ChatMessage>>>,
    events: mpsc::UnboundedReceiver<RelayIncomingMessage>,
    message_tx: mpsc::Sender<RelayMessageRoute>,
    input_buffer: Vec<String>,
    active: Option<GenerationHandle>,
    max_tokens: u32,
}

impl SessionController {
    /// Create a controller with a history seeded by the system persona.
    pub fn new(
        llm: Arc<dyn BaseLlm>,
        system_prompt: &str,
        max_tokens: u32,
        events: mpsc::UnboundedReceiver<RelayIncomingMessage>,
        message_tx: mpsc::Sender<RelayMessageRoute>,
    ) -> Self {
        let history = Arc::new(RwLock::new(vec![ChatMessage::system(system_prompt)]));
        Self {
            llm,
            history,
            events,
            message_tx,
            input_buffer: Vec::new(),
            active: None,
            max_tokens,
        }
    }

    /// Shared handle to the conversation history.
    pub fn history(&self) -> Arc<RwLock<Vec<ChatMessage>>> {
        Arc::clone(&self.history)
    }

    /// Consume the event queue until the transport closes.
    ///
    /// Events are handled strictly in arrival order. When the queue
    /// ends the controller cancels any in-flight generation before
    /// returning, so no writer outlives the session.
    pub async fn run(mut self) {
        while let Some(event) = self.events.recv().await {
            self.handle_event(event).await;
        }
        debug!("event queue closed, tearing down session");
        self.stop_generation().await;
    }

    async fn handle_event(&mut self, event: RelayIncomingMessage) {
        match event {
            RelayIncomingMessage::Prompt {
                voice_prompt,
                last: false,
            } => {
                self.input_buffer.push(voice_prompt);
            }
            RelayIncomingMessage::Prompt {
                voice_prompt,
                last: true,
            } => {
                self.input_buffer.push(voice_prompt);
                let message = self.input_buffer.join(" ");
                self.input_buffer.clear();
                self.stop_generation().await;
                // An all-empty turn is dropped silently: no task, no
                // terminal token, no history entry.
                if !message.is_empty() {
                    info!(turn = %message, "starting generation");
                    self.active = Some(GenerationHandle::spawn(
                        Arc::clone(&self.llm),
                        Arc::clone(&self.history),
                        message,
                        self.max_tokens,
                        self.message_tx.clone(),
                    ));
                }
            }
            RelayIncomingMessage::Interrupt => {
                debug!("interrupt received");
                self.input_buffer.clear();
                self.stop_generation().await;
            }
        }
    }

    /// Cancel-and-await the active generation, if any.
    async fn stop_generation(&mut self) {
        if let Some(active) = self.active.take() {
            active.stop().await;
        }
    }
}
