//! Cancellable reply-generation task.
//!
//! One task streams one reply for one finalized user turn. Whatever way
//! the streaming loop exits (end of stream, cancellation, backend
//! failure), the recording step runs: the turn is appended to history
//! and exactly one terminal token is emitted.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::llm::{BaseLlm, ChatMessage, TokenStream};

use super::messages::{RelayMessageRoute, RelayOutgoingMessage};

/// Handle to the at-most-one in-flight generation task of a session.
#[derive(Debug)]
pub struct GenerationHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl GenerationHandle {
    /// Spawn a generation task for one finalized user turn.
    pub fn spawn(
        llm: Arc<dyn BaseLlm>,
        history: Arc<RwLock<Vec<ChatMessage>>>,
        message: String,
        max_tokens: u32,
        message_tx: mpsc::Sender<RelayMessageRoute>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_generation(
            llm,
            history,
            message,
            max_tokens,
            message_tx,
            cancel.clone(),
        ));
        Self { cancel, task }
    }

    /// Cancel the task and wait until it has fully unwound.
    ///
    /// Returns only after the task has appended its turn to history and
    /// emitted its terminal token, so the caller may start a new
    /// generation immediately afterwards.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "generation task aborted abnormally");
        }
    }
}

/// Drive one streaming generation to completion.
async fn run_generation(
    llm: Arc<dyn BaseLlm>,
    history: Arc<RwLock<Vec<ChatMessage>>>,
    message: String,
    max_tokens: u32,
    message_tx: mpsc::Sender<RelayMessageRoute>,
    cancel: CancellationToken,
) {
    let mut reply_parts: Vec<String> = Vec::new();
    stream_reply(
        llm.as_ref(),
        &history,
        &message,
        max_tokens,
        &message_tx,
        &cancel,
        &mut reply_parts,
    )
    .await;

    // Unconditional recording step. A cut-short reply is still the
    // assistant's turn, even when it is empty.
    let reply = reply_parts.concat();
    debug!(turn = %message, reply_len = reply.len(), "recording turn");
    {
        let mut history = history.write().await;
        history.push(ChatMessage::user(message));
        history.push(ChatMessage::assistant(reply));
    }
    let _ = message_tx
        .send(RelayMessageRoute::Outgoing(RelayOutgoingMessage::terminal()))
        .await;
}

/// Stream reply tokens until the backend finishes, the token is
/// cancelled, or the backend fails. Accumulated fragments stay in
/// `reply_parts` on every exit path.
async fn stream_reply(
    llm: &dyn BaseLlm,
    history: &RwLock<Vec<ChatMessage>>,
    message: &str,
    max_tokens: u32,
    message_tx: &mpsc::Sender<RelayMessageRoute>,
    cancel: &CancellationToken,
    reply_parts: &mut Vec<String>,
) {
    let request = {
        let history = history.read().await;
        let mut messages = history.clone();
        messages.push(ChatMessage::user(message));
        messages
    };

    let mut stream: TokenStream = match llm.chat_stream(request, max_tokens).await {
        Ok(stream) => stream,
        Err(e) => {
            warn!(error = %e, "generation request failed");
            return;
        }
    };

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("generation cancelled mid-stream");
                return;
            }
            fragment = stream.next() => match fragment {
                Some(Ok(token)) => {
                    reply_parts.push(token.clone());
                    if message_tx
                        .send(RelayMessageRoute::Outgoing(RelayOutgoingMessage::token(token)))
                        .await
                        .is_err()
                    {
                        // Transport gone; stop streaming. The recording
                        // step still runs.
                        return;
                    }
                }
                Some(Err(e)) => {
                    warn!(error = %e, "generation stream failed");
                    return;
                }
                None => return,
            }
        }
    }
}
