//! OpenAI chat-completions integration.
//!
//! This module provides a streaming generation client for the OpenAI
//! chat-completions API (`POST /v1/chat/completions` with `stream: true`).
//! Tokens arrive as server-sent events and are exposed as a
//! [`TokenStream`](crate::core::llm::TokenStream) of text deltas.
//!
//! The module is organized into focused submodules:
//!
//! - [`config`]: Configuration types (`OpenAIChatConfig`)
//! - [`messages`]: Request/response types for the API
//! - [`client`]: The `OpenAIChat` client implementation
//!
//! # API Reference
//!
//! - API Endpoint: `POST https://api.openai.com/v1/chat/completions`
//! - Documentation: <https://platform.openai.com/docs/api-reference/chat/create>

mod client;
mod config;
mod messages;


// Re-export public types
pub use client::OpenAIChat;
pub use config::{DEFAULT_CHAT_MODEL, OPENAI_API_BASE_URL, OpenAIChatConfig};
pub use messages::{
    ChatCompletionChunk, ChatCompletionRequest, ChunkChoice, ChunkDelta, OpenAIError,
    OpenAIErrorResponse,
};
