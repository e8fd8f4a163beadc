//! Base abstractions for streaming text-generation backends.
//!
//! A backend receives the full conversation so far and produces a lazy,
//! cancellable sequence of text fragments. Dropping the stream abandons
//! the in-flight request.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for generation operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors surfaced by generation backends.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider configuration is invalid or incomplete
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// HTTP request to the provider failed
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider returned a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The token stream broke mid-reply
    #[error("Stream error: {0}")]
    Stream(String),
}

/// Role of a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of a linear conversation history.
///
/// Serializes to the `{"role": ..., "content": ...}` shape chat APIs
/// expect, so histories can be sent to providers without conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Lazy sequence of generated text fragments, in generation order.
pub type TokenStream = Pin<Box<dyn Stream<Item = LlmResult<String>> + Send>>;

/// Generic streaming-generation trait all providers implement.
#[async_trait]
pub trait BaseLlm: Send + Sync {
    /// Unique identifier for this provider
    fn provider_name(&self) -> &'static str;

    /// Request a streamed reply for the given conversation.
    ///
    /// The stream yields fragments until the reply is complete, then
    /// ends. Errors may surface either here (request setup) or as items
    /// of the stream (mid-reply failures).
    async fn chat_stream(
        &self,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
    ) -> LlmResult<TokenStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_constructors() {
        assert_eq!(ChatMessage::system("be brief").role, ChatRole::System);
        assert_eq!(ChatMessage::user("hi").role, ChatRole::User);
        assert_eq!(ChatMessage::assistant("hello").role, ChatRole::Assistant);
    }

    #[test]
    fn test_chat_message_wire_format() {
        let json = serde_json::to_string(&ChatMessage::user("Hello")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"Hello"}"#);
    }

    #[test]
    fn test_chat_role_display() {
        assert_eq!(ChatRole::System.to_string(), "system");
        assert_eq!(ChatRole::User.to_string(), "user");
        assert_eq!(ChatRole::Assistant.to_string(), "assistant");
    }
}
