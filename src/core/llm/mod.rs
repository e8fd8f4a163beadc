//! Streaming text-generation provider module.
//!
//! Abstractions and implementations for cancellable, token-streaming
//! reply generation against chat-style language-model APIs.
//!
//! # Architecture
//!
//! - [`BaseLlm`] trait for provider abstraction
//! - Factory function for dynamic provider creation
//! - Replies surface as a lazy [`TokenStream`]; dropping the stream
//!   abandons the request
//!
//! # Supported Providers
//!
//! - **OpenAI** - chat-completions API with SSE streaming

pub mod base;
pub mod openai;

pub use base::{BaseLlm, ChatMessage, ChatRole, LlmError, LlmResult, TokenStream};
pub use openai::{DEFAULT_CHAT_MODEL, OpenAIChat, OpenAIChatConfig};

use std::sync::Arc;

/// Supported generation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// OpenAI chat-completions API
    OpenAI,
}

impl LlmProvider {
    /// Parse provider from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(LlmProvider::OpenAI),
            _ => None,
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::OpenAI => write!(f, "openai"),
        }
    }
}

/// Factory function to create a generation provider.
///
/// # Supported Providers
///
/// - `"openai"` - OpenAI chat-completions API
pub fn create_llm_provider(
    provider_type: &str,
    config: OpenAIChatConfig,
) -> LlmResult<Arc<dyn BaseLlm>> {
    match LlmProvider::parse(provider_type) {
        Some(LlmProvider::OpenAI) => Ok(Arc::new(OpenAIChat::new(config)?)),
        None => Err(LlmError::InvalidConfiguration(format!(
            "Unsupported provider: {}. Supported: {:?}",
            provider_type,
            get_supported_llm_providers()
        ))),
    }
}

/// Get list of supported generation providers.
pub fn get_supported_llm_providers() -> Vec<&'static str> {
    vec!["openai"]
}
