//! Configuration types for the OpenAI chat-completions API.

use serde::{Deserialize, Serialize};

/// Default chat model used for replies.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o";

/// Default API base URL.
pub const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIChatConfig {
    /// API key (`sk-...`)
    pub api_key: String,
    /// Base URL, overridable for proxies and tests
    pub base_url: String,
    /// Chat model identifier
    pub model: String,
}

impl Default for OpenAIChatConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: OPENAI_API_BASE_URL.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }
}

impl OpenAIChatConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Full chat-completions endpoint URL.
    pub fn api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_empty() {
            return Err("OpenAI API key must not be empty".to_string());
        }
        if self.model.is_empty() {
            return Err("OpenAI model must not be empty".to_string());
        }
        Ok(())
    }
}
