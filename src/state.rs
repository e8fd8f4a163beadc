//! Shared application state.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::llm::{BaseLlm, LlmError, OpenAIChatConfig, create_llm_provider};

/// State shared by every handler: server configuration plus the
/// generation provider used by relay sessions.
pub struct AppState {
    pub config: ServerConfig,
    pub llm: Arc<dyn BaseLlm>,
}

impl AppState {
    /// Build the state, creating the configured generation provider.
    pub fn new(config: ServerConfig) -> Result<Arc<Self>, LlmError> {
        let api_key = config
            .get_api_key("openai")
            .map_err(LlmError::InvalidConfiguration)?;
        let llm_config = OpenAIChatConfig::new(api_key).with_model(config.openai_model.clone());
        let llm = create_llm_provider("openai", llm_config)?;
        Ok(Arc::new(Self { config, llm }))
    }

    /// Build the state around an existing provider (used by tests).
    pub fn with_llm(config: ServerConfig, llm: Arc<dyn BaseLlm>) -> Arc<Self> {
        Arc::new(Self { config, llm })
    }
}
