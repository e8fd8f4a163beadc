//! Configuration module for the relay gateway.
//!
//! Configuration comes from environment variables, with `.env` support
//! (the `.env` file is loaded in `main` before this module runs).
//! Priority: actual ENV vars > .env values > defaults.

use std::env;

use url::Url;

use crate::core::llm::DEFAULT_CHAT_MODEL;

/// Default cap on generated tokens per reply.
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 2048;

/// Default assistant persona seeded into every conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, respectful and honest assistant. You can hear and speak. You are chatting with a user over voice. Your voice and personality should be warm and engaging, with a lively and playful tone, full of charm and energy. The content of your responses should be conversational, nonjudgmental, and friendly.

Always answer as helpfully as possible, while being safe. Your answers should not include any harmful, unethical, racist, sexist, toxic, dangerous, or illegal content. Please ensure that your responses are socially unbiased and positive in nature.

If a question does not make any sense, or is not factually coherent, explain why instead of answering something not correct. If you don't know the answer to a question, please don't share false information.";

/// Default greeting Twilio speaks when a call connects.
pub const DEFAULT_WELCOME_GREETING: &str = "Hi! I'm your voice assistant. Just start talking to me!";

/// Server configuration
///
/// Contains all configuration needed to run the relay gateway:
/// - Server settings (host, port)
/// - Public deployment URL used to build the ConversationRelay callback
/// - Provider API keys (OpenAI)
/// - Session settings (persona, greeting, generation limits)
/// - Security settings (CORS)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Public URL this deployment is reachable at; the TwiML endpoint
    /// derives the `wss://` callback from its host
    pub public_url: Option<String>,

    /// OpenAI API key for chat completions
    pub openai_api_key: Option<String>,
    /// Chat model used for replies
    pub openai_model: String,

    /// System persona seeded into every session's history
    pub system_prompt: String,
    /// Greeting Twilio speaks when the call connects
    pub welcome_greeting: String,
    /// Cap on generated tokens per reply
    pub max_new_tokens: u32,

    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,
}

/// Zeroize secret fields when ServerConfig is dropped so API keys do
/// not linger in memory after use.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.openai_api_key {
            key.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse()
                .map_err(|e| format!("Invalid PORT value '{value}': {e}"))?,
            Err(_) => 3000,
        };
        let max_new_tokens = match env::var("MAX_NEW_TOKENS") {
            Ok(value) => value
                .parse()
                .map_err(|e| format!("Invalid MAX_NEW_TOKENS value '{value}': {e}"))?,
            Err(_) => DEFAULT_MAX_NEW_TOKENS,
        };

        Ok(Self {
            host,
            port,
            public_url: env::var("PUBLIC_URL").ok().filter(|v| !v.is_empty()),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|v| !v.is_empty()),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
            system_prompt: env::var("SYSTEM_PROMPT")
                .unwrap_or_else(|_| DEFAULT_SYSTEM_PROMPT.to_string()),
            welcome_greeting: env::var("WELCOME_GREETING")
                .unwrap_or_else(|_| DEFAULT_WELCOME_GREETING.to_string()),
            max_new_tokens,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok(),
        })
    }

    /// Get the server address as a string in the format "host:port".
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get API key for a specific provider
    ///
    /// # Arguments
    /// * `provider` - The name of the provider (e.g., "openai")
    pub fn get_api_key(&self, provider: &str) -> Result<String, String> {
        match provider.to_lowercase().as_str() {
            "openai" => self.openai_api_key.as_ref().cloned().ok_or_else(|| {
                "OpenAI API key not configured in server environment".to_string()
            }),
            _ => Err(format!("Unsupported provider: {provider}")),
        }
    }

    /// Derive the ConversationRelay WebSocket URL from the public URL.
    ///
    /// Accepts either a bare authority ("relay.example.com") or a full
    /// URL; a full URL is reduced to its host, matching what Twilio
    /// expects in the `<ConversationRelay url>` attribute.
    pub fn relay_websocket_url(&self) -> Result<String, String> {
        let public = self
            .public_url
            .as_deref()
            .ok_or_else(|| "PUBLIC_URL not configured".to_string())?;

        let authority = if public.starts_with("http://") || public.starts_with("https://") {
            let parsed =
                Url::parse(public).map_err(|e| format!("Invalid PUBLIC_URL '{public}': {e}"))?;
            let host = parsed
                .host_str()
                .ok_or_else(|| format!("PUBLIC_URL '{public}' has no host"))?;
            match parsed.port() {
                Some(port) => format!("{host}:{port}"),
                None => host.to_string(),
            }
        } else {
            public.trim_end_matches('/').to_string()
        };

        Ok(format!("wss://{authority}/chat/ws"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper function to create a test ServerConfig with defaults.
    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "localhost".to_string(),
            port: 3000,
            public_url: None,
            openai_api_key: None,
            openai_model: DEFAULT_CHAT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            welcome_greeting: DEFAULT_WELCOME_GREETING.to_string(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            cors_allowed_origins: None,
        }
    }

    fn clear_env() {
        for key in [
            "HOST",
            "PORT",
            "PUBLIC_URL",
            "OPENAI_API_KEY",
            "OPENAI_MODEL",
            "SYSTEM_PROMPT",
            "WELCOME_GREETING",
            "MAX_NEW_TOKENS",
            "CORS_ALLOWED_ORIGINS",
        ] {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    fn test_address() {
        let config = test_config();
        assert_eq!(config.address(), "localhost:3000");
    }

    #[test]
    fn test_get_api_key_openai_success() {
        let mut config = test_config();
        config.openai_api_key = Some("sk-test-key".to_string());

        let result = config.get_api_key("openai");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "sk-test-key");
    }

    #[test]
    fn test_get_api_key_openai_missing() {
        let config = test_config();
        let result = config.get_api_key("openai");
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err(),
            "OpenAI API key not configured in server environment"
        );
    }

    #[test]
    fn test_get_api_key_case_insensitive() {
        let mut config = test_config();
        config.openai_api_key = Some("sk-test-key".to_string());

        assert_eq!(config.get_api_key("OPENAI").unwrap(), "sk-test-key");
        assert_eq!(config.get_api_key("OpenAI").unwrap(), "sk-test-key");
    }

    #[test]
    fn test_get_api_key_unsupported_provider() {
        let config = test_config();
        let result = config.get_api_key("unsupported_provider");
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err(),
            "Unsupported provider: unsupported_provider"
        );
    }

    #[test]
    fn test_relay_websocket_url_from_https_url() {
        let mut config = test_config();
        config.public_url = Some("https://relay.example.com/some/path".to_string());
        assert_eq!(
            config.relay_websocket_url().unwrap(),
            "wss://relay.example.com/chat/ws"
        );
    }

    #[test]
    fn test_relay_websocket_url_keeps_explicit_port() {
        let mut config = test_config();
        config.public_url = Some("http://relay.example.com:8443".to_string());
        assert_eq!(
            config.relay_websocket_url().unwrap(),
            "wss://relay.example.com:8443/chat/ws"
        );
    }

    #[test]
    fn test_relay_websocket_url_from_bare_host() {
        let mut config = test_config();
        config.public_url = Some("relay.example.com".to_string());
        assert_eq!(
            config.relay_websocket_url().unwrap(),
            "wss://relay.example.com/chat/ws"
        );
    }

    #[test]
    fn test_relay_websocket_url_missing() {
        let config = test_config();
        let result = config.relay_websocket_url();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("PUBLIC_URL"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.openai_model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.max_new_tokens, DEFAULT_MAX_NEW_TOKENS);
        assert!(config.public_url.is_none());
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        unsafe {
            env::set_var("HOST", "127.0.0.1");
            env::set_var("PORT", "8080");
            env::set_var("OPENAI_API_KEY", "sk-env-key");
            env::set_var("OPENAI_MODEL", "gpt-4o-mini");
            env::set_var("MAX_NEW_TOKENS", "512");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-env-key"));
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.max_new_tokens, 512);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_port() {
        clear_env();
        unsafe { env::set_var("PORT", "not-a-port") };

        let result = ServerConfig::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("PORT"));

        clear_env();
    }
}
