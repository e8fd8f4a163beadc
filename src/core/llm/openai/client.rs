//! OpenAI chat-completions streaming client.

use async_stream::try_stream;
use async_trait::async_trait;
use bytes::BytesMut;
use futures_util::StreamExt;
use tracing::debug;

use super::config::OpenAIChatConfig;
use super::messages::{ChatCompletionChunk, ChatCompletionRequest, OpenAIErrorResponse};
use crate::core::llm::base::{BaseLlm, ChatMessage, LlmError, LlmResult, TokenStream};

/// Streaming client for the OpenAI chat-completions API.
///
/// Sends `stream: true` requests and exposes the SSE response as a
/// [`TokenStream`] of text deltas.
#[derive(Debug, Clone)]
pub struct OpenAIChat {
    config: OpenAIChatConfig,
    client: reqwest::Client,
}

impl OpenAIChat {
    pub fn new(config: OpenAIChatConfig) -> LlmResult<Self> {
        config.validate().map_err(LlmError::InvalidConfiguration)?;
        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    pub fn config(&self) -> &OpenAIChatConfig {
        &self.config
    }
}

/// Extract the payload of an SSE `data:` line, if the line carries one.
pub(crate) fn sse_data(line: &str) -> Option<&str> {
    line.strip_prefix("data:")
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
}

#[async_trait]
impl BaseLlm for OpenAIChat {
    fn provider_name(&self) -> &'static str {
        "openai"
    }

    async fn chat_stream(
        &self,
        messages: Vec<ChatMessage>,
        max_tokens: u32,
    ) -> LlmResult<TokenStream> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens,
            stream: true,
        };

        let response = self
            .client
            .post(self.config.api_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAIErrorResponse>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api { status, message });
        }

        let mut body = response.bytes_stream();
        let stream = try_stream! {
            // SSE lines are newline-delimited; a network chunk may end
            // mid-line, so buffer until a full line is available.
            let mut buf = BytesMut::new();
            'read: while let Some(chunk) = body.next().await {
                let chunk = chunk?;
                buf.extend_from_slice(&chunk);
                while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
                    let line = buf.split_to(pos + 1);
                    let line = String::from_utf8_lossy(&line);
                    let line = line.trim_end();
                    let Some(data) = sse_data(line) else { continue };
                    if data == "[DONE]" {
                        break 'read;
                    }
                    match serde_json::from_str::<ChatCompletionChunk>(data) {
                        Ok(parsed) => {
                            if let Some(content) = parsed.delta_content() {
                                yield content.to_string();
                            }
                        }
                        Err(e) => debug!(data, error = %e, "skipping unparseable stream chunk"),
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
