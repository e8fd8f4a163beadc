//! Twilio call bootstrap endpoint.
//!
//! `POST /start_call` returns the TwiML document that tells Twilio to
//! open a ConversationRelay WebSocket back to this server for the rest
//! of the call.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Handler for POST /start_call - returns the ConversationRelay TwiML.
pub async fn start_call(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let ws_url = state
        .config
        .relay_websocket_url()
        .map_err(AppError::Config)?;
    let greeting = xml_escape(&state.config.welcome_greeting);

    let twiml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
  <Connect>
    <ConversationRelay url="{ws_url}" welcomeGreeting="{greeting}"></ConversationRelay>
  </Connect>
</Response>
"#
    );

    Ok(([(header::CONTENT_TYPE, "application/xml")], twiml).into_response())
}

/// Escape a string for use inside an XML attribute value.
fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_escape_passthrough() {
        assert_eq!(xml_escape("Hi! Just chat with me."), "Hi! Just chat with me.");
    }

    #[test]
    fn test_xml_escape_special_characters() {
        assert_eq!(
            xml_escape(r#"Hello "you" & <world>"#),
            "Hello &quot;you&quot; &amp; &lt;world&gt;"
        );
    }
}
