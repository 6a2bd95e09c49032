use async_trait::async_trait;
use thiserror::Error;

use super::request::ChatMessage;

/// Reply shown when the endpoint succeeds but returns no usable content.
pub const FALLBACK_REPLY: &str = "Sorry, no reply from AI.";

/// Errors that can occur while completing a request.
///
/// The `Display` form is what ends up in the transcript, so every variant
/// renders as a short diagnostic rather than a raw response body.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Network-level failure (timeout, DNS, connection refused, bad header value).
    #[error("network error: {0}")]
    Network(String),
    /// API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    /// The response body could not be understood.
    #[error("parse error: {0}")]
    Parse(String),
    /// The request task ended without producing an outcome.
    #[error("request aborted: {0}")]
    Aborted(String),
}

/// Everything a provider needs to fulfill a completion request.
pub struct CompletionRequest<'a> {
    pub messages: &'a [ChatMessage],
    pub model: &'a str,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Sends one request and returns the reply text.
    ///
    /// A successful call with no usable content yields [`FALLBACK_REPLY`],
    /// not an error.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError>;
}

/// Collapses an absent or blank reply to [`FALLBACK_REPLY`].
pub fn normalize_reply(content: Option<String>) -> String {
    match content {
        Some(text) if !text.trim().is_empty() => text,
        _ => FALLBACK_REPLY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_reply_keeps_content() {
        assert_eq!(normalize_reply(Some("React, Node.js".into())), "React, Node.js");
    }

    #[test]
    fn test_normalize_reply_absent_or_blank() {
        assert_eq!(normalize_reply(None), FALLBACK_REPLY);
        assert_eq!(normalize_reply(Some(String::new())), FALLBACK_REPLY);
        assert_eq!(normalize_reply(Some(" \n ".into())), FALLBACK_REPLY);
    }

    #[test]
    fn test_error_display_is_short() {
        let err = ProviderError::Api {
            status: 401,
            message: "No auth credentials found".into(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 401): No auth credentials found");
        assert_eq!(
            ProviderError::Network("network timeout".into()).to_string(),
            "network error: network timeout"
        );
    }
}
