//! OpenRouter provider implementation using the Chat Completions API.
//!
//! One non-streaming `POST {base_url}/chat/completions` per call. The reply is
//! read from `choices[0].message.content`.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::inference::{
    ChatMessage, CompletionProvider, CompletionRequest, ProviderError, normalize_reply,
};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Longest slice of a raw error body that may reach the transcript.
const MAX_BODY_DIAGNOSTIC: usize = 200;

// ============================================================================
// Chat Completions API Types
// ============================================================================

/// The request body for `/chat/completions`
#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// The parts of a completion response we read. Everything is optional so
/// odd-but-valid shapes degrade to the fallback reply instead of failing.
#[derive(Deserialize, Debug, Default)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize, Debug, Default)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize, Debug, Default)]
struct ChoiceMessage {
    /// Usually a string; some models send structured parts, which we don't render.
    #[serde(default)]
    content: Option<serde_json::Value>,
}

/// OpenAI-style error object: `{"error": {"message": "...", "code": 401}}`
#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

// ============================================================================
// Translation Layer
// ============================================================================

impl ChatCompletionResponse {
    /// Text of the first choice, if it is a string.
    fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .and_then(|v| match v {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
    }
}

/// Picks the shortest useful diagnostic for a failed call.
///
/// Preference: the API's own `error.message`, then the status reason phrase,
/// then the raw body (trimmed and truncated).
fn error_diagnostic(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body)
        && let Some(message) = envelope.error.message.filter(|m| !m.trim().is_empty())
    {
        return message;
    }
    if let Some(reason) = status.canonical_reason() {
        return reason.to_string();
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "unknown error".to_string();
    }
    trimmed.chars().take(MAX_BODY_DIAGNOSTIC).collect()
}

/// Reads the numeric `code` of an in-band error object, if there is one.
fn error_code(body: &ApiErrorBody) -> Option<u16> {
    match body.code.as_ref()? {
        serde_json::Value::Number(n) => n.as_u64().and_then(|c| u16::try_from(c).ok()),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Parses a 2xx body. Only a JSON object counts as a completion response;
/// arrays and scalars would otherwise deserialize into an all-default struct.
fn parse_response(text: &str) -> Result<ChatCompletionResponse, ProviderError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ProviderError::Parse(e.to_string()))?;
    if !value.is_object() {
        return Err(ProviderError::Parse(
            "expected a JSON object response body".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(|e| ProviderError::Parse(e.to_string()))
}

fn network_error(e: &reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Network(format!("request timed out: {e}"))
    } else if e.is_connect() {
        ProviderError::Network(format!("connection failed: {e}"))
    } else {
        ProviderError::Network(e.to_string())
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// OpenRouter API provider using Chat Completions
pub struct OpenRouterProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    /// Creates a new OpenRouter provider.
    ///
    /// # Arguments
    /// * `api_key` - OpenRouter API key (not validated; a bad key surfaces as an HTTP 401)
    /// * `base_url` - Optional custom base URL (defaults to OpenRouter's API)
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let body = ChatCompletionRequest {
            model: request.model,
            messages: request.messages,
        };

        info!(
            "OpenRouter chat request: model={}, message_count={}",
            request.model,
            request.messages.len()
        );
        if let Ok(json) = serde_json::to_string(&body) {
            debug!("Raw OpenRouter request: {}", json);
        }

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error(&e))?;

        let status = response.status();
        debug!("OpenRouter response status: {}", status);

        let text = response.text().await.map_err(|e| network_error(&e))?;

        if !status.is_success() {
            warn!("OpenRouter API error: {} - {}", status.as_u16(), text);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: error_diagnostic(status, &text),
            });
        }

        debug!("Raw OpenRouter response: {}", text);
        let parsed = parse_response(&text).inspect_err(|e| {
            warn!("Unparsable OpenRouter response body: {}", e);
        })?;

        if let Some(err) = parsed.error.as_ref() {
            let code = error_code(err).unwrap_or(status.as_u16());
            let message = err
                .message
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "unknown error".to_string());
            warn!("OpenRouter returned an in-band error: {} - {}", code, message);
            return Err(ProviderError::Api {
                status: code,
                message,
            });
        }

        let content = parsed.first_content();
        if content.as_deref().is_none_or(|c| c.trim().is_empty()) {
            warn!("OpenRouter response had no reply content, using fallback");
        }
        Ok(normalize_reply(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{Conversation, build_messages};

    #[test]
    fn test_request_body_serializes_model_and_messages() {
        let mut conv = Conversation::seeded(Some("S"), None);
        conv.push_user("Hello");
        let messages = build_messages(&conv);
        let body = ChatCompletionRequest {
            model: "openai/gpt-3.5-turbo",
            messages: &messages,
        };

        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"model":"openai/gpt-3.5-turbo","messages":[{"role":"system","content":"S"},{"role":"user","content":"Hello"}]}"#
        );
    }

    #[test]
    fn test_first_content_reads_first_choice() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"A"}},{"message":{"content":"B"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.first_content().as_deref(), Some("A"));
    }

    #[test]
    fn test_first_content_tolerates_missing_fields() {
        for json in [
            r#"{}"#,
            r#"{"choices":[]}"#,
            r#"{"choices":[{}]}"#,
            r#"{"choices":[{"message":{}}]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":[{"type":"text"}]}}]}"#,
        ] {
            let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
            assert_eq!(parsed.first_content(), None, "for {json}");
        }
    }

    #[test]
    fn test_parse_response_rejects_non_object_bodies() {
        for body in ["[]", "[[], null]", "null", "42", "\"text\""] {
            assert!(
                matches!(parse_response(body), Err(ProviderError::Parse(_))),
                "for {body}"
            );
        }
        assert!(matches!(
            parse_response("not json"),
            Err(ProviderError::Parse(_))
        ));
        let parsed = parse_response(r#"{"choices":[{"message":{"content":"A"}}]}"#).unwrap();
        assert_eq!(parsed.first_content().as_deref(), Some("A"));
    }

    #[test]
    fn test_error_diagnostic_prefers_api_message() {
        let body = r#"{"error":{"message":"No auth credentials found","code":401}}"#;
        assert_eq!(
            error_diagnostic(StatusCode::UNAUTHORIZED, body),
            "No auth credentials found"
        );
    }

    #[test]
    fn test_error_diagnostic_falls_back_to_reason() {
        assert_eq!(
            error_diagnostic(StatusCode::BAD_GATEWAY, "<html>upstream</html>"),
            "Bad Gateway"
        );
    }

    #[test]
    fn test_error_diagnostic_uses_truncated_body_without_reason() {
        let status = StatusCode::from_u16(599).unwrap();
        let body = "x".repeat(500);
        let diag = error_diagnostic(status, &body);
        assert_eq!(diag.len(), MAX_BODY_DIAGNOSTIC);
        assert_eq!(error_diagnostic(status, "  "), "unknown error");
    }

    #[test]
    fn test_error_code_accepts_number_or_string() {
        let numeric: ApiErrorEnvelope =
            serde_json::from_str(r#"{"error":{"message":"m","code":429}}"#).unwrap();
        assert_eq!(error_code(&numeric.error), Some(429));
        let text: ApiErrorEnvelope =
            serde_json::from_str(r#"{"error":{"message":"m","code":"502"}}"#).unwrap();
        assert_eq!(error_code(&text.error), Some(502));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let provider = OpenRouterProvider::new("k".into(), Some("http://localhost:9/v1/".into()));
        assert_eq!(provider.endpoint(), "http://localhost:9/v1/chat/completions");
        let default = OpenRouterProvider::new("k".into(), None);
        assert_eq!(default.endpoint(), format!("{DEFAULT_BASE_URL}/chat/completions"));
        assert_eq!(default.name(), "openrouter");
    }
}
