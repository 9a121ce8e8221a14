//! OpenAiApiAgent - Chat Completions client with function calling.
//!
//! Talks to `{base_url}/chat/completions` directly over HTTP. Any
//! OpenAI-compatible endpoint works by overriding the base URL.

use async_trait::async_trait;
use calbot_core::config::{DEFAULT_OPENAI_BASE_URL, OpenAiConfig};
use calbot_core::error::{CalbotError, Result};
use calbot_core::session::{ChatMessage, ToolDefinition, ToolInvocation};
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::provider::ChatCompletionProvider;

/// Provider implementation that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAiApiAgent {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiApiAgent {
    /// Creates a new agent with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
        }
    }

    /// Builds an agent from the `openai` section of secret.json.
    pub fn from_config(config: &OpenAiConfig) -> Self {
        Self::new(config.api_key.clone(), config.model()).with_base_url(config.base_url())
    }

    /// Overrides the API root, e.g. for a proxy or a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send_request(&self, body: &ChatCompletionRequest<'_>) -> Result<ChatMessage> {
        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                CalbotError::llm(
                    format!("OpenAI API request failed: {err}"),
                    err.is_connect() || err.is_timeout(),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            CalbotError::llm(format!("Failed to parse OpenAI response: {err}"), false)
        })?;

        extract_assistant_turn(parsed)
    }
}

#[async_trait]
impl ChatCompletionProvider for OpenAiApiAgent {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatMessage> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            tool_choice: (!tools.is_empty()).then_some("auto"),
            tools,
        };

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "Requesting chat completion"
        );
        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolDefinition],
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

fn no_tools(tools: &&[ToolDefinition]) -> bool {
    tools.is_empty()
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    /// Some compatible servers send `null` instead of omitting the field.
    #[serde(default)]
    tool_calls: Option<Vec<ToolInvocation>>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_assistant_turn(response: ChatCompletionResponse) -> Result<ChatMessage> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| CalbotError::llm("OpenAI API returned no choices in the response", false))?;

    Ok(ChatMessage::assistant_with_tools(
        message.content,
        message.tool_calls.unwrap_or_default(),
    ))
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> CalbotError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    if let Some(delay) = retry_after {
        tracing::warn!(
            status = status.as_u16(),
            retry_after_secs = delay.as_secs(),
            "OpenAI API asked to retry later"
        );
    }

    CalbotError::llm_http(status.as_u16(), message, is_retryable)
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    value.parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_http_error_uses_provider_message() {
        let body = json!({ "error": { "message": "Rate limit reached", "type": "requests" } });
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string(), None);
        assert_eq!(
            err,
            CalbotError::Llm {
                status: Some(429),
                message: "Rate limit reached".into(),
                is_retryable: true,
            }
        );
    }

    #[test]
    fn test_map_http_error_keeps_raw_body_when_unparseable() {
        let err = map_http_error(StatusCode::UNAUTHORIZED, "nope".into(), None);
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_parse_retry_after_seconds() {
        let header = HeaderValue::from_static("12");
        assert_eq!(parse_retry_after(Some(&header)), Some(Duration::from_secs(12)));
        let date = HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_retry_after(Some(&date)), None);
    }

    #[test]
    fn test_request_omits_tool_choice_without_tools() {
        let messages = vec![ChatMessage::user("hi")];
        let request = ChatCompletionRequest {
            model: "gpt-4o",
            messages: &messages,
            tools: &[],
            tool_choice: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("tools").is_none());
        assert!(value.get("tool_choice").is_none());
    }

    #[test]
    fn test_null_tool_calls_become_plain_reply() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Hello", "tool_calls": null } }]
        }))
        .unwrap();
        let turn = extract_assistant_turn(response).unwrap();
        assert!(!turn.has_tool_calls());
        assert_eq!(turn.content.as_deref(), Some("Hello"));
    }
}
