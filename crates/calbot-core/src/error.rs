//! Error types for the Calbot application.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// A shared error type for the entire Calbot application.
///
/// Tool-level variants (`UnknownTimezone` through `ToolExecution`) never
/// escape a conversation turn: the orchestrator renders them with
/// [`CalbotError::to_tool_result`] and feeds them back to the model.
/// Only `Llm` failures propagate out of a turn.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CalbotError {
    /// The timezone identifier is not a known IANA zone
    #[error("Unknown timezone: '{0}'. Use an IANA name like America/Los_Angeles.")]
    UnknownTimezone(String),

    /// A date, time or instant string could not be interpreted
    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),

    /// The scheduling provider answered with a non-2xx status
    #[error("Scheduling provider returned HTTP {status}: {body}")]
    ProviderHttp { status: u16, body: String },

    /// The model named a tool that is not registered
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Any other failure while preparing or running a tool call
    #[error("Tool execution failed: {0}")]
    ToolExecution(String),

    /// The LLM completion provider call failed
    #[error("LLM provider error{}: {message}", status_suffix(.status))]
    Llm {
        status: Option<u16>,
        message: String,
        is_retryable: bool,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CalbotError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an UnknownTimezone error
    pub fn unknown_timezone(timezone: impl Into<String>) -> Self {
        Self::UnknownTimezone(timezone.into())
    }

    /// Creates an InvalidDateTime error
    pub fn invalid_datetime(message: impl Into<String>) -> Self {
        Self::InvalidDateTime(message.into())
    }

    /// Creates a ProviderHttp error
    pub fn provider_http(status: u16, body: impl Into<String>) -> Self {
        Self::ProviderHttp {
            status,
            body: body.into(),
        }
    }

    /// Creates a ToolExecution error
    pub fn tool_execution(message: impl Into<String>) -> Self {
        Self::ToolExecution(message.into())
    }

    /// Creates an Llm error that is not tied to an HTTP status
    pub fn llm(message: impl Into<String>, is_retryable: bool) -> Self {
        Self::Llm {
            status: None,
            message: message.into(),
            is_retryable,
        }
    }

    /// Creates an Llm error for a non-2xx provider response
    pub fn llm_http(status: u16, message: impl Into<String>, is_retryable: bool) -> Self {
        Self::Llm {
            status: Some(status),
            message: message.into(),
            is_retryable,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error came from the LLM provider call
    pub fn is_llm(&self) -> bool {
        matches!(self, Self::Llm { .. })
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Llm { is_retryable, .. } => *is_retryable,
            Self::ProviderHttp { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Renders this error as the `{"error": ...}` mapping handed back to the model.
    ///
    /// Provider bodies that are valid JSON are embedded as structured values so
    /// the model sees the provider's own explanation rather than a status line.
    pub fn to_tool_result(&self) -> Value {
        match self {
            Self::ProviderHttp { body, .. } => {
                let detail = serde_json::from_str::<Value>(body)
                    .unwrap_or_else(|_| Value::String(body.clone()));
                json!({ "error": detail })
            }
            other => json!({ "error": other.to_string() }),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// A type alias for `Result<T, CalbotError>`.
pub type Result<T> = std::result::Result<T, CalbotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_json_body_is_embedded_structurally() {
        let err = CalbotError::provider_http(400, r#"{"status":"error","message":"slot taken"}"#);
        let result = err.to_tool_result();
        assert_eq!(result["error"]["message"], "slot taken");
        assert_eq!(result["error"]["status"], "error");
    }

    #[test]
    fn test_provider_text_body_falls_back_to_string() {
        let err = CalbotError::provider_http(502, "Bad Gateway");
        assert_eq!(err.to_tool_result(), json!({ "error": "Bad Gateway" }));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_other_errors_use_display_text() {
        let err = CalbotError::UnknownTool("teleport".into());
        assert_eq!(err.to_tool_result(), json!({ "error": "Unknown tool: teleport" }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_llm_display_includes_status_when_present() {
        let err = CalbotError::Llm {
            status: Some(429),
            message: "rate limited".into(),
            is_retryable: true,
        };
        assert_eq!(err.to_string(), "LLM provider error (HTTP 429): rate limited");
        assert_eq!(
            CalbotError::llm("connection reset", true).to_string(),
            "LLM provider error: connection reset"
        );
    }
}
