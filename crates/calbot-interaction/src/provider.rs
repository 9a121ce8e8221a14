//! Chat completion provider abstraction.

use async_trait::async_trait;
use calbot_core::Result;
use calbot_core::session::{ChatMessage, ToolDefinition};

/// An LLM endpoint that answers a conversation with one assistant turn.
///
/// The returned message has the assistant role and may carry tool
/// invocations; the caller decides what to do with them. Failures are
/// reported as [`CalbotError::Llm`](calbot_core::CalbotError::Llm).
#[async_trait]
pub trait ChatCompletionProvider: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatMessage>;
}
