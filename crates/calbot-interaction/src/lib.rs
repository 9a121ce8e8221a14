//! Conversation layer for Calbot.
//!
//! [`ConversationManager`] drives one session: it keeps the message history
//! and the inferred user profile, asks the completion provider for the next
//! assistant turn, and executes requested tools until the model answers in
//! plain text.

pub mod openai_api_agent;
pub mod profile;
pub mod prompt;
pub mod provider;
pub mod tools;

use std::sync::Arc;

use calbot_core::error::{CalbotError, Result};
use calbot_core::session::{ChatMessage, ToolInvocation};
use calbot_core::user::UserProfile;
use chrono::Utc;
use serde_json::Value;

pub use crate::openai_api_agent::OpenAiApiAgent;
pub use crate::provider::ChatCompletionProvider;
pub use crate::tools::{ToolName, ToolRegistry};

/// Per-session conversation state machine.
///
/// A turn moves from awaiting user input, through any number of
/// model-response / tool-execution rounds, back to awaiting user input once
/// the model replies without tool invocations.
///
/// `advance` takes `&mut self`, so one session handles one turn at a time;
/// callers sharing a manager serialize access (see the session store).
pub struct ConversationManager {
    provider: Arc<dyn ChatCompletionProvider>,
    tools: Arc<ToolRegistry>,
    default_timezone: String,
    /// Position 0 is the system message once the first turn has started.
    history: Vec<ChatMessage>,
    profile: UserProfile,
}

impl ConversationManager {
    pub fn new(
        provider: Arc<dyn ChatCompletionProvider>,
        tools: Arc<ToolRegistry>,
        default_timezone: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            tools,
            default_timezone: default_timezone.into(),
            history: Vec::new(),
            profile: UserProfile::new(),
        }
    }

    /// Handles one user message and returns the assistant's final reply.
    ///
    /// # Errors
    ///
    /// Only failures of the completion provider are returned. Tool failures
    /// are fed back to the model as `{"error": ...}` results.
    pub async fn advance(&mut self, user_text: &str) -> Result<String> {
        self.profile.merge(&profile::from_text(user_text));
        self.refresh_system_message()?;
        self.history.push(ChatMessage::user(user_text));

        let mut round = 0usize;
        loop {
            round += 1;
            tracing::debug!(round, history = self.history.len(), "Requesting assistant turn");
            let reply = self
                .provider
                .complete(&self.history, self.tools.definitions())
                .await?;

            let invocations = reply.tool_calls.clone();
            let content = reply.content.clone();
            self.history.push(reply);

            if invocations.is_empty() {
                return Ok(content.unwrap_or_default());
            }

            for invocation in &invocations {
                let result = self.execute(invocation).await;
                self.history
                    .push(ChatMessage::tool_result(invocation.id.clone(), &result));
            }
        }
    }

    /// Drops the history and every learned fact.
    pub fn reset(&mut self) {
        self.history.clear();
        self.profile = UserProfile::new();
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    async fn execute(&mut self, invocation: &ToolInvocation) -> Value {
        let name = invocation.name();
        let arguments = match parse_arguments(&invocation.function.arguments) {
            Ok(arguments) => arguments,
            Err(err) => {
                tracing::warn!(tool = name, "Rejected tool arguments: {}", err);
                return err.to_tool_result();
            }
        };

        self.profile
            .merge(&profile::from_tool_arguments(name, &arguments));

        match self.tools.invoke(name, &arguments).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(tool = name, "Tool call failed: {}", err);
                err.to_tool_result()
            }
        }
    }

    fn refresh_system_message(&mut self) -> Result<()> {
        let content =
            prompt::render_system_prompt(Utc::now(), &self.profile, &self.default_timezone)?;
        match self.history.first_mut() {
            Some(system) => system.content = Some(content),
            None => self.history.push(ChatMessage::system(content)),
        }
        Ok(())
    }
}

/// Decodes the model's JSON-encoded argument string. An empty string means
/// "no arguments".
fn parse_arguments(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(raw).map_err(|e| {
        CalbotError::tool_execution(format!("Tool arguments are not valid JSON: {e}"))
    })
}
