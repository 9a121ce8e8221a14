use std::sync::Arc;

use calbot_interaction::{ChatCompletionProvider, ConversationManager, ToolRegistry};

/// Builds fresh conversations that share one provider and one tool registry.
#[derive(Clone)]
pub struct SessionFactory {
    provider: Arc<dyn ChatCompletionProvider>,
    tools: Arc<ToolRegistry>,
    default_timezone: String,
}

impl SessionFactory {
    pub fn new(
        provider: Arc<dyn ChatCompletionProvider>,
        tools: Arc<ToolRegistry>,
        default_timezone: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            tools,
            default_timezone: default_timezone.into(),
        }
    }

    pub fn create(&self) -> ConversationManager {
        ConversationManager::new(
            self.provider.clone(),
            self.tools.clone(),
            self.default_timezone.clone(),
        )
    }
}
