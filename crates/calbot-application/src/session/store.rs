use calbot_core::Result;
use calbot_interaction::ConversationManager;

use super::cache::SessionCache;
use super::factory::SessionFactory;

/// Keyed collection of independent conversations.
///
/// Sessions are created on first use and dropped on reset. Turns on the
/// same session are serialized; different sessions run in parallel.
pub struct SessionStore {
    cache: SessionCache<ConversationManager>,
    factory: SessionFactory,
}

impl SessionStore {
    pub fn new(factory: SessionFactory) -> Self {
        Self {
            cache: SessionCache::new(),
            factory,
        }
    }

    /// Relays `text` into the session's conversation and returns the reply.
    ///
    /// # Errors
    ///
    /// Propagates completion provider failures from
    /// [`ConversationManager::advance`].
    pub async fn send(&self, session_id: &str, text: &str) -> Result<String> {
        let (session, created) = self
            .cache
            .get_or_insert_with(session_id, || self.factory.create())
            .await;
        if created {
            tracing::info!(session_id, "Created session");
        }

        let mut conversation = session.lock().await;
        conversation.advance(text).await
    }

    /// Drops the session's history and profile. Unknown IDs are not an error.
    pub async fn reset(&self, session_id: &str) {
        if self.cache.remove(session_id).await {
            tracing::info!(session_id, "Reset session");
        } else {
            tracing::debug!(session_id, "Reset requested for unknown session");
        }
    }

    pub async fn session_count(&self) -> usize {
        self.cache.len().await
    }
}
