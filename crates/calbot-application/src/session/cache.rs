use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// In-memory map from session ID to per-session state.
///
/// Entries are wrapped in their own `Mutex`, so work on one session never
/// blocks another; the map lock is only held for lookup and insertion.
pub struct SessionCache<T> {
    sessions: Arc<RwLock<HashMap<String, Arc<Mutex<T>>>>>,
}

impl<T> SessionCache<T> {
    /// Creates a new empty SessionCache.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Gets a cached entry by session ID.
    pub async fn get(&self, session_id: &str) -> Option<Arc<Mutex<T>>> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Returns the entry for `session_id`, creating it with `create` on first use.
    ///
    /// The boolean is `true` when the entry was created by this call.
    pub async fn get_or_insert_with<F>(&self, session_id: &str, create: F) -> (Arc<Mutex<T>>, bool)
    where
        F: FnOnce() -> T,
    {
        if let Some(existing) = self.get(session_id).await {
            return (existing, false);
        }

        let mut sessions = self.sessions.write().await;
        // Another task may have inserted between the read and write locks.
        if let Some(existing) = sessions.get(session_id) {
            return (existing.clone(), false);
        }
        let entry = Arc::new(Mutex::new(create()));
        sessions.insert(session_id.to_string(), entry.clone());
        (entry, true)
    }

    /// Removes an entry. Returns whether one existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl<T> Default for SessionCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_created_once_per_id() {
        let cache: SessionCache<u32> = SessionCache::new();

        let (first, created) = cache.get_or_insert_with("a", || 1).await;
        assert!(created);
        *first.lock().await += 10;

        let (again, created) = cache.get_or_insert_with("a", || 99).await;
        assert!(!created);
        assert_eq!(*again.lock().await, 11);

        cache.get_or_insert_with("b", || 2).await;
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_remove_reports_presence() {
        let cache: SessionCache<u32> = SessionCache::default();
        cache.get_or_insert_with("a", || 1).await;
        cache.get_or_insert_with("b", || 2).await;

        assert!(cache.remove("a").await);
        assert!(!cache.remove("a").await);
        assert!(cache.get("a").await.is_none());

        assert_eq!(cache.len().await, 1);
    }
}
