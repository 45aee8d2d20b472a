//! In-memory session storage keyed by owner.
//!
//! Sessions live as long as the process; nothing is persisted.

use std::{collections::HashMap, hash::Hash, sync::Arc};

use tokio::sync::Mutex;

#[derive(Debug)]
pub struct SessionStore<K, S> {
    inner: Arc<Mutex<HashMap<K, S>>>,
}

impl<K, S> Clone for SessionStore<K, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, S> Default for SessionStore<K, S> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, S> SessionStore<K, S>
where
    K: Eq + Hash,
    S: Clone,
{
    pub async fn get(&self, key: &K) -> Option<S> {
        let guard = self.inner.lock().await;
        guard.get(key).cloned()
    }

    /// Store `session`, replacing whatever was there.
    pub async fn put(&self, key: K, session: S) {
        let mut guard = self.inner.lock().await;
        guard.insert(key, session);
    }

    pub async fn remove(&self, key: &K) -> Option<S> {
        let mut guard = self.inner.lock().await;
        guard.remove(key)
    }

    /// Run `f` on the slot of `key` while holding the lock. Setting the slot
    /// to `None` removes the session.
    pub async fn update<F, R>(&self, key: K, f: F) -> R
    where
        F: FnOnce(&mut Option<S>) -> R,
    {
        let mut guard = self.inner.lock().await;
        let mut slot = guard.remove(&key);
        let result = f(&mut slot);
        if let Some(session) = slot {
            guard.insert(key, session);
        }
        result
    }
}
