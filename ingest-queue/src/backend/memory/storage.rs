use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{backend::QueueBackend, QueueError, QueueResult};

// Type aliases to reduce complexity
type Lists = HashMap<String, VecDeque<String>>;
type Hashes = HashMap<String, HashMap<String, String>>;

/// In-memory backend for testing and development.
///
/// Clones share the same storage, so one clone can play the external worker
/// while another is handed to the dispatcher.
#[derive(Clone)]
pub struct MemoryBackend {
    /// Lists keyed by queue name
    lists: Arc<RwLock<Lists>>,

    /// Hash maps keyed by map name, then field
    hashes: Arc<RwLock<Hashes>>,

    /// When false every operation fails as if the store were unreachable
    available: Arc<AtomicBool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            lists: Arc::new(RwLock::new(HashMap::new())),
            hashes: Arc::new(RwLock::new(HashMap::new())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Simulate the store going down or coming back (for testing)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Write a raw status value, bypassing any encoding (for testing)
    pub fn put_raw(&self, map: &str, field: &str, value: impl Into<String>) {
        self.hashes
            .write()
            .entry(map.to_string())
            .or_default()
            .insert(field.to_string(), value.into());
    }

    fn check_available(&self) -> QueueResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(QueueError::Backend("memory backend is unavailable".to_string()))
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueueBackend for MemoryBackend {
    async fn push(&self, queue: &str, entry: String) -> QueueResult<u64> {
        self.check_available()?;
        let mut lists = self.lists.write();
        let list = lists.entry(queue.to_string()).or_default();
        list.push_back(entry);
        Ok(list.len() as u64)
    }

    async fn pop(&self, queue: &str) -> QueueResult<Option<String>> {
        self.check_available()?;
        let mut lists = self.lists.write();
        Ok(lists.get_mut(queue).and_then(VecDeque::pop_front))
    }

    async fn len(&self, queue: &str) -> QueueResult<u64> {
        self.check_available()?;
        let lists = self.lists.read();
        Ok(lists.get(queue).map(|l| l.len() as u64).unwrap_or(0))
    }

    async fn peek_all(&self, queue: &str) -> QueueResult<Vec<String>> {
        self.check_available()?;
        let lists = self.lists.read();
        Ok(lists
            .get(queue)
            .map(|l| l.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn hget(&self, map: &str, field: &str) -> QueueResult<Option<String>> {
        self.check_available()?;
        let hashes = self.hashes.read();
        Ok(hashes.get(map).and_then(|h| h.get(field)).cloned())
    }

    async fn hset(&self, map: &str, field: &str, value: String) -> QueueResult<()> {
        self.check_available()?;
        self.put_raw(map, field, value);
        Ok(())
    }

    async fn ping(&self) -> QueueResult<()> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_are_fifo() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.push("q", "a".into()).await.unwrap(), 1);
        assert_eq!(backend.push("q", "b".into()).await.unwrap(), 2);

        assert_eq!(backend.peek_all("q").await.unwrap(), vec!["a", "b"]);
        assert_eq!(backend.pop("q").await.unwrap().as_deref(), Some("a"));
        assert_eq!(backend.len("q").await.unwrap(), 1);
        assert_eq!(backend.pop("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn hashes_are_keyed_by_map_and_field() {
        let backend = MemoryBackend::new();
        backend.hset("m", "f", "v".into()).await.unwrap();

        assert_eq!(backend.hget("m", "f").await.unwrap().as_deref(), Some("v"));
        assert_eq!(backend.hget("m", "g").await.unwrap(), None);
        assert_eq!(backend.hget("n", "f").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unavailable_backend_fails_every_call() {
        let backend = MemoryBackend::new();
        let clone = backend.clone();
        clone.set_available(false);

        assert!(matches!(backend.push("q", "a".into()).await, Err(QueueError::Backend(_))));
        assert!(matches!(backend.hget("m", "f").await, Err(QueueError::Backend(_))));
        assert!(backend.ping().await.is_err());

        clone.set_available(true);
        assert!(backend.ping().await.is_ok());
        assert_eq!(backend.len("q").await.unwrap(), 0);
    }
}
