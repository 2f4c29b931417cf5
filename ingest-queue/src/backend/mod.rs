pub mod memory;

#[cfg(feature = "redis")]
pub mod redis;

use async_trait::async_trait;

use crate::QueueResult;

/// Storage primitives shared by the dispatcher, the status endpoint and the
/// external worker: an atomic list for the job queue and a hash map for
/// status records.
///
/// Implementations report every storage failure as
/// [`QueueError::Backend`](crate::QueueError::Backend); callers decide whether
/// that is a lost dispatch or a retryable read.
#[async_trait]
pub trait QueueBackend: Send + Sync {
    /// Atomically append `entry` to the tail of list `queue`.
    /// Returns the list length after the append.
    async fn push(&self, queue: &str, entry: String) -> QueueResult<u64>;

    /// Remove and return the head of list `queue` (consumer side)
    async fn pop(&self, queue: &str) -> QueueResult<Option<String>>;

    /// Current length of list `queue`
    async fn len(&self, queue: &str) -> QueueResult<u64>;

    /// All entries of list `queue`, head first, without removing them
    async fn peek_all(&self, queue: &str) -> QueueResult<Vec<String>>;

    /// Read `field` from hash `map`
    async fn hget(&self, map: &str, field: &str) -> QueueResult<Option<String>>;

    /// Write `field` in hash `map`
    async fn hset(&self, map: &str, field: &str, value: String) -> QueueResult<()>;

    /// Reachability probe
    async fn ping(&self) -> QueueResult<()>;
}
