use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use crate::{backend::QueueBackend, config::RedisConfig, QueueResult};

/// Redis-backed store: the job queue is a Redis list (`RPUSH`/`LPOP`) and
/// status records live in a Redis hash (`HSET`/`HGET`).
///
/// `ConnectionManager` reconnects on its own; a command issued while the
/// server is down fails and surfaces as `QueueError::Backend`.
#[derive(Clone)]
pub struct RedisBackend {
    manager: ConnectionManager,
}

impl RedisBackend {
    /// Connect using host/port/password settings
    pub async fn connect(config: &RedisConfig) -> QueueResult<Self> {
        Self::from_url(&config.url()).await
    }

    pub async fn from_url(url: &str) -> QueueResult<Self> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        info!("Redis connection manager ready");
        Ok(Self { manager })
    }

    fn conn(&self) -> ConnectionManager {
        self.manager.clone()
    }
}

#[async_trait]
impl QueueBackend for RedisBackend {
    async fn push(&self, queue: &str, entry: String) -> QueueResult<u64> {
        let len: u64 = self.conn().rpush(queue, entry).await?;
        Ok(len)
    }

    async fn pop(&self, queue: &str) -> QueueResult<Option<String>> {
        let entry: Option<String> = self.conn().lpop(queue, None).await?;
        Ok(entry)
    }

    async fn len(&self, queue: &str) -> QueueResult<u64> {
        let len: u64 = self.conn().llen(queue).await?;
        Ok(len)
    }

    async fn peek_all(&self, queue: &str) -> QueueResult<Vec<String>> {
        let entries: Vec<String> = self.conn().lrange(queue, 0, -1).await?;
        Ok(entries)
    }

    async fn hget(&self, map: &str, field: &str) -> QueueResult<Option<String>> {
        let value: Option<String> = self.conn().hget(map, field).await?;
        Ok(value)
    }

    async fn hset(&self, map: &str, field: &str, value: String) -> QueueResult<()> {
        let _: () = self.conn().hset(map, field, value).await?;
        Ok(())
    }

    async fn ping(&self) -> QueueResult<()> {
        let mut conn = self.conn();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
