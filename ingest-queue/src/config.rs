use std::env;

use crate::{QueueError, QueueResult};

/// Queue name used by the reference deployment
pub const DEFAULT_QUEUE_NAME: &str = "csv_processing_job";

/// Path the status endpoint is mounted under
pub const DEFAULT_STATUS_PATH_PREFIX: &str = "/api/status";

/// Connection parameters for the shared store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
        }
    }
}

impl RedisConfig {
    /// Read `REDIS_HOST`, `REDIS_PORT` and `REDIS_PASSWORD`
    pub fn from_env() -> QueueResult<Self> {
        let defaults = Self::default();
        let port = match env::var("REDIS_PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| QueueError::Config(format!("REDIS_PORT is not a valid port: {raw}")))?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            host: env::var("REDIS_HOST").unwrap_or(defaults.host),
            port,
            password: env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty()),
        })
    }

    /// `redis://[:password@]host:port/`
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!("redis://:{}@{}:{}/", password, self.host, self.port),
            None => format!("redis://{}:{}/", self.host, self.port),
        }
    }
}

/// Names of the shared queue/status structures plus store connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// List the dispatcher appends descriptors to
    pub queue_name: String,
    /// Hash the worker writes status records into
    pub status_map_key: String,
    /// Prefix for the status check URL handed back on submission
    pub status_path_prefix: String,
    pub redis: RedisConfig,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            queue_name: DEFAULT_QUEUE_NAME.to_string(),
            status_map_key: "job_status".to_string(),
            status_path_prefix: DEFAULT_STATUS_PATH_PREFIX.to_string(),
            redis: RedisConfig::default(),
        }
    }
}

impl QueueConfig {
    /// Load from the environment. `STATUS_HASH_KEY` has no sensible default
    /// because it must match what the worker writes, so it is required.
    pub fn from_env() -> QueueResult<Self> {
        let status_map_key = env::var("STATUS_HASH_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| QueueError::Config("STATUS_HASH_KEY is not configured".to_string()))?;

        Ok(Self {
            queue_name: env::var("JOB_QUEUE_NAME").unwrap_or_else(|_| DEFAULT_QUEUE_NAME.to_string()),
            status_map_key,
            status_path_prefix: env::var("STATUS_PATH_PREFIX")
                .unwrap_or_else(|_| DEFAULT_STATUS_PATH_PREFIX.to_string()),
            redis: RedisConfig::from_env()?,
        })
    }

    pub fn with_queue_name(mut self, name: impl Into<String>) -> Self {
        self.queue_name = name.into();
        self
    }

    pub fn with_status_map_key(mut self, key: impl Into<String>) -> Self {
        self.status_map_key = key.into();
        self
    }

    /// URL a client polls for the given job
    pub fn status_check_url(&self, job_id: &str) -> String {
        format!("{}/{}", self.status_path_prefix.trim_end_matches('/'), job_id)
    }
}
