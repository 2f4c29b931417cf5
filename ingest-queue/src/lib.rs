//! # ingest-queue: asynchronous CSV ingestion jobs
//!
//! Hands CSV ingestion work to an out-of-process worker through a durable
//! queue, and lets anyone poll the worker's progress through a shared
//! status map.
//!
//! - **Job ids**: `job-<millis>-<random>`, minted without coordination
//! - **Dispatch**: one JSON entry appended to the tail of a shared list;
//!   a failed push is always an error, never a fabricated success
//! - **Status**: read-only lookups in a worker-owned hash; "no record yet" is
//!   `null`, not an error, and distinct from a corrupt record
//! - **Backends**: in-memory (tests, development) and Redis (feature `redis`)
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ingest_queue::prelude::*;
//! use ingest_queue::backend::memory::MemoryBackend;
//!
//! # async fn run() -> QueueResult<()> {
//! let engine = QueueEngine::new(Arc::new(MemoryBackend::new()), QueueConfig::default());
//!
//! let submission = engine
//!     .dispatcher()
//!     .submit(JobRequest::new("images/1_data.csv", "Q1", "64ab01"))
//!     .await?;
//!
//! let lookup = engine.status_endpoint().check(submission.job_id.as_str()).await?;
//! assert!(lookup.status.is_none()); // worker has not started yet
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod types;
pub mod error;
pub mod codec;
pub mod backend;
pub mod config;
pub mod dispatcher;
pub mod status;
pub mod observability;

pub use engine::QueueEngine;
pub use types::{
    JobDescriptor, JobId, JobIdGenerator, JobRequest, JobState, StatusLookup, StatusRecord,
    TimestampIdGenerator, JOB_ID_PREFIX,
};
pub use error::{QueueError, QueueResult};
pub use codec::JobCodec;
pub use codec::json::JsonCodec;
pub use backend::QueueBackend;
pub use config::{QueueConfig, RedisConfig, DEFAULT_QUEUE_NAME};
pub use dispatcher::{Dispatcher, Submission};
pub use status::{PollConfig, PollOutcome, StatusEndpoint, StatusPoller, StatusStore};
pub use observability::{LiveMetrics, MetricsSnapshot};

// Backend implementations
#[cfg(feature = "redis")]
pub use backend::redis::RedisBackend;

#[cfg(feature = "tracing-basic")]
pub use observability::init_tracing;

/// Everything needed to submit and poll jobs
pub mod prelude {
    pub use crate::{
        Dispatcher, QueueBackend, QueueEngine, StatusEndpoint, StatusPoller,
    };

    pub use crate::{
        JobDescriptor, JobId, JobRequest, JobState, QueueConfig, QueueError, QueueResult,
        StatusLookup, StatusRecord, Submission,
    };

    pub use crate::{JobCodec, JsonCodec};

    pub use async_trait::async_trait;
}
