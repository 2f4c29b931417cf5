use std::sync::Arc;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::{
    backend::QueueBackend,
    codec::{json::JsonCodec, JobCodec},
    config::QueueConfig,
    observability::LiveMetrics,
    JobDescriptor, JobId, JobIdGenerator, JobRequest, QueueResult, TimestampIdGenerator,
};

/// What the submitter gets back once a job is durably queued
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    #[serde(rename = "jobId")]
    pub job_id: JobId,
    #[serde(rename = "s3Key")]
    pub object_key: String,
    #[serde(rename = "statusCheckUrl")]
    pub status_check_url: String,
}

/// Appends job descriptors to the shared job queue.
///
/// The dispatcher never writes to the status map: a job has no status record
/// until the worker writes one. A failed push is always returned to the
/// caller as `QueueUnavailable`; nothing is retried here.
pub struct Dispatcher<B: QueueBackend + ?Sized> {
    backend: Arc<B>,
    codec: Arc<dyn JobCodec>,
    ids: Arc<dyn JobIdGenerator>,
    metrics: Arc<LiveMetrics>,
    config: QueueConfig,
}

impl<B: QueueBackend + ?Sized> Clone for Dispatcher<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            codec: Arc::clone(&self.codec),
            ids: Arc::clone(&self.ids),
            metrics: Arc::clone(&self.metrics),
            config: self.config.clone(),
        }
    }
}

impl<B: QueueBackend + ?Sized> Dispatcher<B> {
    pub fn new(backend: Arc<B>, config: QueueConfig) -> Self {
        Self {
            backend,
            codec: Arc::new(JsonCodec),
            ids: Arc::new(TimestampIdGenerator::new()),
            metrics: Arc::new(LiveMetrics::new()),
            config,
        }
    }

    pub fn with_codec(mut self, codec: Arc<dyn JobCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Replace the id source (deterministic ids in tests)
    pub fn with_id_generator(mut self, ids: Arc<dyn JobIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Share a metrics collector with other components
    pub fn with_metrics(mut self, metrics: Arc<LiveMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Mint a fresh job id
    pub fn next_job_id(&self) -> JobId {
        self.ids.generate()
    }

    /// Append one descriptor to the tail of the configured queue.
    ///
    /// Ordering relative to any metadata writes the caller performs is the
    /// caller's responsibility: finish those before dispatching if the worker
    /// needs to see them.
    #[instrument(skip(self, descriptor), fields(job_id = %descriptor.job_id(), queue = %self.config.queue_name))]
    pub async fn dispatch(&self, descriptor: JobDescriptor) -> QueueResult<()> {
        let job_id = descriptor.job_id().as_str();
        let entry = self.codec.encode_descriptor(&descriptor)?;

        match self.backend.push(&self.config.queue_name, entry).await {
            Ok(queue_size) => {
                self.metrics.increment_jobs_dispatched();
                info!("Job {} pushed to queue. Queue size: {}", job_id, queue_size);
                Ok(())
            }
            Err(e) => {
                self.metrics.increment_dispatch_failures();
                error!("Failed to push job {} to queue: {}", job_id, e);
                Err(e.into_queue_unavailable(job_id))
            }
        }
    }

    /// Validate a request, assign it a job id and dispatch it.
    ///
    /// Validation happens before an id is minted or any I/O is attempted.
    #[instrument(skip(self, request), fields(table = %request.table_name, survey = %request.group_id))]
    pub async fn submit(&self, request: JobRequest) -> QueueResult<Submission> {
        request.validate()?;

        let job_id = self.next_job_id();
        let descriptor = request.into_descriptor(job_id.clone())?;
        let object_key = descriptor.object_key().to_string();

        self.dispatch(descriptor).await?;

        Ok(Submission {
            status_check_url: self.config.status_check_url(job_id.as_str()),
            job_id,
            object_key,
        })
    }

    /// Get backend reference
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn metrics(&self) -> &LiveMetrics {
        &self.metrics
    }

    /// Get configuration
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }
}
