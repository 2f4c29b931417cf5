use std::sync::Arc;
use tracing::instrument;

use crate::{
    backend::QueueBackend,
    observability::LiveMetrics,
    status::StatusStore,
    JobId, QueueError, QueueResult, StatusLookup,
};

/// Answers "what is the status of job X" for polling clients.
///
/// Reads are side-effect free apart from metrics, so it may be called
/// concurrently and as often as clients like.
pub struct StatusEndpoint<B: QueueBackend + ?Sized> {
    store: StatusStore<B>,
    metrics: Arc<LiveMetrics>,
}

impl<B: QueueBackend + ?Sized> Clone for StatusEndpoint<B> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<B: QueueBackend + ?Sized> StatusEndpoint<B> {
    pub fn new(store: StatusStore<B>) -> Self {
        Self {
            store,
            metrics: Arc::new(LiveMetrics::new()),
        }
    }

    /// Share a metrics collector with other components
    pub fn with_metrics(mut self, metrics: Arc<LiveMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// `{ jobId, status }` where a `null` status means "keep waiting"
    #[instrument(skip(self))]
    pub async fn check(&self, job_id: &str) -> QueueResult<StatusLookup> {
        if job_id.trim().is_empty() {
            return Err(QueueError::validation("Job ID is required"));
        }

        self.metrics.increment_status_lookups();
        let status = match self.store.get_status(job_id).await {
            Ok(status) => status,
            Err(e) => {
                if matches!(e, QueueError::CorruptStatus { .. }) {
                    self.metrics.increment_corrupt_statuses();
                }
                return Err(e);
            }
        };

        if status.is_none() {
            self.metrics.increment_status_absent();
        }

        Ok(StatusLookup {
            job_id: JobId::from(job_id),
            status,
        })
    }

    pub fn store(&self) -> &StatusStore<B> {
        &self.store
    }

    pub fn metrics(&self) -> &LiveMetrics {
        &self.metrics
    }
}
