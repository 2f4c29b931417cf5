use std::sync::Arc;

use crate::{
    backend::QueueBackend,
    codec::{json::JsonCodec, JobCodec},
    config::QueueConfig,
    dispatcher::Dispatcher,
    observability::LiveMetrics,
    status::{StatusEndpoint, StatusPoller, StatusStore},
    QueueResult,
};

/// Wires a dispatcher and a status endpoint over one shared backend, codec
/// and metrics collector.
pub struct QueueEngine<B: QueueBackend + ?Sized> {
    backend: Arc<B>,
    codec: Arc<dyn JobCodec>,
    metrics: Arc<LiveMetrics>,
    config: QueueConfig,
}

impl<B: QueueBackend + ?Sized> Clone for QueueEngine<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            codec: Arc::clone(&self.codec),
            metrics: Arc::clone(&self.metrics),
            config: self.config.clone(),
        }
    }
}

impl<B: QueueBackend + ?Sized> QueueEngine<B> {
    pub fn new(backend: Arc<B>, config: QueueConfig) -> Self {
        Self {
            backend,
            codec: Arc::new(JsonCodec),
            metrics: Arc::new(LiveMetrics::new()),
            config,
        }
    }

    pub fn with_codec(mut self, codec: Arc<dyn JobCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn dispatcher(&self) -> Dispatcher<B> {
        Dispatcher::new(Arc::clone(&self.backend), self.config.clone())
            .with_codec(Arc::clone(&self.codec))
            .with_metrics(Arc::clone(&self.metrics))
    }

    pub fn status_endpoint(&self) -> StatusEndpoint<B> {
        let store = StatusStore::new(Arc::clone(&self.backend), self.config.status_map_key.clone())
            .with_codec(Arc::clone(&self.codec));
        StatusEndpoint::new(store).with_metrics(Arc::clone(&self.metrics))
    }

    pub fn poller(&self) -> StatusPoller<B> {
        StatusPoller::new(self.status_endpoint())
    }

    /// Check the backend is reachable
    pub async fn ping(&self) -> QueueResult<()> {
        self.backend.ping().await
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::JobRequest;

    #[tokio::test]
    async fn components_share_metrics() {
        let engine = QueueEngine::new(Arc::new(MemoryBackend::new()), QueueConfig::default());

        let submission = engine
            .dispatcher()
            .submit(JobRequest::new("k", "T", "s"))
            .await
            .unwrap();
        engine
            .status_endpoint()
            .check(submission.job_id.as_str())
            .await
            .unwrap();

        let snap = engine.metrics().snapshot();
        assert_eq!(snap.jobs_dispatched, 1);
        assert_eq!(snap.status_lookups, 1);
        assert_eq!(snap.status_absent, 1);
    }
}
