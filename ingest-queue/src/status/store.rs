use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    backend::QueueBackend,
    codec::{json::JsonCodec, JobCodec},
    QueueError, QueueResult, StatusRecord,
};

/// Read-only accessor for the worker-owned status map
pub struct StatusStore<B: QueueBackend + ?Sized> {
    backend: Arc<B>,
    codec: Arc<dyn JobCodec>,
    map_key: String,
}

impl<B: QueueBackend + ?Sized> Clone for StatusStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            codec: Arc::clone(&self.codec),
            map_key: self.map_key.clone(),
        }
    }
}

impl<B: QueueBackend + ?Sized> StatusStore<B> {
    pub fn new(backend: Arc<B>, map_key: impl Into<String>) -> Self {
        Self {
            backend,
            codec: Arc::new(JsonCodec),
            map_key: map_key.into(),
        }
    }

    pub fn with_codec(mut self, codec: Arc<dyn JobCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn map_key(&self) -> &str {
        &self.map_key
    }

    /// One lookup in the status map.
    ///
    /// `Ok(None)` means no record yet: the job is queued but not started, or
    /// the id was never issued. The two cannot be told apart here.
    pub async fn get_status(&self, job_id: &str) -> QueueResult<Option<StatusRecord>> {
        let raw = self
            .backend
            .hget(&self.map_key, job_id)
            .await
            .map_err(QueueError::into_store_unavailable)?;

        let Some(raw) = raw else {
            debug!("No status record for job {}", job_id);
            return Ok(None);
        };

        match self.codec.decode_status(job_id, &raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!("Unreadable status record for job {}: {}", job_id, e);
                Err(e)
            }
        }
    }
}
