use std::sync::Arc;

use ingest_queue::{QueueBackend, QueueEngine};

use crate::storage::{ObjectStore, TableRegistry};

/// Shared handler state
pub struct IngestState {
    pub engine: QueueEngine<dyn QueueBackend>,
    pub objects: Arc<dyn ObjectStore>,
    pub tables: Arc<dyn TableRegistry>,
}

impl Clone for IngestState {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            objects: Arc::clone(&self.objects),
            tables: Arc::clone(&self.tables),
        }
    }
}

impl IngestState {
    pub fn new(
        engine: QueueEngine<dyn QueueBackend>,
        objects: Arc<dyn ObjectStore>,
        tables: Arc<dyn TableRegistry>,
    ) -> Self {
        Self {
            engine,
            objects,
            tables,
        }
    }
}
