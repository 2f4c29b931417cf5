use std::sync::Arc;

use axum::http::HeaderName;
use axum::Router;
use ingest_queue::{QueueBackend, QueueConfig, QueueEngine};
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::routes;
use crate::storage::{ObjectStore, TableRegistry};
use crate::IngestState;

/// Default cap on an uploaded CSV
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct IngestApp {
    pub state: IngestState,
    pub router: Router<()>,
}

impl IngestApp {
    pub fn new(state: IngestState) -> Self {
        Self::with_upload_limit(state, DEFAULT_MAX_UPLOAD_BYTES)
    }

    pub fn with_upload_limit(state: IngestState, max_upload_bytes: usize) -> Self {
        let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
        let router = routes::router(state.clone(), max_upload_bytes)
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid));

        Self { state, router }
    }

    /// Serve until ctrl-c
    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;
        Ok(())
    }
}

/// Build the app over any backend and collaborators
pub fn ingest<B>(
    backend: Arc<B>,
    config: QueueConfig,
    objects: Arc<dyn ObjectStore>,
    tables: Arc<dyn TableRegistry>,
) -> IngestApp
where
    B: QueueBackend + 'static,
{
    let backend: Arc<dyn QueueBackend> = backend;
    let engine = QueueEngine::new(backend, config);
    IngestApp::new(IngestState::new(engine, objects, tables))
}
