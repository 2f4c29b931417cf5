use std::sync::Arc;

use anyhow::{Context, Result};
use ingest_axum::storage::{FsObjectStore, MemoryTableRegistry};
use ingest_queue::{QueueBackend, QueueConfig, RedisBackend};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let json_logs = std::env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false);
    ingest_queue::init_tracing(json_logs);

    let config = QueueConfig::from_env().context("loading queue configuration")?;
    let backend = RedisBackend::connect(&config.redis)
        .await
        .with_context(|| format!("connecting to redis at {}:{}", config.redis.host, config.redis.port))?;

    // A failed ping is not fatal; /health keeps reporting it
    match backend.ping().await {
        Ok(()) => info!("Redis is ready"),
        Err(e) => error!("Redis ping failed: {}", e),
    }

    let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());
    let host = std::env::var("HTTP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("HTTP_PORT").unwrap_or_else(|_| "3000".to_string());
    let port: u16 = port
        .parse()
        .with_context(|| format!("HTTP_PORT is not a valid port: {port}"))?;

    info!(
        "Queue '{}', status map '{}', uploads in {}",
        config.queue_name, config.status_map_key, upload_dir
    );

    let app = ingest_axum::ingest(
        Arc::new(backend),
        config,
        Arc::new(FsObjectStore::new(upload_dir)),
        Arc::new(MemoryTableRegistry::new()),
    );

    app.listen((host.as_str(), port)).await
}
