//! ingest-axum: HTTP surface for CSV ingestion jobs.
//!
//! - `POST /api/addtable` records the table, uploads the CSV and queues the
//!   ingestion job
//! - `GET /api/status/{job_id}` returns the worker's latest status record, or
//!   `null` while the job has not started

pub mod app;
pub mod routes;
pub mod state;
pub mod storage;
mod error;
pub use error::{ApiError, ErrorKind};
pub use state::IngestState;

pub use app::{ingest, IngestApp};
