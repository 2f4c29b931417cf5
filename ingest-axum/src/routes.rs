use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use ingest_queue::{JobRequest, MetricsSnapshot, StatusLookup};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::storage::upload_basename;
use crate::{ApiError, ErrorKind, IngestState};

/// Multipart field carrying the CSV
pub const FILE_FIELD: &str = "csvfile";
pub const TABLE_NAME_FIELD: &str = "survey_table_name";
pub const SURVEY_ID_FIELD: &str = "surveyId";

pub fn router(state: IngestState, max_upload_bytes: usize) -> Router<()> {
    Router::new()
        .route(
            "/api/addtable",
            post(add_table).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/status/{job_id}", get(job_status))
        .route("/api/status/", get(missing_job_id))
        .route("/api/metrics", get(metrics))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Default)]
struct TableForm {
    file: Option<(Option<String>, Vec<u8>)>,
    table_name: Option<String>,
    survey_id: Option<String>,
}

fn form_error(e: impl std::fmt::Display) -> ApiError {
    ApiError::bad_request(format!("Failed to read multipart form: {e}"))
}

async fn read_form(mut multipart: Multipart) -> Result<TableForm, ApiError> {
    let mut form = TableForm::default();
    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let filename = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(form_error)?;
                form.file = Some((filename, bytes.to_vec()));
            }
            Some(TABLE_NAME_FIELD) => form.table_name = Some(field.text().await.map_err(form_error)?),
            Some(SURVEY_ID_FIELD) => form.survey_id = Some(field.text().await.map_err(form_error)?),
            _ => {}
        }
    }
    Ok(form)
}

/// Record the table, upload the CSV, then queue the ingestion job.
///
/// Metadata is written before dispatch so the worker can rely on it.
#[instrument(skip_all)]
async fn add_table(
    State(state): State<IngestState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let multipart = multipart.map_err(form_error)?;
    let form = read_form(multipart).await?;

    let (filename, bytes) = form.file.ok_or_else(|| ApiError::bad_request("No file uploaded."))?;
    let filename = filename
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ApiError::bad_request("No filename provided."))?;
    upload_basename(&filename).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let table_name = form.table_name.unwrap_or_default();
    let survey_id = form.survey_id.unwrap_or_default();
    if table_name.trim().is_empty() || survey_id.trim().is_empty() {
        return Err(ApiError::bad_request("SurveyId or SurveyTableName is Empty"));
    }

    state.tables.create_table(&table_name, &survey_id).await?;
    let object_key = state.objects.upload(&filename, bytes).await?;

    let submission = state
        .engine
        .dispatcher()
        .submit(JobRequest::new(object_key, table_name, survey_id))
        .await?;

    info!("Job {} queued for {}", submission.job_id, submission.object_key);
    Ok(Json(json!({
        "message": "Survey Table Added Successfully",
        "s3Key": submission.object_key,
        "jobId": submission.job_id,
        "statusCheckUrl": submission.status_check_url,
    })))
}

async fn job_status(
    State(state): State<IngestState>,
    Path(job_id): Path<String>,
) -> Result<Json<StatusLookup>, ApiError> {
    let lookup = state.engine.status_endpoint().check(&job_id).await?;
    Ok(Json(lookup))
}

async fn missing_job_id(State(state): State<IngestState>) -> Result<Json<StatusLookup>, ApiError> {
    let lookup = state.engine.status_endpoint().check("").await?;
    Ok(Json(lookup))
}

async fn metrics(State(state): State<IngestState>) -> Json<MetricsSnapshot> {
    Json(state.engine.metrics().snapshot())
}

async fn health(State(state): State<IngestState>) -> Result<&'static str, ApiError> {
    state.engine.ping().await.map_err(|e| ApiError {
        kind: ErrorKind::Unavailable,
        message: e.to_string(),
    })?;
    Ok("ok")
}
