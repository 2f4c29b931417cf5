use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ingest_queue::QueueError;
use serde_json::json;

/// Feathers-ish error classes used in JSON error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,   // 400
    GeneralError, // 500
    Unavailable,  // 503
}

impl ErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::GeneralError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::GeneralError => "GeneralError",
            ErrorKind::Unavailable => "Unavailable",
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::GeneralError => "general-error",
            ErrorKind::Unavailable => "unavailable",
        }
    }
}

/// Error returned by every handler; rendered as
/// `{ name, message, code, className }`
#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::BadRequest,
            message: message.into(),
        }
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::GeneralError,
            message: message.into(),
        }
    }
}

impl From<QueueError> for ApiError {
    fn from(e: QueueError) -> Self {
        let kind = match &e {
            QueueError::Validation(_) => ErrorKind::BadRequest,
            QueueError::QueueUnavailable { .. } | QueueError::StoreUnavailable(_) => {
                ErrorKind::Unavailable
            }
            _ => ErrorKind::GeneralError,
        };
        Self {
            kind,
            message: e.to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        // Queue errors keep their class even when wrapped in context
        if let Some(queue) = e.chain().find_map(|c| c.downcast_ref::<QueueError>()) {
            return queue.clone().into();
        }
        Self::general(format!("{e:#}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        let body = json!({
            "name": self.kind.name(),
            "message": self.message,
            "code": status.as_u16(),
            "className": self.kind.class_name(),
        });
        (status, Json(body)).into_response()
    }
}
