use thiserror::Error;

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Errors raised by the dispatch and status-tracking core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// A required field was missing or empty; rejected before any I/O
    #[error("Validation error: {0}")]
    Validation(String),

    /// The push to the job queue could not be completed
    #[error("Job queue unavailable, job {job_id} was not queued: {reason}")]
    QueueUnavailable { job_id: String, reason: String },

    /// The stored status value for a job could not be parsed
    #[error("Corrupt status record for job {job_id}: {reason}")]
    CorruptStatus { job_id: String, reason: String },

    /// The status store could not be reached; poll again later
    #[error("Status store unavailable: {0}")]
    StoreUnavailable(String),

    /// Raw backend failure, before it is classified by the read or write path
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueueError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether a poller may simply retry the same call later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Classify a failure on the write path
    pub(crate) fn into_queue_unavailable(self, job_id: &str) -> Self {
        match self {
            Self::Backend(reason) => Self::QueueUnavailable {
                job_id: job_id.to_string(),
                reason,
            },
            other => other,
        }
    }

    /// Classify a failure on the read path
    pub(crate) fn into_store_unavailable(self) -> Self {
        match self {
            Self::Backend(reason) => Self::StoreUnavailable(reason),
            other => other,
        }
    }
}

impl From<serde_json::Error> for QueueError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for QueueError {
    fn from(err: redis::RedisError) -> Self {
        Self::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_store_unavailable_is_retryable() {
        assert!(QueueError::StoreUnavailable("down".into()).is_retryable());
        assert!(!QueueError::validation("empty").is_retryable());
        assert!(!QueueError::QueueUnavailable {
            job_id: "job-1".into(),
            reason: "down".into()
        }
        .is_retryable());
        assert!(!QueueError::CorruptStatus {
            job_id: "job-1".into(),
            reason: "eof".into()
        }
        .is_retryable());
    }

    #[test]
    fn backend_errors_are_classified_by_path() {
        let write = QueueError::Backend("refused".into()).into_queue_unavailable("job-7");
        assert_eq!(
            write,
            QueueError::QueueUnavailable {
                job_id: "job-7".into(),
                reason: "refused".into()
            }
        );

        let read = QueueError::Backend("refused".into()).into_store_unavailable();
        assert_eq!(read, QueueError::StoreUnavailable("refused".into()));

        let untouched = QueueError::validation("x").into_store_unavailable();
        assert_eq!(untouched, QueueError::Validation("x".into()));
    }
}
