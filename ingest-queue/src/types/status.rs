use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::JobId;

/// Worker-owned progress record stored under the job id.
///
/// `status` is the worker's own vocabulary and is kept verbatim; use
/// [`StatusRecord::state`] to normalize it at the edge. Fields other than
/// `status`/`message` (e.g. `duration`, `timestamp`) are carried through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatusRecord {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: None,
            extra: Map::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn state(&self) -> JobState {
        JobState::normalize(&self.status)
    }
}

/// Response of the status endpoint: `{ "jobId", "status": record | null }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLookup {
    #[serde(rename = "jobId")]
    pub job_id: JobId,
    pub status: Option<StatusRecord>,
}

impl StatusLookup {
    /// Normalized state; a missing record means the job is still waiting
    pub fn state(&self) -> JobState {
        self.status
            .as_ref()
            .map(StatusRecord::state)
            .unwrap_or(JobState::Pending)
    }
}

/// Client-side view of a job's lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
    /// Worker vocabulary we do not recognize
    Other(String),
}

impl JobState {
    /// Map worker status strings onto the client lifecycle, case-insensitively
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" | "QUEUED" => Self::Pending,
            "PROCESSING" | "RUNNING" => Self::Processing,
            "COMPLETED" | "SUCCESS" => Self::Completed,
            "FAILED" | "ERROR" | "FAILURE" => Self::Failed,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// No further status changes are expected after a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Processing => write!(f, "PROCESSING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
            Self::Other(raw) => write!(f, "{raw}"),
        }
    }
}
