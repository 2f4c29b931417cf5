use serde::{Deserialize, Serialize};

use super::JobId;
use crate::{QueueError, QueueResult};

/// Unit of work handed to the external ingestion worker.
///
/// Serialized as one JSON object per queue entry:
/// `{ "jobId", "s3key", "tablename", "surveyId" }`. Fields are private so a
/// descriptor cannot change after it has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DescriptorWire")]
pub struct JobDescriptor {
    #[serde(rename = "jobId")]
    job_id: JobId,
    #[serde(rename = "s3key")]
    object_key: String,
    #[serde(rename = "tablename")]
    table_name: String,
    #[serde(rename = "surveyId")]
    group_id: String,
}

/// Decoding shape. Accepts the camel-cased spellings some workers emit.
#[derive(Deserialize)]
struct DescriptorWire {
    #[serde(rename = "jobId")]
    job_id: String,
    #[serde(rename = "s3key", alias = "s3Key")]
    object_key: String,
    #[serde(rename = "tablename", alias = "tableName")]
    table_name: String,
    #[serde(rename = "surveyId")]
    group_id: String,
}

impl TryFrom<DescriptorWire> for JobDescriptor {
    type Error = QueueError;

    fn try_from(wire: DescriptorWire) -> QueueResult<Self> {
        JobDescriptor::new(
            JobId(wire.job_id),
            wire.object_key,
            wire.table_name,
            wire.group_id,
        )
    }
}

impl JobDescriptor {
    /// Build a descriptor, rejecting any empty field
    pub fn new(
        job_id: JobId,
        object_key: impl Into<String>,
        table_name: impl Into<String>,
        group_id: impl Into<String>,
    ) -> QueueResult<Self> {
        let descriptor = Self {
            job_id,
            object_key: object_key.into(),
            table_name: table_name.into(),
            group_id: group_id.into(),
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    fn validate(&self) -> QueueResult<()> {
        require("job_id", self.job_id.as_str())?;
        require("object_key", &self.object_key)?;
        require("table_name", &self.table_name)?;
        require("group_id", &self.group_id)
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Locator of the uploaded CSV in the object store
    pub fn object_key(&self) -> &str {
        &self.object_key
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Owning survey
    pub fn group_id(&self) -> &str {
        &self.group_id
    }
}

/// A submission before it has been assigned a job id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub object_key: String,
    pub table_name: String,
    pub group_id: String,
}

impl JobRequest {
    pub fn new(
        object_key: impl Into<String>,
        table_name: impl Into<String>,
        group_id: impl Into<String>,
    ) -> Self {
        Self {
            object_key: object_key.into(),
            table_name: table_name.into(),
            group_id: group_id.into(),
        }
    }

    /// Check the request fields without minting an id
    pub fn validate(&self) -> QueueResult<()> {
        require("object_key", &self.object_key)?;
        require("table_name", &self.table_name)?;
        require("group_id", &self.group_id)
    }

    pub fn into_descriptor(self, job_id: JobId) -> QueueResult<JobDescriptor> {
        JobDescriptor::new(job_id, self.object_key, self.table_name, self.group_id)
    }
}

fn require(field: &str, value: &str) -> QueueResult<()> {
    if value.trim().is_empty() {
        return Err(QueueError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> JobDescriptor {
        JobDescriptor::new(
            JobId::from("job-1000-abc12"),
            "images/1_data.csv",
            "Q1",
            "64ab01",
        )
        .unwrap()
    }

    #[test]
    fn serializes_with_queue_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "jobId": "job-1000-abc12",
                "s3key": "images/1_data.csv",
                "tablename": "Q1",
                "surveyId": "64ab01"
            })
        );
    }

    #[test]
    fn accepts_camel_case_aliases() {
        let raw = r#"{"jobId":"job-1","s3Key":"k","tableName":"T","surveyId":"s"}"#;
        let descriptor: JobDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(descriptor.object_key(), "k");
        assert_eq!(descriptor.table_name(), "T");
    }

    #[test]
    fn rejects_empty_fields() {
        let err = JobDescriptor::new(JobId::from("job-1"), "k", "  ", "s").unwrap_err();
        assert!(matches!(err, QueueError::Validation(msg) if msg.contains("table_name")));

        let err = JobDescriptor::new(JobId::from(""), "k", "T", "s").unwrap_err();
        assert!(matches!(err, QueueError::Validation(msg) if msg.contains("job_id")));
    }

    #[test]
    fn decoding_revalidates() {
        let raw = r#"{"jobId":"job-1","s3key":"k","tablename":"","surveyId":"s"}"#;
        assert!(serde_json::from_str::<JobDescriptor>(raw).is_err());
    }

    #[test]
    fn request_converts_with_assigned_id() {
        let request = JobRequest::new("k", "T", "s");
        request.validate().unwrap();
        let descriptor = request.into_descriptor(JobId::from("job-9")).unwrap();
        assert_eq!(descriptor.job_id().as_str(), "job-9");
        assert_eq!(descriptor.group_id(), "s");
    }
}
