use crate::{codec::JobCodec, JobDescriptor, QueueError, QueueResult, StatusRecord};

/// JSON codec, one object per queue entry / hash field
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JobCodec for JsonCodec {
    fn encode_descriptor(&self, descriptor: &JobDescriptor) -> QueueResult<String> {
        Ok(serde_json::to_string(descriptor)?)
    }

    fn decode_descriptor(&self, entry: &str) -> QueueResult<JobDescriptor> {
        Ok(serde_json::from_str(entry)?)
    }

    fn encode_status(&self, record: &StatusRecord) -> QueueResult<String> {
        Ok(serde_json::to_string(record)?)
    }

    fn decode_status(&self, job_id: &str, raw: &str) -> QueueResult<StatusRecord> {
        serde_json::from_str(raw).map_err(|e| QueueError::CorruptStatus {
            job_id: job_id.to_string(),
            reason: e.to_string(),
        })
    }

    fn codec_id(&self) -> &'static str {
        "json"
    }
}
