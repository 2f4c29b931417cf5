pub mod json;

use crate::{JobDescriptor, QueueResult, StatusRecord};

/// Wire format for queue entries and status records
pub trait JobCodec: Send + Sync {
    /// Encode a descriptor into one queue entry
    fn encode_descriptor(&self, descriptor: &JobDescriptor) -> QueueResult<String>;

    /// Decode a queue entry, re-validating every field
    fn decode_descriptor(&self, entry: &str) -> QueueResult<JobDescriptor>;

    /// Encode a status record (worker side)
    fn encode_status(&self, record: &StatusRecord) -> QueueResult<String>;

    /// Decode a stored status value. A parse failure is reported as
    /// `CorruptStatus` for `job_id`.
    fn decode_status(&self, job_id: &str, raw: &str) -> QueueResult<StatusRecord>;

    /// Get codec identifier
    fn codec_id(&self) -> &'static str;
}
