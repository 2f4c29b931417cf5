pub mod ids;
pub mod descriptor;
pub mod status;

pub use ids::{JobId, JobIdGenerator, TimestampIdGenerator, JOB_ID_PREFIX};
pub use descriptor::{JobDescriptor, JobRequest};
pub use status::{JobState, StatusLookup, StatusRecord};
