pub mod store;
pub mod endpoint;
pub mod poller;

pub use store::StatusStore;
pub use endpoint::StatusEndpoint;
pub use poller::{PollConfig, PollOutcome, StatusPoller, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
