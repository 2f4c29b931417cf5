use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::{backend::QueueBackend, status::StatusEndpoint, JobState, QueueResult, StatusLookup};

/// Interval the web client polled at
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Shorter intervals, including zero, are raised to this
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Clamped to [`MIN_POLL_INTERVAL`]
    pub interval: Duration,
    /// `None` polls until a terminal state; there is no built-in timeout.
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
        }
    }
}

/// How a polling run ended
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The worker reported a terminal state
    Terminal(StatusLookup),
    /// `max_attempts` ran out first; carries the last successful lookup
    GaveUp {
        attempts: u32,
        last: Option<StatusLookup>,
    },
}

/// Client-side loop over [`StatusEndpoint::check`].
///
/// Normalizes the worker's vocabulary, keeps going through retryable store
/// outages and stops on a terminal state or an unrecoverable error.
pub struct StatusPoller<B: QueueBackend + ?Sized> {
    endpoint: StatusEndpoint<B>,
    config: PollConfig,
}

impl<B: QueueBackend + ?Sized> StatusPoller<B> {
    pub fn new(endpoint: StatusEndpoint<B>) -> Self {
        Self {
            endpoint,
            config: PollConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn poll_until_terminal(&self, job_id: &str) -> QueueResult<PollOutcome> {
        self.poll_with(job_id, |_| {}).await
    }

    /// Like [`poll_until_terminal`](Self::poll_until_terminal), calling
    /// `on_change` every time the normalized state differs from the last one
    /// seen. The first observation is always reported.
    pub async fn poll_with<F>(&self, job_id: &str, mut on_change: F) -> QueueResult<PollOutcome>
    where
        F: FnMut(&JobState),
    {
        let mut ticker = interval(self.config.interval.max(MIN_POLL_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut attempts = 0u32;
        let mut last: Option<StatusLookup> = None;
        let mut last_state: Option<JobState> = None;

        loop {
            if let Some(max) = self.config.max_attempts {
                if attempts >= max {
                    return Ok(PollOutcome::GaveUp { attempts, last });
                }
            }

            ticker.tick().await;
            attempts += 1;

            match self.endpoint.check(job_id).await {
                Ok(lookup) => {
                    let state = lookup.state();
                    if last_state.as_ref() != Some(&state) {
                        debug!("Job {} is now {}", job_id, state);
                        on_change(&state);
                        last_state = Some(state.clone());
                    }
                    if state.is_terminal() {
                        return Ok(PollOutcome::Terminal(lookup));
                    }
                    last = Some(lookup);
                }
                Err(e) if e.is_retryable() => {
                    warn!("Status poll for job {} failed, retrying: {}", job_id, e);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
