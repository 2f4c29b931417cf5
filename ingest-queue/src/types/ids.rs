use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Constant tag every generated id starts with
pub const JOB_ID_PREFIX: &str = "job-";

/// Length of the random suffix
pub const SUFFIX_LEN: usize = 7;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Highest millisecond timestamp handed out so far; keeps ids non-decreasing
/// even if the wall clock steps backwards.
static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Tie breaker for the nanosecond fallback path
static FALLBACK_SEQ: AtomicU64 = AtomicU64::new(0);

/// Unique identifier for a submitted job, e.g. `job-1718035200123-k3f9x2a`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Mint a new id from the current time and a random suffix
    pub fn generate() -> Self {
        TimestampIdGenerator::new().generate()
    }

    /// Create a job ID from a string
    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Source of job ids. Injected into the dispatcher so tests can pin ids.
pub trait JobIdGenerator: Send + Sync {
    fn generate(&self) -> JobId;
}

/// `job-<millis>-<7 base36 chars>`, no coordination with other processes.
///
/// The suffix is drawn from `R` (the OS generator by default). If `R` fails,
/// a nanosecond-clock suffix is used instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampIdGenerator<R = OsRng> {
    rng: R,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self { rng: OsRng }
    }
}

impl<R> TimestampIdGenerator<R>
where
    R: RngCore + Clone + Send + Sync,
{
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R> JobIdGenerator for TimestampIdGenerator<R>
where
    R: RngCore + Clone + Send + Sync,
{
    fn generate(&self) -> JobId {
        let millis = next_millis();

        let suffix = match random_suffix(&mut self.rng.clone()) {
            Ok(suffix) => suffix,
            Err(err) => {
                tracing::warn!("Random source unavailable ({}), using nanosecond suffix", err);
                nanos_suffix()
            }
        };

        JobId(format!("{JOB_ID_PREFIX}{millis}-{suffix}"))
    }
}

/// Bytes at or above this are redrawn so every symbol is equally likely
const UNBIASED_LIMIT: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

fn random_suffix<R: RngCore>(rng: &mut R) -> Result<String, rand::Error> {
    let mut suffix = String::with_capacity(SUFFIX_LEN);
    let mut buf = [0u8; 16];
    while suffix.len() < SUFFIX_LEN {
        rng.try_fill_bytes(&mut buf)?;
        for b in buf.iter().copied().filter(|b| *b < UNBIASED_LIMIT) {
            suffix.push(ALPHABET[b as usize % ALPHABET.len()] as char);
            if suffix.len() == SUFFIX_LEN {
                break;
            }
        }
    }
    Ok(suffix)
}

fn next_millis() -> u64 {
    let now = Utc::now().timestamp_millis().max(0) as u64;
    let prev = LAST_MILLIS.fetch_max(now, Ordering::SeqCst);
    prev.max(now)
}

fn nanos_suffix() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default().max(0) as u64;
    let seq = FALLBACK_SEQ.fetch_add(1, Ordering::Relaxed);
    let encoded = to_base36(nanos.wrapping_add(seq));
    // Low-order digits change fastest
    let start = encoded.len().saturating_sub(SUFFIX_LEN);
    format!("{:0>width$}", &encoded[start..], width = SUFFIX_LEN)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
