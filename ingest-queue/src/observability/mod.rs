pub mod metrics;

pub use metrics::{LiveMetrics, MetricsSnapshot};

/// Install a global `tracing` subscriber filtered by `RUST_LOG`
/// (default `info`). `json` switches to structured JSON lines.
///
/// Returns false if a subscriber was already installed.
#[cfg(feature = "tracing-basic")]
pub fn init_tracing(json: bool) -> bool {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_target(true);

    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
