use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Logs go to stderr so agent-mode stdout
/// stays a single JSON document.
///
/// `--log-level` takes precedence over `RUST_LOG`; an unparsable directive
/// falls back to the default.
pub fn init(log_level: Option<&str>, ansi: bool) {
    let filter = match log_level {
        Some(directive) => EnvFilter::try_new(directive).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .with_filter(filter);

    // A second call (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(layer).try_init();
}
