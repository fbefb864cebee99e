//! Logging configuration for the command line tool.
//!
//! Logs go to stderr so stdout stays clean for merged logs and JSON. `RUST_LOG`
//! overrides the default directive; `--verbose` raises chronicle crates to debug.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub fn init(verbose: bool) {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let filter_directive = if verbose {
        "info,chronicle_core=debug,chronicle_cli=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .init();

    tracing::debug!(verbose, "Logging initialized");
}
