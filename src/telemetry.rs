//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! LOG_LEVEL takes a filter ("debug", or directives like
//! "info,generation=debug,tower_http=info"); LOG_FORMAT switches between
//! human-readable output (default) and JSON structured logs for collectors.
//! Targets are kept in the output so generation events are easy to grep out
//! of the per-request spans the HTTP trace layer adds.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str =
    "info,generation=debug,quizforge_backend=debug,tower_http=info,axum=info";

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let wants_json = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // One builder, two terminal shapes; the types diverge so finish here.
    if wants_json {
        builder.json().init();
    } else {
        builder.init();
    }
}
