//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! Behavior:
//! - LOG_LEVEL controls the filter (e.g. "debug" or detailed directives like
//!   "info,retry=debug,stats=debug,portfolio_stats=debug,tower_http=info").
//! - LOG_FORMAT selects "pretty" (default) or "json" structured logs.
//!
//! Targets in use:
//! - `portfolio_stats`: startup, config loading, HTTP server.
//! - `stats`: normalizer outcomes and the refresh run. Shape mismatches carry
//!   a truncated `body`; fetch failures carry `error` and `transient`.
//! - `retry`: one warn per failed attempt with `attempt` (1-based),
//!   `max_attempts`, `delay_ms` (the wait before the next try) and `error`.
//!   A success that needed more than one try logs at info with `attempt`;
//!   running out of tries logs at error with the final `attempt` and its `error`.
//!   Abandoning on cancellation logs at debug.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
        EnvFilter::new("info,stats=debug,retry=info,portfolio_stats=debug,tower_http=info,axum=info")
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => {
            builder.json().init();
        }
        _ => {
            builder.init();
        }
    }
}
