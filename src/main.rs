//! Portfolio Stats · coding-platform stats backend
//!
//! - Axum HTTP API serving normalized LeetCode / CodeChef / Codeforces /
//!   GeeksforGeeks stats
//! - One refresh per process: each platform is fetched with retries and
//!   falls back to author-supplied data on failure
//! - Static portfolio fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   STATS_CONFIG_PATH : path to TOML config (base URL, retry tuning, fallbacks)
//!   STATS_BASE_URL    : upstream base, overrides the TOML value (default "http://localhost:5000")
//!   HTTP_TIMEOUT_SECS : per-request upstream timeout (default 20)
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod error;
mod config;
mod seeds;
mod retry;
mod client;
mod platforms;
mod orchestrator;
mod state;
mod protocol;
mod routes;
#[cfg(test)]
mod testutil;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::settings_from_env;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Board seeded with fallbacks, upstream client, one-shot orchestrator.
  let state = Arc::new(AppState::new(settings_from_env())?);

  // Fire-and-forget refresh; the board already shows fallbacks meanwhile.
  let refresher = state.clone();
  tokio::spawn(async move {
    if let Some(report) = refresher.refresh_once().await {
      info!(target: "portfolio_stats", updated = report.updated.len(), kept_fallback = report.kept_fallback.len(), "Startup refresh complete");
    }
  });

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "portfolio_stats", %addr, "HTTP server listening");

  let on_shutdown = state.clone();
  axum::serve(listener, app)
    .with_graceful_shutdown(async move {
      if let Err(e) = tokio::signal::ctrl_c().await {
        error!(target: "portfolio_stats", error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
      }
      on_shutdown.shutdown();
    })
    .await?;
  Ok(())
}
