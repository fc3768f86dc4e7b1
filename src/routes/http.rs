//! HTTP endpoint handlers. These are thin wrappers that read the stats board.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{debug, instrument};

use crate::domain::Platform;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let out: StatsOut = state.board.snapshot();
  debug!(target: "stats", platforms = out.len(), "HTTP stats served");
  Json(out)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_platform_stats(
  State(state): State<Arc<AppState>>,
  Path(platform): Path<String>,
) -> Response {
  let entry = platform.parse::<Platform>().ok().and_then(|p| state.board.get(p));
  match entry {
    Some(e) => Json(e).into_response(),
    None => (StatusCode::NOT_FOUND, Json(ErrorOut { error: format!("unknown platform: {platform}") })).into_response(),
  }
}
