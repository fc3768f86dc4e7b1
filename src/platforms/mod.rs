//! Per-platform normalizers.
//!
//! Each platform module declares the payload shape it needs and a pure `map`
//! from that payload onto the fallback record. Bodies are validated by serde
//! before mapping, so a missing field is a `Malformed` error instead of a
//! half-filled record.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::client::UpstreamClient;
use crate::domain::{Platform, PlatformStats};
use crate::error::FetchError;
use crate::retry::CancelFlag;
use crate::util::trunc_for_log;

pub mod codechef;
pub mod codeforces;
pub mod fields;
pub mod geeksforgeeks;
pub mod leetcode;

/// Result sink: receives a platform's fresh record at most once per session.
pub type OnUpdate = Arc<dyn Fn(Platform, PlatformStats) + Send + Sync>;

/// Parse `body` as `platform`'s payload and lay the produced fields over `fallback`.
pub fn normalize(platform: Platform, body: &str, fallback: &PlatformStats) -> Result<PlatformStats, FetchError> {
  let stats = match platform {
    Platform::LeetCode => leetcode::map(serde_json::from_str(body)?, fallback),
    Platform::CodeChef => codechef::map(serde_json::from_str(body)?, fallback),
    Platform::Codeforces => codeforces::map(serde_json::from_str(body)?, fallback),
    Platform::GeeksforGeeks => geeksforgeeks::map(serde_json::from_str(body)?, fallback),
  };
  Ok(stats)
}

/// Fetch (with retries) and normalize one platform.
#[instrument(level = "info", skip(client, fallback, cancel))]
pub async fn fetch_stats(
  client: &UpstreamClient,
  platform: Platform,
  fallback: &PlatformStats,
  cancel: &CancelFlag,
) -> Result<PlatformStats, FetchError> {
  let url = client.endpoint(platform);
  let body = client.get_text(&url, cancel).await?;
  normalize(platform, &body, fallback).map_err(|e| {
    warn!(target: "stats", %platform, body = %trunc_for_log(&body, 200), "Upstream body did not match expected shape");
    e
  })
}

/// One normalizer run: fetch, map, report. Failures are logged and swallowed
/// so the fallback stays on display. Returns whether the callback fired.
pub async fn run_normalizer(
  client: &UpstreamClient,
  platform: Platform,
  fallback: &PlatformStats,
  cancel: &CancelFlag,
  on_update: &OnUpdate,
) -> bool {
  match fetch_stats(client, platform, fallback, cancel).await {
    // Shutdown may land between the last await and here.
    Ok(_) if cancel.is_cancelled() => false,
    Ok(stats) => {
      info!(target: "stats", %platform, rank = %stats.rank, "Live stats normalized");
      on_update(platform, stats);
      true
    }
    Err(FetchError::Cancelled) => {
      info!(target: "stats", %platform, "Refresh cancelled; keeping current value");
      false
    }
    Err(e) => {
      error!(target: "stats", %platform, error = %e, transient = e.is_transient(), "Refresh failed; keeping fallback");
      false
    }
  }
}
