//! Session refresh: run all four normalizers concurrently and fold their
//! results into the aggregate board.
//!
//! Each platform owns exactly one key on the board, so concurrent writers never
//! collide and arrival order does not matter. A failed platform simply keeps
//! its fallback entry.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{error, info, instrument};

use crate::client::UpstreamClient;
use crate::domain::{Platform, PlatformStats, StatsSource};
use crate::platforms::{run_normalizer, OnUpdate};
use crate::retry::CancelFlag;

/// One platform's slot on the board.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BoardEntry {
  pub source: StatsSource,
  #[serde(flatten)]
  pub stats: PlatformStats,
}

/// Aggregate stats keyed by platform, shared with the HTTP handlers.
#[derive(Clone, Default)]
pub struct StatsBoard {
  inner: Arc<RwLock<HashMap<Platform, BoardEntry>>>,
}

impl StatsBoard {
  pub fn from_fallbacks(fallbacks: &HashMap<Platform, PlatformStats>) -> Self {
    let map = fallbacks
      .iter()
      .map(|(p, s)| (*p, BoardEntry { source: StatsSource::Fallback, stats: s.clone() }))
      .collect();
    Self { inner: Arc::new(RwLock::new(map)) }
  }

  pub fn get(&self, platform: Platform) -> Option<BoardEntry> {
    let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
    map.get(&platform).cloned()
  }

  /// Ordered copy of every slot.
  pub fn snapshot(&self) -> BTreeMap<Platform, BoardEntry> {
    let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
    map.iter().map(|(p, e)| (*p, e.clone())).collect()
  }

  /// Replace one platform's slot wholesale with live stats.
  pub fn set_live(&self, platform: Platform, stats: PlatformStats) {
    let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
    map.insert(platform, BoardEntry { source: StatsSource::Live, stats });
  }

  /// Callback that writes into this board.
  pub fn updater(&self) -> OnUpdate {
    let board = self.clone();
    Arc::new(move |platform, stats| board.set_live(platform, stats))
  }
}

/// Which platforms got live data in a refresh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RefreshReport {
  pub updated: Vec<Platform>,
  pub kept_fallback: Vec<Platform>,
}

/// Runs the normalizers once per session. The fallbacks and callback are
/// fixed at construction; `run_once` only reads them.
pub struct Orchestrator {
  client: UpstreamClient,
  fallbacks: HashMap<Platform, PlatformStats>,
  on_update: OnUpdate,
  cancel: CancelFlag,
  started: AtomicBool,
}

impl Orchestrator {
  pub fn new(
    client: UpstreamClient,
    fallbacks: HashMap<Platform, PlatformStats>,
    on_update: OnUpdate,
    cancel: CancelFlag,
  ) -> Self {
    Self { client, fallbacks, on_update, cancel, started: AtomicBool::new(false) }
  }

  /// Launch every normalizer concurrently and wait for all of them.
  /// Returns None if a refresh already ran (or is running) this session.
  #[instrument(level = "info", skip(self))]
  pub async fn run_once(&self) -> Option<RefreshReport> {
    if self.started.swap(true, Ordering::SeqCst) {
      info!(target: "stats", "Refresh already started this session; ignoring");
      return None;
    }

    let mut tasks = JoinSet::new();
    for platform in Platform::ALL {
      let client = self.client.clone();
      let fallback = self.fallbacks.get(&platform).cloned().unwrap_or_default();
      let cancel = self.cancel.clone();
      let on_update = self.on_update.clone();
      tasks.spawn(async move {
        let updated = run_normalizer(&client, platform, &fallback, &cancel, &on_update).await;
        (platform, updated)
      });
    }

    let mut report = RefreshReport::default();
    while let Some(joined) = tasks.join_next().await {
      match joined {
        Ok((platform, true)) => report.updated.push(platform),
        Ok((platform, false)) => report.kept_fallback.push(platform),
        Err(e) => error!(target: "stats", error = %e, "Normalizer task panicked"),
      }
    }
    report.updated.sort();
    report.kept_fallback.sort();
    info!(target: "stats", updated = ?report.updated, kept_fallback = ?report.kept_fallback, "Refresh finished");
    Some(report)
  }
}
