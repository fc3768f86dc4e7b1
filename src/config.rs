//! Loading service configuration (upstream base, retry tuning, fallback stats) from TOML.
//!
//! Every section is optional: a missing file, a parse error, or a missing
//! platform table falls back to built-in values.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::{Platform, PlatformStats, ProblemsSolved};
use crate::retry::RetryPolicy;
use crate::seeds::seed_fallbacks;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct StatsConfig {
  #[serde(default)]
  pub base_url: Option<String>,
  #[serde(default)]
  pub retry: RetryPolicy,
  /// Keyed by platform (`leetcode`, `codechef`, ...). Unknown keys are skipped.
  #[serde(default)]
  pub fallback: HashMap<String, FallbackCfg>,
}

/// Fallback entry accepted in TOML. Unset fields take the built-in value.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct FallbackCfg {
  #[serde(default)] pub rating: Option<i64>,
  #[serde(default)] pub top_percentage: Option<f64>,
  #[serde(default)] pub problems_solved: Option<ProblemsSolved>,
  #[serde(default)] pub rank: Option<String>,
  #[serde(default)] pub achievement_summary: Option<String>,
}

impl FallbackCfg {
  fn apply(&self, base: PlatformStats) -> PlatformStats {
    PlatformStats {
      rating: self.rating.or(base.rating),
      top_percentage: self.top_percentage.or(base.top_percentage),
      problems_solved: self.problems_solved.clone().unwrap_or(base.problems_solved),
      rank: self.rank.clone().unwrap_or(base.rank),
      achievement_summary: self.achievement_summary.clone().unwrap_or(base.achievement_summary),
    }
  }
}

/// Resolved runtime settings.
#[derive(Clone, Debug)]
pub struct Settings {
  pub base_url: String,
  pub timeout: Duration,
  pub retry: RetryPolicy,
  pub fallbacks: HashMap<Platform, PlatformStats>,
}

impl StatsConfig {
  /// Merge file values with env overrides and built-ins.
  pub fn resolve(&self, base_url_env: Option<String>, timeout_secs_env: Option<String>) -> Settings {
    let base_url = base_url_env
      .or_else(|| self.base_url.clone())
      .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let timeout = timeout_secs_env
      .and_then(|s| s.parse::<u64>().ok())
      .map(Duration::from_secs)
      .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

    let mut fallbacks = seed_fallbacks();
    for (key, cfg) in &self.fallback {
      match key.parse::<Platform>() {
        Ok(platform) => {
          if let Some(base) = fallbacks.remove(&platform) {
            fallbacks.insert(platform, cfg.apply(base));
          }
        }
        Err(e) => warn!(target: "portfolio_stats", error = %e, "Ignoring fallback table"),
      }
    }

    Settings { base_url, timeout, retry: self.retry, fallbacks }
  }
}

/// Parse a TOML document into `StatsConfig`.
pub fn parse_config(s: &str) -> Result<StatsConfig, toml::de::Error> {
  toml::from_str::<StatsConfig>(s)
}

/// Attempt to load `StatsConfig` from STATS_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<StatsConfig> {
  let path = std::env::var("STATS_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "portfolio_stats", %path, "Loaded stats config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "portfolio_stats", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "portfolio_stats", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

/// Full settings from the environment: config file, then env overrides.
pub fn settings_from_env() -> Settings {
  load_config_from_env()
    .unwrap_or_default()
    .resolve(std::env::var("STATS_BASE_URL").ok(), std::env::var("HTTP_TIMEOUT_SECS").ok())
}
