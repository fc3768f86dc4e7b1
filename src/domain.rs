//! Domain models: the coding platforms we track and the common stats record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Competitive-programming platforms shown on the portfolio.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
  LeetCode,
  CodeChef,
  Codeforces,
  GeeksforGeeks,
}

impl Platform {
  pub const ALL: [Platform; 4] = [
    Platform::LeetCode,
    Platform::CodeChef,
    Platform::Codeforces,
    Platform::GeeksforGeeks,
  ];

  /// Lowercase key used in endpoint paths, config tables and the board.
  pub fn key(self) -> &'static str {
    match self {
      Platform::LeetCode => "leetcode",
      Platform::CodeChef => "codechef",
      Platform::Codeforces => "codeforces",
      Platform::GeeksforGeeks => "geeksforgeeks",
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.key())
  }
}

impl FromStr for Platform {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Platform::ALL
      .into_iter()
      .find(|p| p.key().eq_ignore_ascii_case(s))
      .ok_or_else(|| format!("unknown platform: {s}"))
  }
}

/// Solved-problem counters. The four core buckets always exist; the rest
/// only show up for platforms that report them. Deserialized from TOML
/// fallback overrides.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemsSolved {
  #[serde(default)] pub total: u32,
  #[serde(default)] pub easy: u32,
  #[serde(default)] pub medium: u32,
  #[serde(default)] pub hard: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub school: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub basic: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub unrated: Option<u32>,
}

/// Uniform per-platform stats record, whatever the upstream shape was.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
  pub rating: Option<i64>,
  pub top_percentage: Option<f64>,
  pub problems_solved: ProblemsSolved,
  pub rank: String,
  pub achievement_summary: String,
}

/// Where the value currently held for a platform came from.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatsSource {
  Fallback, // author-supplied defaults
  Live,     // normalized from the upstream endpoint this session
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn platform_keys_round_trip_through_from_str() {
    for p in Platform::ALL {
      assert_eq!(p.key().parse::<Platform>().unwrap(), p);
    }
    assert_eq!("LeetCode".parse::<Platform>().unwrap(), Platform::LeetCode);
    assert!("hackerrank".parse::<Platform>().is_err());
  }

  #[test]
  fn stats_serialize_in_camel_case_and_skip_absent_buckets() {
    let stats = PlatformStats {
      rating: Some(1600),
      top_percentage: Some(12.5),
      problems_solved: ProblemsSolved { total: 3, easy: 1, medium: 1, hard: 1, ..Default::default() },
      rank: "Top 12.5%".into(),
      achievement_summary: "x".into(),
    };
    let v = serde_json::to_value(&stats).unwrap();
    assert_eq!(v["topPercentage"], 12.5);
    assert_eq!(v["achievementSummary"], "x");
    assert_eq!(v["problemsSolved"]["total"], 3);
    assert!(v["problemsSolved"].get("school").is_none());
  }
}
