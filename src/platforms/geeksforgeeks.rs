//! GeeksforGeeks: no contest rating; institute rank and practice streak.

use serde::Deserialize;

use super::fields::{Scalar, SolvedCounts};
use crate::domain::PlatformStats;
use crate::util::fill_template;

const RANK_TPL: &str = "Institute Rank: {institute_rank}";
const SUMMARY_TPL: &str = "Solved {total}+ problems with {streak} day current streak";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
  #[serde(default)]
  pub institute_rank: Option<Scalar>,
  pub problems_solved: SolvedCounts,
  pub achievements: Achievements,
}

#[derive(Debug, Deserialize)]
pub struct Achievements {
  pub streaks: Streaks,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streaks {
  pub current_streak: Scalar,
}

pub fn map(p: Payload, fallback: &PlatformStats) -> PlatformStats {
  let rank = match &p.institute_rank {
    Some(r) => fill_template(RANK_TPL, &[("institute_rank", &r.to_string())]),
    None => fallback.rank.clone(),
  };
  let achievement_summary = fill_template(
    SUMMARY_TPL,
    &[
      ("total", &p.problems_solved.total.to_string()),
      ("streak", &p.achievements.streaks.current_streak.to_string()),
    ],
  );
  PlatformStats {
    problems_solved: p.problems_solved.into(),
    rank,
    achievement_summary,
    ..fallback.clone()
  }
}
