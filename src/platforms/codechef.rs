//! CodeChef: star badge and global ranking.

use serde::Deserialize;

use super::fields::{self, Scalar, SolvedCounts};
use crate::domain::PlatformStats;
use crate::util::fill_template;

const RANK_TPL: &str = "{stars} Coder (Rank: {global_ranking})";
const SUMMARY_TPL: &str = "{stars} rated coder with {attended} contests attended";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
  pub contests: Contests,
  pub achievements: Achievements,
  pub global_ranking: Scalar,
  #[serde(default, deserialize_with = "fields::lenient_solved")]
  pub problems_solved: Option<SolvedCounts>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contests {
  #[serde(default, deserialize_with = "fields::opt_rating")]
  pub rating: Option<i64>,
  pub attended_count: Scalar,
}

#[derive(Debug, Deserialize)]
pub struct Achievements {
  pub stars: Scalar,
}

pub fn map(p: Payload, fallback: &PlatformStats) -> PlatformStats {
  let stars = p.achievements.stars.to_string();
  let rank = fill_template(RANK_TPL, &[("stars", &stars), ("global_ranking", &p.global_ranking.to_string())]);
  let achievement_summary = fill_template(SUMMARY_TPL, &[("stars", &stars), ("attended", &p.contests.attended_count.to_string())]);
  PlatformStats {
    rating: p.contests.rating.or(fallback.rating),
    problems_solved: p.problems_solved.map(Into::into).unwrap_or_else(|| fallback.problems_solved.clone()),
    rank,
    achievement_summary,
    ..fallback.clone()
  }
}
