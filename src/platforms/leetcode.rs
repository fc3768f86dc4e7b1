//! LeetCode: contest rating and percentile, full solved breakdown.

use serde::Deserialize;

use super::fields::{self, Percent, SolvedCounts};
use crate::domain::PlatformStats;
use crate::util::fill_template;

const RANK_TPL: &str = "Top {top_percentage}%";
const SUMMARY_TPL: &str = "Solved {total}+ problems across all difficulty levels";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
  pub contests: Contests,
  pub problems_solved: SolvedCounts,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contests {
  #[serde(default, deserialize_with = "fields::opt_rating")]
  pub rating: Option<i64>,
  pub top_percentage: Percent,
}

pub fn map(p: Payload, fallback: &PlatformStats) -> PlatformStats {
  let rank = fill_template(RANK_TPL, &[("top_percentage", &p.contests.top_percentage.raw)]);
  let achievement_summary = fill_template(SUMMARY_TPL, &[("total", &p.problems_solved.total.to_string())]);
  PlatformStats {
    rating: p.contests.rating.or(fallback.rating),
    top_percentage: Some(p.contests.top_percentage.value),
    problems_solved: p.problems_solved.into(),
    rank,
    achievement_summary,
  }
}
