//! Codeforces: the rank title is derived locally from the contest rating.

use serde::Deserialize;

use super::fields::{self, Scalar, SolvedCounts};
use crate::domain::PlatformStats;
use crate::util::fill_template;

const SUMMARY_TPL: &str = "{rank} with {attended} contests and best rank {best_rank}";

/// Lower bounds, highest first; first match wins.
const RANK_BUCKETS: [(i64, &str); 4] = [
  (1900, "Candidate Master"),
  (1600, "Expert"),
  (1400, "Specialist"),
  (1200, "Pupil"),
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
  pub contests: Contests,
  #[serde(default, deserialize_with = "fields::lenient_solved")]
  pub problems_solved: Option<SolvedCounts>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contests {
  #[serde(deserialize_with = "fields::rating")]
  pub rating: i64,
  pub attended_count: Scalar,
  pub best_rank: Scalar,
}

pub fn rank_for_rating(rating: i64) -> &'static str {
  RANK_BUCKETS
    .iter()
    .find(|(floor, _)| rating >= *floor)
    .map(|(_, title)| *title)
    .unwrap_or("Newbie")
}

pub fn map(p: Payload, fallback: &PlatformStats) -> PlatformStats {
  let rank = rank_for_rating(p.contests.rating);
  let achievement_summary = fill_template(
    SUMMARY_TPL,
    &[
      ("rank", rank),
      ("attended", &p.contests.attended_count.to_string()),
      ("best_rank", &p.contests.best_rank.to_string()),
    ],
  );
  PlatformStats {
    rating: Some(p.contests.rating),
    problems_solved: p.problems_solved.map(Into::into).unwrap_or_else(|| fallback.problems_solved.clone()),
    rank: rank.to_string(),
    achievement_summary,
    ..fallback.clone()
  }
}
