//! Built-in fallback stats so the portfolio always has something to show,
//! even without a config file or a reachable upstream.

use std::collections::HashMap;

use crate::domain::{Platform, PlatformStats, ProblemsSolved};

/// Author-supplied defaults for one platform.
pub fn fallback_stats(platform: Platform) -> PlatformStats {
  match platform {
    Platform::LeetCode => PlatformStats {
      rating: Some(1650),
      top_percentage: Some(15.0),
      problems_solved: ProblemsSolved { total: 350, easy: 150, medium: 160, hard: 40, ..Default::default() },
      rank: "Top 15%".into(),
      achievement_summary: "Solved 350+ problems across all difficulty levels".into(),
    },
    Platform::CodeChef => PlatformStats {
      rating: Some(1750),
      top_percentage: None,
      problems_solved: ProblemsSolved { total: 120, ..Default::default() },
      rank: "3★ Coder".into(),
      achievement_summary: "3★ rated coder with regular contest participation".into(),
    },
    Platform::Codeforces => PlatformStats {
      rating: Some(1400),
      top_percentage: None,
      problems_solved: ProblemsSolved { total: 200, ..Default::default() },
      rank: "Specialist".into(),
      achievement_summary: "Specialist with steady contest participation".into(),
    },
    Platform::GeeksforGeeks => PlatformStats {
      rating: None,
      top_percentage: None,
      problems_solved: ProblemsSolved {
        total: 250, easy: 90, medium: 100, hard: 20, school: Some(10), basic: Some(30), unrated: None,
      },
      rank: "Institute Rank: 50".into(),
      achievement_summary: "Solved 250+ problems with consistent daily practice".into(),
    },
  }
}

/// Fallbacks for every platform.
pub fn seed_fallbacks() -> HashMap<Platform, PlatformStats> {
  Platform::ALL.into_iter().map(|p| (p, fallback_stats(p))).collect()
}
