//! Loosely-typed upstream field shapes shared by the platform payloads.
//!
//! Upstream services are inconsistent about numbers vs strings, so fields that
//! are only echoed into display text are accepted as either.

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::domain::ProblemsSolved;

/// A JSON scalar echoed verbatim into display text.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
  Int(i64),
  Float(f64),
  Text(String),
}

impl fmt::Display for Scalar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Scalar::Int(n) => write!(f, "{n}"),
      Scalar::Float(x) => write!(f, "{x}"),
      Scalar::Text(s) => f.write_str(s),
    }
  }
}

/// Percentile as received (for display) plus its parsed value.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(try_from = "Scalar")]
pub struct Percent {
  pub raw: String,
  pub value: f64,
}

impl TryFrom<Scalar> for Percent {
  type Error = String;

  fn try_from(s: Scalar) -> Result<Self, Self::Error> {
    let value = match &s {
      Scalar::Int(n) => *n as f64,
      Scalar::Float(x) => *x,
      Scalar::Text(t) => t.trim().parse::<f64>().map_err(|_| format!("not a percentage: {t:?}"))?,
    };
    if !value.is_finite() {
      return Err(format!("not a percentage: {s}"));
    }
    Ok(Percent { raw: s.to_string().trim().to_string(), value })
  }
}

/// Solved counters as upstream sends them. `total` is required because it
/// feeds the achievement line; the buckets default to zero, `null` included.
#[derive(Clone, Debug, Deserialize)]
pub struct SolvedCounts {
  pub total: u32,
  #[serde(default, deserialize_with = "count_or_zero")] pub easy: u32,
  #[serde(default, deserialize_with = "count_or_zero")] pub medium: u32,
  #[serde(default, deserialize_with = "count_or_zero")] pub hard: u32,
  #[serde(default)] pub school: Option<u32>,
  #[serde(default)] pub basic: Option<u32>,
  #[serde(default)] pub unrated: Option<u32>,
}

impl From<SolvedCounts> for ProblemsSolved {
  fn from(c: SolvedCounts) -> Self {
    ProblemsSolved {
      total: c.total,
      easy: c.easy,
      medium: c.medium,
      hard: c.hard,
      school: c.school,
      basic: c.basic,
      unrated: c.unrated,
    }
  }
}

fn count_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
  Ok(Option::<u32>::deserialize(d)?.unwrap_or(0))
}

/// Optional solved block: anything that isn't a usable `SolvedCounts` reads
/// as absent, so the caller keeps its fallback counts.
pub fn lenient_solved<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SolvedCounts>, D::Error> {
  let v = Option::<serde_json::Value>::deserialize(d)?;
  Ok(v.and_then(|v| serde_json::from_value(v).ok()))
}

/// Ratings come as ints or floats depending on the platform; keep the integer part.
pub fn rating<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
  let v = f64::deserialize(d)?;
  Ok(v.trunc() as i64)
}

pub fn opt_rating<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
  let v = Option::<f64>::deserialize(d)?;
  Ok(v.map(|x| x.trunc() as i64))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn percent_accepts_numbers_and_numeric_strings() {
    let p: Percent = serde_json::from_str("\"12.5\"").unwrap();
    assert_eq!(p, Percent { raw: "12.5".into(), value: 12.5 });
    let p: Percent = serde_json::from_str("3.75").unwrap();
    assert_eq!(p.raw, "3.75");
    let p: Percent = serde_json::from_str("7").unwrap();
    assert_eq!((p.raw.as_str(), p.value), ("7", 7.0));
    assert!(serde_json::from_str::<Percent>("\"N/A\"").is_err());
  }

  #[test]
  fn scalar_echoes_as_received() {
    let s: Scalar = serde_json::from_str("\"4★\"").unwrap();
    assert_eq!(s.to_string(), "4★");
    let s: Scalar = serde_json::from_str("1234").unwrap();
    assert_eq!(s.to_string(), "1234");
  }

  #[test]
  fn solved_counts_tolerate_null_buckets() {
    let c: SolvedCounts = serde_json::from_str(r#"{"total":5,"easy":null,"hard":2}"#).unwrap();
    assert_eq!((c.total, c.easy, c.medium, c.hard), (5, 0, 0, 2));
    assert!(serde_json::from_str::<SolvedCounts>(r#"{"easy":3}"#).is_err());
  }
}
