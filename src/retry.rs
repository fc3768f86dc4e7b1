//! Bounded retry with exponential backoff.
//!
//! The executor runs an async operation up to `max_attempts` times. Between
//! attempts it sleeps for the current delay, then multiplies the delay by
//! `backoff_multiplier` (floored to whole milliseconds). No jitter, no cap.
//! Only the last error is surfaced; earlier ones are logged and dropped.
//!
//! A shared `CancelFlag` is checked before every attempt, so a shutdown that
//! lands during a backoff sleep abandons the sequence on wake-up.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, error, info, warn};

/// Retry tuning. Defaults: 3 attempts, 1000ms first delay, 1.5x growth.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  pub delay_ms: u64,
  pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self { max_attempts: 3, delay_ms: 1000, backoff_multiplier: 1.5 }
  }
}

/// Delay before the attempt after the one that waited `delay_ms`.
pub fn next_delay(delay_ms: u64, multiplier: f64) -> u64 {
  ((delay_ms as f64) * multiplier).floor() as u64
}

/// Cheap shared cancellation flag. Once set it stays set.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
  pub fn new() -> Self { Self::default() }

  pub fn cancel(&self) {
    self.0.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::SeqCst)
  }
}

#[derive(Debug)]
pub enum RetryError<E> {
  /// The flag was raised before the sequence finished.
  Cancelled,
  /// Every attempt failed; `last` is the error from the final one.
  Exhausted { attempts: u32, last: E },
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RetryError::Cancelled => f.write_str("retry cancelled"),
      RetryError::Exhausted { attempts, last } => write!(f, "gave up after {attempts} attempt(s): {last}"),
    }
  }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryError<E> {}

/// Run `op` under `policy`, sleeping between failed attempts.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, cancel: &CancelFlag, mut op: F) -> Result<T, RetryError<E>>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T, E>>,
  E: fmt::Display,
{
  // Zero would mean "never try"; always make at least one attempt.
  let max_attempts = policy.max_attempts.max(1);
  let mut attempt: u32 = 1;
  let mut delay_ms = policy.delay_ms;

  loop {
    if cancel.is_cancelled() {
      debug!(target: "retry", attempt, "Cancelled before attempt; abandoning");
      return Err(RetryError::Cancelled);
    }

    match op().await {
      Ok(value) => {
        if attempt > 1 {
          info!(target: "retry", attempt, "Operation succeeded after retry");
        }
        return Ok(value);
      }
      Err(e) if attempt >= max_attempts => {
        error!(target: "retry", attempt, error = %e, "All attempts failed");
        return Err(RetryError::Exhausted { attempts: attempt, last: e });
      }
      Err(e) => {
        warn!(target: "retry", attempt, max_attempts, delay_ms, error = %e, "Attempt failed; backing off");
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        delay_ms = next_delay(delay_ms, policy.backoff_multiplier);
        attempt += 1;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::AtomicU32;
  use std::sync::Mutex;
  use tokio::time::Instant;

  fn fast(max_attempts: u32) -> RetryPolicy {
    RetryPolicy { max_attempts, delay_ms: 1, backoff_multiplier: 1.5 }
  }

  #[tokio::test]
  async fn always_failing_op_runs_exactly_max_attempts_and_keeps_last_error() {
    for max in 1..=5u32 {
      let calls = AtomicU32::new(0);
      let res: Result<(), _> = retry(&fast(max), &CancelFlag::new(), || {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move { Err(format!("failure #{n}")) }
      })
      .await;

      assert_eq!(calls.load(Ordering::SeqCst), max);
      match res {
        Err(RetryError::Exhausted { attempts, last }) => {
          assert_eq!(attempts, max);
          assert_eq!(last, format!("failure #{max}"));
        }
        other => panic!("unexpected outcome: {other:?}"),
      }
    }
  }

  #[tokio::test]
  async fn succeeding_on_nth_attempt_stops_there() {
    for n in 1..=3u32 {
      let calls = AtomicU32::new(0);
      let res = retry(&fast(3), &CancelFlag::new(), || {
        let k = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move { if k < n { Err("not yet") } else { Ok(k * 10) } }
      })
      .await;

      assert_eq!(res.unwrap(), n * 10);
      assert_eq!(calls.load(Ordering::SeqCst), n);
    }
  }

  #[tokio::test]
  async fn zero_attempts_still_tries_once() {
    let calls = AtomicU32::new(0);
    let res: Result<(), _> = retry(&fast(0), &CancelFlag::new(), || {
      calls.fetch_add(1, Ordering::SeqCst);
      async { Err("nope") }
    })
    .await;
    assert!(matches!(res, Err(RetryError::Exhausted { attempts: 1, .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn default_policy_waits_1000_then_1500_ms() {
    let stamps = Mutex::new(Vec::<Instant>::new());
    let res: Result<(), _> = retry(&RetryPolicy::default(), &CancelFlag::new(), || {
      stamps.lock().unwrap().push(Instant::now());
      async { Err("down") }
    })
    .await;
    assert!(res.is_err());

    let stamps = stamps.into_inner().unwrap();
    assert_eq!(stamps.len(), 3);
    let gaps: Vec<u128> = stamps.windows(2).map(|w| (w[1] - w[0]).as_millis()).collect();
    assert_eq!(gaps, vec![1000, 1500]);
  }

  #[test]
  fn next_delay_floors() {
    assert_eq!(next_delay(1000, 1.5), 1500);
    assert_eq!(next_delay(1500, 1.5), 2250);
    assert_eq!(next_delay(333, 1.5), 499);
    assert_eq!(next_delay(1000, 1.0), 1000);
  }

  #[tokio::test]
  async fn cancelled_flag_prevents_any_attempt() {
    let cancel = CancelFlag::new();
    cancel.cancel();
    let calls = AtomicU32::new(0);
    let res: Result<(), RetryError<&str>> = retry(&fast(3), &cancel, || {
      calls.fetch_add(1, Ordering::SeqCst);
      async { Ok(()) }
    })
    .await;
    assert!(matches!(res, Err(RetryError::Cancelled)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test(start_paused = true)]
  async fn cancel_during_backoff_abandons_on_wake() {
    let cancel = CancelFlag::new();
    let calls = AtomicU32::new(0);
    let res: Result<(), _> = retry(&RetryPolicy::default(), &cancel, || {
      calls.fetch_add(1, Ordering::SeqCst);
      cancel.cancel();
      async { Err("down") }
    })
    .await;
    assert!(matches!(res, Err(RetryError::Cancelled)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }
}
