//! Error taxonomy for upstream stats fetching.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
  /// Connection-level failure: DNS, refused connection, transport timeout.
  #[error("network error: {0}")]
  Network(#[from] reqwest::Error),

  /// Upstream answered with a non-2xx status.
  #[error("HTTP {status}: {status_text}")]
  Status { status: u16, status_text: String },

  /// Body was not JSON, or a required field was missing or mistyped.
  #[error("malformed response: {0}")]
  Malformed(String),

  /// The session was shut down before the fetch finished.
  #[error("fetch cancelled")]
  Cancelled,
}

impl FetchError {
  /// Transient errors are worth another attempt; the rest are final.
  pub fn is_transient(&self) -> bool {
    matches!(self, FetchError::Network(_) | FetchError::Status { .. })
  }
}

impl From<serde_json::Error> for FetchError {
  fn from(e: serde_json::Error) -> Self {
    FetchError::Malformed(e.to_string())
  }
}
