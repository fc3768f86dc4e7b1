//! Upstream HTTP client for the coding-platform endpoints.
//!
//! Every request goes through the retry executor. A non-2xx status counts as a
//! failed attempt just like a transport error. The body comes back as raw text:
//! JSON parsing belongs to the normalizers so a malformed body is never retried.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use tracing::{debug, instrument};

use crate::domain::Platform;
use crate::error::FetchError;
use crate::retry::{retry, CancelFlag, RetryError, RetryPolicy};

#[derive(Clone)]
pub struct UpstreamClient {
  pub client: reqwest::Client,
  pub base_url: String,
  pub policy: RetryPolicy,
}

impl UpstreamClient {
  pub fn new(base_url: &str, timeout: Duration, policy: RetryPolicy) -> Result<Self, FetchError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string(), policy })
  }

  /// `<base>/codingPlatforms/<platform>`
  pub fn endpoint(&self, platform: Platform) -> String {
    format!("{}/codingPlatforms/{}", self.base_url, platform.key())
  }

  /// Single attempt: send, check status, read body.
  async fn send_once(&self, method: Method, url: &str, body: Option<&serde_json::Value>) -> Result<String, FetchError> {
    let mut req = self.client.request(method, url)
      .header(USER_AGENT, "portfolio-stats/0.1")
      .header(CONTENT_TYPE, "application/json");
    if let Some(b) = body {
      req = req.json(b);
    }

    let res = req.send().await?;
    let status = res.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
      });
    }
    Ok(res.text().await?)
  }

  /// Retried request. Returns the body of the first 2xx response.
  #[instrument(level = "debug", skip(self, body, cancel))]
  pub async fn request(
    &self,
    method: Method,
    url: &str,
    body: Option<&serde_json::Value>,
    cancel: &CancelFlag,
  ) -> Result<String, FetchError> {
    let text = retry(&self.policy, cancel, || self.send_once(method.clone(), url, body))
      .await
      .map_err(FetchError::from)?;
    debug!(target: "portfolio_stats", body_len = text.len(), "Upstream response received");
    Ok(text)
  }

  pub async fn get_text(&self, url: &str, cancel: &CancelFlag) -> Result<String, FetchError> {
    self.request(Method::GET, url, None, cancel).await
  }
}

impl From<RetryError<FetchError>> for FetchError {
  fn from(e: RetryError<FetchError>) -> Self {
    match e {
      RetryError::Cancelled => FetchError::Cancelled,
      RetryError::Exhausted { last, .. } => last,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testutil::{serve, FakeUpstream};
  use axum::{http::StatusCode, routing::post, Json, Router};

  fn quick() -> RetryPolicy {
    RetryPolicy { max_attempts: 3, delay_ms: 5, backoff_multiplier: 1.5 }
  }

  #[test]
  fn endpoint_joins_base_without_double_slash() {
    let c = UpstreamClient::new("http://example.test/", Duration::from_secs(1), quick()).unwrap();
    assert_eq!(c.endpoint(Platform::Codeforces), "http://example.test/codingPlatforms/codeforces");
  }

  #[tokio::test]
  async fn non_2xx_is_retried_then_surfaces_status() {
    let up = FakeUpstream::new().reply("/down", StatusCode::SERVICE_UNAVAILABLE, "busy");
    let base = up.start().await;

    let c = UpstreamClient::new(&base, Duration::from_secs(5), quick()).unwrap();
    let err = c.get_text(&format!("{base}/down"), &CancelFlag::new()).await.unwrap_err();

    match err {
      FetchError::Status { status, status_text } => {
        assert_eq!(status, 503);
        assert_eq!(status_text, "Service Unavailable");
      }
      other => panic!("unexpected error: {other}"),
    }
    assert_eq!(up.hits("/down"), 3);
  }

  #[tokio::test]
  async fn post_sends_json_body() {
    let app = Router::new().route("/echo", post(|Json(v): Json<serde_json::Value>| async move { Json(v) }));
    let base = serve(app).await;

    let c = UpstreamClient::new(&base, Duration::from_secs(5), quick()).unwrap();
    let body = serde_json::json!({ "handle": "someone" });
    let text = c
      .request(Method::POST, &format!("{base}/echo"), Some(&body), &CancelFlag::new())
      .await
      .unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&text).unwrap(), body);
  }

  #[tokio::test]
  async fn connection_refused_is_a_network_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = UpstreamClient::new(&format!("http://{addr}"), Duration::from_secs(5), quick()).unwrap();
    let err = c.get_text(&c.endpoint(Platform::LeetCode), &CancelFlag::new()).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
    assert!(err.is_transient());
  }

  #[tokio::test(start_paused = true)]
  async fn default_policy_backs_off_on_status_then_surfaces_it() {
    let calls = std::sync::Mutex::new(Vec::new());
    let res: Result<(), RetryError<FetchError>> = retry(&RetryPolicy::default(), &CancelFlag::new(), || {
      calls.lock().unwrap().push(tokio::time::Instant::now());
      async { Err(FetchError::Status { status: 500, status_text: "Internal Server Error".into() }) }
    })
    .await;

    let calls = calls.into_inner().unwrap();
    assert_eq!(calls.len(), 3);
    let gaps: Vec<u128> = calls.windows(2).map(|w| (w[1] - w[0]).as_millis()).collect();
    assert_eq!(gaps, vec![1000, 1500]);

    let err = FetchError::from(res.unwrap_err());
    assert!(matches!(err, FetchError::Status { status: 500, .. }));
    assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
  }
}
