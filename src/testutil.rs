//! In-process fake upstream for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
  http::{header, StatusCode, Uri},
  Router,
};
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral localhost port; returns the base URL.
pub async fn serve(app: Router) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    let _ = axum::serve(listener, app).await;
  });
  format!("http://{addr}")
}

/// Canned-reply server that counts hits per path.
#[derive(Default)]
pub struct FakeUpstream {
  replies: HashMap<String, (StatusCode, String)>,
  hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl FakeUpstream {
  pub fn new() -> Self { Self::default() }

  pub fn reply(mut self, path: &str, status: StatusCode, body: impl Into<String>) -> Self {
    self.replies.insert(path.to_string(), (status, body.into()));
    self
  }

  pub fn json(self, path: &str, body: serde_json::Value) -> Self {
    self.reply(path, StatusCode::OK, body.to_string())
  }

  pub async fn start(&self) -> String {
    let replies = Arc::new(self.replies.clone());
    let hits = self.hits.clone();
    let app = Router::new().fallback(move |uri: Uri| {
      let replies = replies.clone();
      let hits = hits.clone();
      async move {
        let path = uri.path().to_string();
        *hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;
        let (status, body) = replies
          .get(&path)
          .cloned()
          .unwrap_or((StatusCode::NOT_FOUND, "{}".to_string()));
        (status, [(header::CONTENT_TYPE, "application/json")], body)
      }
    });
    serve(app).await
  }

  pub fn hits(&self, path: &str) -> usize {
    self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
  }
}
