//! In-process stand-in for the records API, bound to an ephemeral port.

use std::{
  sync::{Arc, Mutex},
  time::Duration,
};

use axum::{
  Router,
  extract::State,
  http::{Method, StatusCode, Uri},
};

use crate::client::{ApiClient, ApiConfig};

/// `(method, path, body)` of one received request.
pub type Seen = (String, String, String);

type Reply = dyn Fn(&str, &str, &str) -> (StatusCode, String) + Send + Sync;

#[derive(Clone)]
struct MockState {
  seen:  Arc<Mutex<Vec<Seen>>>,
  reply: Arc<Reply>,
}

/// A running mock server. Every request is recorded and answered by the
/// closure passed to [`MockApi::start`], which receives the method, path and
/// body.
pub struct MockApi {
  base_url: String,
  seen:     Arc<Mutex<Vec<Seen>>>,
}

impl MockApi {
  pub async fn start<F>(reply: F) -> Self
  where
    F: Fn(&str, &str, &str) -> (StatusCode, String) + Send + Sync + 'static,
  {
    let state = MockState {
      seen:  Arc::new(Mutex::new(Vec::new())),
      reply: Arc::new(reply),
    };
    let router = Router::new().fallback(handle).with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
      .await
      .expect("bind mock api");
    let addr = listener.local_addr().expect("mock api address");
    tokio::spawn(async move {
      axum::serve(listener, router).await.ok();
    });

    Self { base_url: format!("http://{addr}"), seen: state.seen }
  }

  pub fn client(&self) -> ApiClient {
    ApiClient::new(ApiConfig {
      base_url: self.base_url.clone(),
      timeout:  Duration::from_secs(5),
    })
    .expect("client")
  }

  pub fn requests(&self) -> Vec<Seen> { self.seen.lock().unwrap().clone() }
}

async fn handle(
  State(state): State<MockState>,
  method: Method,
  uri: Uri,
  body: String,
) -> (StatusCode, String) {
  let path = uri.path().to_string();
  state
    .seen
    .lock()
    .unwrap()
    .push((method.to_string(), path.clone(), body.clone()));
  (state.reply)(method.as_str(), &path, &body)
}
