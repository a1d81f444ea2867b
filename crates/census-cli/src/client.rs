//! Async HTTP client wrapping the citizen-records JSON API.

use std::{future::Future, time::Duration};

use census_core::{
  citizen::{Citizen, CitizenId, Village},
  service::RecordService,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

const CITIZENS: &str = "/api/add_citizen/";
const VILLAGES: &str = "/api/add_citizen_page/";

/// Connection settings for the records API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub timeout:  Duration,
}

/// A failed API call.
#[derive(Debug, Error)]
pub enum ClientError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("{status}: {message}")]
  Status { status: StatusCode, message: String },

  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("unexpected response from {path}: {source}")]
  Decode {
    path:   String,
    #[source]
    source: serde_json::Error,
  },
}

/// Async HTTP client for the records API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn citizen_path(id: &CitizenId) -> String { format!("{CITIZENS}{id}") }

  /// Send `req` and return the body of a 2xx response.
  async fn send(
    &self,
    req: RequestBuilder,
    method: Method,
    path: &str,
  ) -> Result<String, ClientError> {
    debug!(%method, path, "request");
    let resp = req.send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    debug!(%method, path, %status, "response");

    if status == StatusCode::NOT_FOUND {
      return Err(ClientError::NotFound(path.to_string()));
    }
    if !status.is_success() {
      return Err(ClientError::Status {
        status,
        message: error_message(status, &body),
      });
    }
    Ok(body)
  }

  async fn request<T: DeserializeOwned>(
    &self,
    method: Method,
    path: &str,
    body: Option<&Citizen>,
  ) -> Result<Option<T>, ClientError> {
    let mut req = self.client.request(method.clone(), self.url(path));
    if let Some(body) = body {
      req = req.json(body);
    }
    let text = self.send(req, method, path).await?;
    if text.trim().is_empty() {
      return Ok(None);
    }
    serde_json::from_str(&text)
      .map(Some)
      .map_err(|source| ClientError::Decode { path: path.to_string(), source })
  }

  // ── Citizens ──────────────────────────────────────────────────────────────

  /// `GET /api/add_citizen/`
  pub async fn list_citizens(&self) -> Result<Vec<Citizen>, ClientError> {
    Ok(self.request(Method::GET, CITIZENS, None).await?.unwrap_or_default())
  }

  /// `GET /api/add_citizen/{id}`
  pub async fn get_citizen(&self, id: &CitizenId) -> Result<Citizen, ClientError> {
    let path = Self::citizen_path(id);
    let found = self.request(Method::GET, &path, None).await?;
    found.ok_or(ClientError::NotFound(path))
  }

  /// `POST /api/add_citizen/`
  ///
  /// An empty response body yields the submitted record back.
  pub async fn create_citizen(&self, record: &Citizen) -> Result<Citizen, ClientError> {
    let created = self.request(Method::POST, CITIZENS, Some(record)).await?;
    Ok(created.unwrap_or_else(|| record.clone()))
  }

  /// `PUT /api/add_citizen/{id}`
  pub async fn update_citizen(
    &self,
    id: &CitizenId,
    record: &Citizen,
  ) -> Result<Citizen, ClientError> {
    let path = Self::citizen_path(id);
    let updated = self.request(Method::PUT, &path, Some(record)).await?;
    Ok(updated.unwrap_or_else(|| Citizen { id: Some(id.clone()), ..record.clone() }))
  }

  /// `DELETE /api/add_citizen/{id}`
  pub async fn delete_citizen(&self, id: &CitizenId) -> Result<(), ClientError> {
    let path = Self::citizen_path(id);
    let req = self.client.delete(self.url(&path));
    self.send(req, Method::DELETE, &path).await?;
    Ok(())
  }

  // ── Villages ──────────────────────────────────────────────────────────────

  /// `GET /api/add_citizen_page/`
  pub async fn list_villages(&self) -> Result<Vec<Village>, ClientError> {
    Ok(self.request(Method::GET, VILLAGES, None).await?.unwrap_or_default())
  }
}

/// Pick a human-readable message out of an error response body.
///
/// Prefers a `message`, `detail` or `error` string in a JSON object, falls
/// back to the raw body, then to the status reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
  let body = body.trim();
  if body.is_empty() {
    return status
      .canonical_reason()
      .unwrap_or("request failed")
      .to_string();
  }
  if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(body) {
    for key in ["message", "detail", "error"] {
      if let Some(serde_json::Value::String(msg)) = map.get(key) {
        return msg.clone();
      }
    }
  }
  body.to_string()
}

// ─── RecordService ────────────────────────────────────────────────────────────

impl RecordService for ApiClient {
  type Error = ClientError;

  fn list(&self) -> impl Future<Output = Result<Vec<Citizen>, ClientError>> + Send + '_ {
    self.list_citizens()
  }

  fn get_by_id<'a>(
    &'a self,
    id: &'a CitizenId,
  ) -> impl Future<Output = Result<Citizen, ClientError>> + Send + 'a {
    self.get_citizen(id)
  }

  fn create<'a>(
    &'a self,
    record: &'a Citizen,
  ) -> impl Future<Output = Result<Citizen, ClientError>> + Send + 'a {
    self.create_citizen(record)
  }

  fn update<'a>(
    &'a self,
    id: &'a CitizenId,
    record: &'a Citizen,
  ) -> impl Future<Output = Result<Citizen, ClientError>> + Send + 'a {
    self.update_citizen(id, record)
  }

  fn delete<'a>(
    &'a self,
    id: &'a CitizenId,
  ) -> impl Future<Output = Result<(), ClientError>> + Send + 'a {
    self.delete_citizen(id)
  }

  fn list_villages(
    &self,
  ) -> impl Future<Output = Result<Vec<Village>, ClientError>> + Send + '_ {
    ApiClient::list_villages(self)
  }
}
