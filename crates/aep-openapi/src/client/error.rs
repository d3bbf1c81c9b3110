use http::{Method, StatusCode};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
  #[error("parameter \"{name}\" not found for pattern {pattern}")]
  MissingParameter { name: String, pattern: String },

  #[error("id field not found in {body}")]
  MissingId { body: Value },

  #[error("no valid list key found in the {resource} list response")]
  NoListKey { resource: String },

  #[error("failed to build the HTTP client")]
  Build(#[source] reqwest::Error),

  #[error("{method} {url} failed")]
  Request {
    method: Method,
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{method} {url} returned {status}: {body}")]
  Status {
    method: Method,
    url: String,
    status: StatusCode,
    body: String,
  },

  #[error("{method} {url} returned errors: {payload}")]
  ErrorPayload { method: Method, url: String, payload: Value },

  #[error("{method} {url} returned invalid JSON at {path}")]
  Json {
    method: Method,
    url: String,
    path: String,
    #[source]
    inner: serde_json::Error,
  },
}
