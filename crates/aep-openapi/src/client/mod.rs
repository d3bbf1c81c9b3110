//! A small JSON client that executes the standard methods of a [`Resource`]
//! against a live server.

mod error;
pub mod path;

use http::{HeaderMap, Method};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

pub use error::ClientError;
pub use path::{base_path, encode_segment, item_url};

use crate::{
  api::Resource,
  constants::{FIELD_ERROR, FIELD_ID, FIELD_RESULTS},
  naming::{kebab_to_camel, kebab_to_pascal},
};

#[derive(Debug, Clone)]
pub struct Client {
  http: reqwest::Client,
  server_url: String,
}

impl Client {
  /// Every request carries `headers`.
  pub fn new(server_url: impl Into<String>, headers: HeaderMap) -> Result<Self, ClientError> {
    let http = reqwest::Client::builder()
      .default_headers(headers)
      .build()
      .map_err(ClientError::Build)?;
    Ok(Self::with_http_client(http, server_url))
  }

  pub fn with_http_client(http: reqwest::Client, server_url: impl Into<String>) -> Self {
    Self {
      http,
      server_url: server_url.into(),
    }
  }

  pub fn server_url(&self) -> &str {
    &self.server_url
  }

  /// POSTs `body` to the collection. When the resource accepts a
  /// caller-chosen id, the body's `id` is also sent as the `id` query
  /// parameter and must be present.
  pub async fn create(
    &self,
    resource: &Resource,
    parameters: &IndexMap<String, String>,
    body: Value,
  ) -> Result<Value, ClientError> {
    let suffix = if resource
      .create_method
      .is_some_and(|create| create.supports_user_settable_create)
    {
      let id = match body.get(FIELD_ID) {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err(ClientError::MissingId { body }),
      };
      format!("?{FIELD_ID}={}", encode_segment(&id))
    } else {
      String::new()
    };

    let url = base_path(resource, &self.server_url, parameters, &suffix)?;
    self.send(Method::POST, url, Some(body)).await
  }

  /// GETs the collection and returns the object items of its list field.
  pub async fn list(
    &self,
    resource: &Resource,
    parameters: &IndexMap<String, String>,
  ) -> Result<Vec<Value>, ClientError> {
    let url = base_path(resource, &self.server_url, parameters, "")?;
    let response = self.send(Method::GET, url, None).await?;

    let keys = [
      FIELD_RESULTS.to_string(),
      resource.plural.clone(),
      kebab_to_camel(&resource.plural),
      kebab_to_pascal(&resource.plural),
    ];
    keys
      .iter()
      .find_map(|key| response.get(key).and_then(Value::as_array))
      .map(|items| items.iter().filter(|item| item.is_object()).cloned().collect())
      .ok_or_else(|| ClientError::NoListKey {
        resource: resource.singular.clone(),
      })
  }

  /// `path` is the resource's own path, e.g. `publishers/acme/books/dune`.
  pub async fn get(&self, path: &str) -> Result<Value, ClientError> {
    self.send(Method::GET, item_url(&self.server_url, path), None).await
  }

  pub async fn get_with_full_url(&self, url: &str) -> Result<Value, ClientError> {
    self.send(Method::GET, url.to_string(), None).await
  }

  pub async fn update(&self, path: &str, body: Value) -> Result<Value, ClientError> {
    self
      .send(Method::PATCH, item_url(&self.server_url, path), Some(body))
      .await
  }

  pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
    self.send(Method::DELETE, item_url(&self.server_url, path), None).await?;
    Ok(())
  }

  async fn send(&self, method: Method, url: String, body: Option<Value>) -> Result<Value, ClientError> {
    let mut request = self.http.request(method.clone(), &url);
    if let Some(body) = body {
      let body = without_nulls(body);
      debug!(%method, url, %body, "sending request");
      request = request.json(&body);
    } else {
      debug!(%method, url, "sending request");
    }

    let response = match request.send().await {
      Ok(response) => response,
      Err(source) => return Err(ClientError::Request { method, url, source }),
    };
    let status = response.status();
    let bytes = match response.bytes().await {
      Ok(bytes) => bytes,
      Err(source) => return Err(ClientError::Request { method, url, source }),
    };
    debug!(%method, url, %status, len = bytes.len(), "received response");

    if !status.is_success() {
      return Err(ClientError::Status {
        method,
        url,
        status,
        body: String::from_utf8_lossy(&bytes).into_owned(),
      });
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
      return Ok(Value::Object(Map::new()));
    }

    let mut de = serde_json::Deserializer::from_slice(&bytes);
    let value: Value = match serde_path_to_error::deserialize(&mut de) {
      Ok(value) => value,
      Err(err) => {
        return Err(ClientError::Json {
          method,
          url,
          path: err.path().to_string(),
          inner: err.into_inner(),
        });
      }
    };

    if let Some(payload) = value.get(FIELD_ERROR) {
      return Err(ClientError::ErrorPayload {
        method,
        url,
        payload: payload.clone(),
      });
    }

    Ok(value)
  }
}

/// Drops top-level `null` fields.
fn without_nulls(mut body: Value) -> Value {
  if let Value::Object(fields) = &mut body {
    fields.retain(|_, value| !value.is_null());
  }
  body
}
