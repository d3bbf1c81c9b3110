use std::{ffi::OsStr, path::Path};

use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use http::Uri;

use super::document::OpenApi;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
  #[error("failed to read '{path}': {source}")]
  Read {
    path: String,
    #[source]
    source: fmmap::error::Error,
  },

  #[cfg(feature = "client")]
  #[error("failed to fetch '{url}': {source}")]
  Fetch {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[cfg(not(feature = "client"))]
  #[error("fetching '{url}' requires the `client` feature")]
  RemoteUnsupported { url: String },

  #[error("JSON deserialization error at path {path}: {inner}")]
  Json { path: String, inner: serde_json::Error },

  #[error("YAML deserialization error: {0}")]
  Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
  #[default]
  Json,
  Yaml,
}

impl DocumentFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Option<Self> {
    match ext {
      "yaml" | "yml" => Some(Self::Yaml),
      "json" => Some(Self::Json),
      _ => None,
    }
  }

  /// Used when the extension is missing or unknown: anything that does not
  /// open with `{` is treated as YAML.
  #[must_use]
  pub fn sniff(bytes: &[u8]) -> Self {
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
      Some(b'{') => Self::Json,
      _ => Self::Yaml,
    }
  }

  fn for_path(path: &str, bytes: &[u8]) -> Self {
    Path::new(path)
      .extension()
      .and_then(OsStr::to_str)
      .and_then(Self::from_extension)
      .unwrap_or_else(|| Self::sniff(bytes))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
  File(String),
  Url(String),
}

impl DocumentSource {
  /// `http://` and `https://` URIs are fetched; anything else is a file path.
  pub fn parse(location: &str) -> Self {
    let is_remote = location
      .parse::<Uri>()
      .ok()
      .and_then(|uri| uri.scheme_str().map(str::to_ascii_lowercase))
      .is_some_and(|scheme| scheme == "http" || scheme == "https");

    if is_remote {
      Self::Url(location.to_string())
    } else {
      Self::File(location.to_string())
    }
  }

  pub fn location(&self) -> &str {
    match self {
      Self::File(path) | Self::Url(path) => path,
    }
  }
}

/// Loads and parses the document at `location`, a file path or an HTTP(S) URL.
pub async fn load_document(location: &str) -> Result<OpenApi, LoadError> {
  let source = DocumentSource::parse(location);
  tracing::debug!(location, "loading OpenAPI document");

  match &source {
    DocumentSource::File(path) => {
      let file = AsyncMmapFile::open(path).await.map_err(|source| LoadError::Read {
        path: path.clone(),
        source,
      })?;
      let bytes = file.as_slice();
      parse_document(bytes, DocumentFormat::for_path(path, bytes))
    }
    DocumentSource::Url(url) => {
      let bytes = fetch(url).await?;
      let uri_path = url.parse::<Uri>().map(|uri| uri.path().to_string()).unwrap_or_default();
      parse_document(&bytes, DocumentFormat::for_path(&uri_path, &bytes))
    }
  }
}

#[cfg(feature = "client")]
async fn fetch(url: &str) -> Result<Vec<u8>, LoadError> {
  let fetch_error = |source| LoadError::Fetch {
    url: url.to_string(),
    source,
  };
  let response = reqwest::get(url)
    .await
    .and_then(reqwest::Response::error_for_status)
    .map_err(fetch_error)?;
  let bytes = response.bytes().await.map_err(fetch_error)?;
  Ok(bytes.to_vec())
}

#[cfg(not(feature = "client"))]
async fn fetch(url: &str) -> Result<Vec<u8>, LoadError> {
  Err(LoadError::RemoteUnsupported { url: url.to_string() })
}

pub fn parse_document(bytes: &[u8], format: DocumentFormat) -> Result<OpenApi, LoadError> {
  match format {
    DocumentFormat::Json => {
      let mut de = serde_json::Deserializer::from_slice(bytes);
      serde_path_to_error::deserialize(&mut de).map_err(|err| LoadError::Json {
        path: err.path().to_string(),
        inner: err.into_inner(),
      })
    }
    DocumentFormat::Yaml => Ok(serde_yaml::from_slice(bytes)?),
  }
}
