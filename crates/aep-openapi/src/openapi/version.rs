use indexmap::IndexMap;

use super::document::{OpenApi, Parameter, ParameterLocation, RequestBody, Response, Schema};
use crate::constants::{JSON_CONTENT_TYPE, MERGE_PATCH_CONTENT_TYPE};

/// Field layout of the document being read, detected once per build.
///
/// Version 2 keeps schemas under `definitions` and puts `schema` directly on
/// responses and body parameters. Version 3 nests them under
/// `components.schemas` and `content` maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum OasVersion {
  #[strum(to_string = "2.0")]
  V2,
  #[strum(to_string = "3.x")]
  V3,
}

impl OasVersion {
  /// `swagger: "2.0"` wins over an `openapi` marker. Returns `None` when
  /// neither is present.
  pub fn detect(document: &OpenApi) -> Option<Self> {
    if document.swagger.as_deref() == Some("2.0") {
      return Some(Self::V2);
    }
    match document.openapi.as_deref() {
      Some(version) if version.starts_with("2.") => Some(Self::V2),
      Some(_) => Some(Self::V3),
      None => None,
    }
  }

  pub fn schemas(self, document: &OpenApi) -> Option<&IndexMap<String, Schema>> {
    match self {
      Self::V2 => document.definitions.as_ref(),
      Self::V3 => document.components.as_ref().map(|components| &components.schemas),
    }
  }

  pub fn parameters(self, document: &OpenApi) -> Option<&IndexMap<String, Parameter>> {
    match self {
      Self::V2 => document.parameters.as_ref(),
      Self::V3 => document.components.as_ref().map(|components| &components.parameters),
    }
  }

  /// Version 2 has no reusable request bodies.
  pub fn request_bodies(self, document: &OpenApi) -> Option<&IndexMap<String, RequestBody>> {
    match self {
      Self::V2 => None,
      Self::V3 => document.components.as_ref().map(|components| &components.request_bodies),
    }
  }

  pub fn responses(self, document: &OpenApi) -> Option<&IndexMap<String, Response>> {
    match self {
      Self::V2 => document.responses.as_ref(),
      Self::V3 => document.components.as_ref().map(|components| &components.responses),
    }
  }

  pub fn response_schema(self, response: &Response) -> Option<&Schema> {
    match self {
      Self::V2 => response.schema.as_ref(),
      Self::V3 => [JSON_CONTENT_TYPE, MERGE_PATCH_CONTENT_TYPE]
        .into_iter()
        .find_map(|content_type| response.content.get(content_type))
        .and_then(|media| media.schema.as_ref()),
    }
  }

  /// `body` and `parameters` are expected to have their `$ref`s followed
  /// already.
  pub fn request_schema<'a>(self, body: Option<&'a RequestBody>, parameters: &[&'a Parameter]) -> Option<&'a Schema> {
    match self {
      Self::V2 => body.and_then(|body| body.schema.as_ref()).or_else(|| {
        parameters
          .iter()
          .find(|param| param.location == Some(ParameterLocation::Body))
          .and_then(|param| param.schema.as_ref())
      }),
      Self::V3 => body
        .and_then(|body| body.content.get(JSON_CONTENT_TYPE))
        .and_then(|media| media.schema.as_ref()),
    }
  }
}
