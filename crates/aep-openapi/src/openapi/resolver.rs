use std::collections::HashSet;

use indexmap::IndexMap;

use super::{
  OasVersion,
  document::{OpenApi, Operation, Parameter, RequestBody, Response, Schema, reference_key},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
  #[error("schema \"{reference}\" not found")]
  SchemaNotFound { reference: String },
  #[error("component \"{reference}\" not found")]
  ComponentNotFound { reference: String },
  #[error("\"{reference}\" refers back to itself")]
  CircularReference { reference: String },
}

/// Follows `$ref` pointers into the reusable containers of one document:
/// schemas, and the parameters, request bodies and responses operations may
/// point at instead of declaring inline.
#[derive(Debug, Clone, Copy)]
pub struct SchemaResolver<'a> {
  version: OasVersion,
  schemas: Option<&'a IndexMap<String, Schema>>,
  parameters: Option<&'a IndexMap<String, Parameter>>,
  request_bodies: Option<&'a IndexMap<String, RequestBody>>,
  responses: Option<&'a IndexMap<String, Response>>,
}

impl<'a> SchemaResolver<'a> {
  pub fn new(document: &'a OpenApi, version: OasVersion) -> Self {
    Self {
      version,
      schemas: version.schemas(document),
      parameters: version.parameters(document),
      request_bodies: version.request_bodies(document),
      responses: version.responses(document),
    }
  }

  pub const fn version(&self) -> OasVersion {
    self.version
  }

  pub fn get(&self, key: &str) -> Option<&'a Schema> {
    self.schemas.and_then(|schemas| schemas.get(key))
  }

  /// Like [`get`](Self::get), also returning the stored key.
  pub fn lookup(&self, key: &str) -> Option<(&'a str, &'a Schema)> {
    self
      .schemas
      .and_then(|schemas| schemas.get_key_value(key))
      .map(|(key, schema)| (key.as_str(), schema))
  }

  pub fn schemas(&self) -> impl Iterator<Item = (&'a String, &'a Schema)> {
    self.schemas.into_iter().flatten()
  }

  /// Returns the first schema along the `$ref` chain that is not itself a
  /// reference. Only the last `/` segment of each reference is used as the
  /// lookup key.
  pub fn dereference(&self, schema: &'a Schema) -> Result<&'a Schema, ResolveError> {
    follow(self.schemas, schema, |schema: &'a Schema| schema.reference.as_deref(), |reference| {
      ResolveError::SchemaNotFound { reference }
    })
  }

  pub fn parameter(&self, parameter: &'a Parameter) -> Result<&'a Parameter, ResolveError> {
    follow(
      self.parameters,
      parameter,
      |parameter: &'a Parameter| parameter.reference.as_deref(),
      component_not_found,
    )
  }

  /// The operation's parameters with every `$ref` followed.
  pub fn parameters(&self, operation: &'a Operation) -> Result<Vec<&'a Parameter>, ResolveError> {
    operation.parameters.iter().map(|parameter| self.parameter(parameter)).collect()
  }

  pub fn request_body(&self, body: &'a RequestBody) -> Result<&'a RequestBody, ResolveError> {
    follow(
      self.request_bodies,
      body,
      |body: &'a RequestBody| body.reference.as_deref(),
      component_not_found,
    )
  }

  pub fn response(&self, response: &'a Response) -> Result<&'a Response, ResolveError> {
    follow(
      self.responses,
      response,
      |response: &'a Response| response.reference.as_deref(),
      component_not_found,
    )
  }

  /// Schema of the operation's JSON request, looked up after following the
  /// body's and the parameters' references.
  pub fn request_schema(&self, operation: &'a Operation) -> Result<Option<&'a Schema>, ResolveError> {
    let body = operation
      .request_body
      .as_ref()
      .map(|body| self.request_body(body))
      .transpose()?;
    let parameters = self.parameters(operation)?;
    Ok(self.version.request_schema(body, &parameters))
  }

  pub fn response_schema(&self, response: &'a Response) -> Result<Option<&'a Schema>, ResolveError> {
    Ok(self.version.response_schema(self.response(response)?))
  }
}

fn component_not_found(reference: String) -> ResolveError {
  ResolveError::ComponentNotFound { reference }
}

fn follow<'a, T>(
  container: Option<&'a IndexMap<String, T>>,
  item: &'a T,
  reference_of: impl Fn(&'a T) -> Option<&'a str>,
  not_found: impl Fn(String) -> ResolveError,
) -> Result<&'a T, ResolveError> {
  let mut current = item;
  let mut seen = HashSet::new();

  while let Some(reference) = reference_of(current) {
    if !seen.insert(reference) {
      return Err(ResolveError::CircularReference {
        reference: reference.to_string(),
      });
    }
    current = reference_key(reference)
      .and_then(|key| container.and_then(|container| container.get(key)))
      .ok_or_else(|| not_found(reference.to_string()))?;
  }

  Ok(current)
}
