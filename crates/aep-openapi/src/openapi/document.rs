//! Serde model of the subset of OpenAPI this crate reads and writes.
//!
//! One set of types covers both the `swagger: "2.0"` layout (flat
//! `definitions`, `schema` directly on responses and body parameters) and the
//! `openapi: 3.x` layout (`components.schemas`, `content` maps). Which fields
//! are consulted is decided by [`OasVersion`](super::OasVersion).
//!
//! Schemas keep every keyword they do not model in [`Schema::extra`], so
//! schemas that only pass through the resource graph are written back as
//! they were read.

use http::Method;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

use crate::constants::JSON_CONTENT_TYPE;

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenApi {
  pub swagger: Option<String>,
  pub openapi: Option<String>,
  #[serde(default)]
  pub info: Info,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub servers: Vec<Server>,
  pub host: Option<String>,
  #[serde(rename = "basePath")]
  pub base_path: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub schemes: Vec<String>,
  #[serde(default)]
  pub paths: IndexMap<String, PathItem>,
  pub components: Option<Components>,
  pub definitions: Option<IndexMap<String, Schema>>,
  /// Version 2 reusable parameters, the target of `#/parameters/...`.
  pub parameters: Option<IndexMap<String, Parameter>>,
  /// Version 2 reusable responses, the target of `#/responses/...`.
  pub responses: Option<IndexMap<String, Response>>,
}

impl OpenApi {
  /// Every `(path, method, operation)` triple in declared path order.
  pub fn operations(&self) -> impl Iterator<Item = (&str, Method, &Operation)> {
    self
      .paths
      .iter()
      .flat_map(|(path, item)| item.operations().map(move |(method, op)| (path.as_str(), method, op)))
  }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub version: String,
  pub description: Option<String>,
  pub contact: Option<Contact>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub name: Option<String>,
  pub email: Option<String>,
  pub url: Option<String>,
}

impl Contact {
  pub fn is_empty(&self) -> bool {
    [&self.name, &self.email, &self.url]
      .into_iter()
      .all(|field| field.as_deref().is_none_or(str::is_empty))
  }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
  pub url: String,
  pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
  #[serde(default)]
  pub schemas: IndexMap<String, Schema>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub parameters: IndexMap<String, Parameter>,
  #[serde(default, rename = "requestBodies", skip_serializing_if = "IndexMap::is_empty")]
  pub request_bodies: IndexMap<String, RequestBody>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub responses: IndexMap<String, Response>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
  pub get: Option<Operation>,
  pub put: Option<Operation>,
  pub post: Option<Operation>,
  pub delete: Option<Operation>,
  pub patch: Option<Operation>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub parameters: Vec<Parameter>,
}

impl PathItem {
  pub fn operations(&self) -> impl Iterator<Item = (Method, &Operation)> {
    [
      (Method::GET, &self.get),
      (Method::PUT, &self.put),
      (Method::POST, &self.post),
      (Method::DELETE, &self.delete),
      (Method::PATCH, &self.patch),
    ]
    .into_iter()
    .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
  }

  /// Stores `operation` under `method`. Returns `false` for methods the
  /// model has no slot for.
  pub fn set_operation(&mut self, method: &Method, operation: Operation) -> bool {
    let slot = match *method {
      Method::GET => &mut self.get,
      Method::PUT => &mut self.put,
      Method::POST => &mut self.post,
      Method::DELETE => &mut self.delete,
      Method::PATCH => &mut self.patch,
      _ => return false,
    };
    *slot = Some(operation);
    true
  }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
  #[serde(rename = "operationId")]
  pub operation_id: Option<String>,
  pub summary: Option<String>,
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub parameters: Vec<Parameter>,
  #[serde(rename = "requestBody")]
  pub request_body: Option<RequestBody>,
  #[serde(default)]
  pub responses: IndexMap<String, Response>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ParameterLocation {
  Path,
  Query,
  Header,
  Cookie,
  Body,
  FormData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceReference {
  pub resource: String,
}

/// Either an inline parameter or a `$ref` to a reusable one, in which case
/// `name` is empty and `location` is `None` until the reference is followed.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
  #[serde(rename = "$ref")]
  pub reference: Option<String>,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub name: String,
  #[serde(rename = "in")]
  pub location: Option<ParameterLocation>,
  #[serde(default)]
  pub required: bool,
  pub description: Option<String>,
  pub schema: Option<Schema>,
  #[serde(rename = "x-aep-resource-reference")]
  pub resource_reference: Option<ResourceReference>,
}

impl Parameter {
  /// Required string path parameter.
  pub fn path(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      location: Some(ParameterLocation::Path),
      required: true,
      schema: Some(Schema::of_type("string")),
      ..Self::default()
    }
  }

  /// Optional query parameter of the given JSON type.
  pub fn query(name: impl Into<String>, schema_type: &str) -> Self {
    Self {
      name: name.into(),
      location: Some(ParameterLocation::Query),
      schema: Some(Schema::of_type(schema_type)),
      ..Self::default()
    }
  }

  #[must_use]
  pub fn referencing(mut self, resource: impl Into<String>) -> Self {
    self.resource_reference = Some(ResourceReference {
      resource: resource.into(),
    });
    self
  }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
  pub schema: Option<Schema>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
  #[serde(rename = "$ref")]
  pub reference: Option<String>,
  pub description: Option<String>,
  #[serde(default)]
  pub required: bool,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub content: IndexMap<String, MediaType>,
  pub schema: Option<Schema>,
}

impl RequestBody {
  pub fn with_content(content_type: &str, schema: Schema) -> Self {
    Self {
      required: true,
      content: IndexMap::from([(content_type.to_string(), MediaType { schema: Some(schema) })]),
      ..Self::default()
    }
  }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
  #[serde(rename = "$ref")]
  pub reference: Option<String>,
  #[serde(default)]
  pub description: String,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub content: IndexMap<String, MediaType>,
  pub schema: Option<Schema>,
}

impl Response {
  pub fn with_content(description: impl Into<String>, content_type: &str, schema: Schema) -> Self {
    Self {
      description: description.into(),
      content: IndexMap::from([(content_type.to_string(), MediaType { schema: Some(schema) })]),
      ..Self::default()
    }
  }

  pub fn json(description: impl Into<String>, schema: Schema) -> Self {
    Self::with_content(description, JSON_CONTENT_TYPE, schema)
  }
}

/// `type` is a single name in 3.0 and may be a list in 3.1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
  Single(String),
  Set(Vec<String>),
}

impl SchemaType {
  pub fn includes(&self, name: &str) -> bool {
    match self {
      Self::Single(single) => single == name,
      Self::Set(set) => set.iter().any(|t| t == name),
    }
  }
}

/// The `x-aep-resource` schema extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAnnotation {
  pub singular: String,
  #[serde(default)]
  pub plural: String,
  #[serde(default)]
  pub patterns: Vec<String>,
  #[serde(default)]
  pub parents: Vec<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
  #[serde(rename = "$ref")]
  pub reference: Option<String>,
  #[serde(rename = "type")]
  pub schema_type: Option<SchemaType>,
  pub format: Option<String>,
  pub description: Option<String>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub properties: IndexMap<String, Schema>,
  pub items: Option<Box<Schema>>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub required: Vec<String>,
  #[serde(rename = "readOnly")]
  pub read_only: Option<bool>,
  #[serde(rename = "x-aep-resource")]
  pub resource: Option<ResourceAnnotation>,
  #[serde(flatten)]
  pub extra: IndexMap<String, Value>,
}

impl Schema {
  pub fn of_type(name: &str) -> Self {
    Self {
      schema_type: Some(SchemaType::Single(name.to_string())),
      ..Self::default()
    }
  }

  pub fn reference_to(target: impl Into<String>) -> Self {
    Self {
      reference: Some(target.into()),
      ..Self::default()
    }
  }

  pub fn array_of(items: Schema) -> Self {
    Self {
      items: Some(Box::new(items)),
      ..Self::of_type("array")
    }
  }

  pub fn object(properties: IndexMap<String, Schema>) -> Self {
    Self {
      properties,
      ..Self::of_type("object")
    }
  }

  pub fn is_array(&self) -> bool {
    self.schema_type.as_ref().is_some_and(|t| t.includes("array"))
  }

  /// Final `/` segment of `$ref`, the key the schema is stored under.
  pub fn reference_name(&self) -> Option<&str> {
    self
      .reference
      .as_deref()
      .and_then(reference_key)
  }
}

/// Final `/` segment of a `$ref`, or `None` when it is empty.
pub fn reference_key(reference: &str) -> Option<&str> {
  reference.rsplit('/').next().filter(|key| !key.is_empty())
}
