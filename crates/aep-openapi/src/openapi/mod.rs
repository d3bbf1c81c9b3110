//! OpenAPI document model, version dispatch, `$ref` resolution and loading.

pub mod document;
pub mod loader;
pub mod resolver;
pub mod version;

pub use document::{
  Components, Contact, Info, MediaType, OpenApi, Operation, Parameter, ParameterLocation, PathItem, RequestBody,
  ResourceAnnotation, ResourceReference, Response, Schema, SchemaType, Server,
};
pub use loader::{DocumentFormat, DocumentSource, LoadError, load_document, parse_document};
pub use resolver::{ResolveError, SchemaResolver};
pub use version::OasVersion;

#[cfg(test)]
mod tests;
