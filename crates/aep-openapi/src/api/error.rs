use crate::openapi::ResolveError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
  #[error("unable to detect the OpenAPI version: add a `swagger: \"2.0\"` or an `openapi` field")]
  UndetectedVersion,

  #[error("no server URL found in the document, and none was provided")]
  NoServerUrl,

  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error("resource \"{resource}\" parent \"{parent}\" not found")]
  ParentSchemaNotFound { resource: String, parent: String },

  #[error("resource \"{resource}\" is its own ancestor")]
  CircularParent { resource: String },

  #[error("custom method \"{name}\" on {path} has a POST response but no request body")]
  MissingRequestBody { name: String, path: String },

  #[error("resource \"{0}\" not found")]
  ResourceNotFound(String),
}
