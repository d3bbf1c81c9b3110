//! The resource graph and the two transformations around it: recovering it
//! from an OpenAPI document ([`Api::from_openapi`]) and writing it back out
//! as OpenAPI 3.1 ([`Api::to_openapi`]).

mod builder;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod pattern;
pub mod resource;

use indexmap::IndexMap;

pub use builder::{BuildOptions, BuildOutput};
pub use diagnostics::{BuildStats, BuildWarning};
pub use error::ApiError;
pub use generator::{ParentPattern, generate, generate_parent_patterns_with_params};
pub use pattern::PatternInfo;
pub use resource::{
  Capabilities, CreateMethod, CustomMethod, DeleteMethod, GetMethod, ListMethod, Resource, UpdateMethod,
};

use crate::openapi::{Contact, OpenApi, Schema};

/// A resource-oriented view of one API.
///
/// `resources` is an arena keyed by singular; the `parents` and `children`
/// of each [`Resource`] are keys into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Api {
  pub server_url: String,
  pub name: String,
  pub contact: Option<Contact>,
  pub resources: IndexMap<String, Resource>,
  pub schemas: IndexMap<String, Schema>,
}

impl Api {
  pub fn from_openapi(document: &OpenApi, options: &BuildOptions) -> Result<BuildOutput, ApiError> {
    builder::ApiBuilder::new(document, options)?.build()
  }

  pub fn to_openapi(&self) -> OpenApi {
    generate(self)
  }

  pub fn resource(&self, singular: &str) -> Result<&Resource, ApiError> {
    self
      .resources
      .get(singular)
      .ok_or_else(|| ApiError::ResourceNotFound(singular.to_string()))
  }

  pub fn parents<'a>(&'a self, resource: &'a Resource) -> impl Iterator<Item = &'a Resource> {
    resource.parents.iter().filter_map(|parent| self.resources.get(parent))
  }

  pub fn children<'a>(&'a self, resource: &'a Resource) -> impl Iterator<Item = &'a Resource> {
    resource.children.iter().filter_map(|child| self.resources.get(child))
  }
}

#[cfg(test)]
mod tests;
