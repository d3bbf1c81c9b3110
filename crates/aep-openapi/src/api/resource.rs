use http::Method;

use super::pattern::{is_placeholder, placeholder_name};
use crate::openapi::Schema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetMethod;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateMethod;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteMethod;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListMethod {
  pub has_unreachable_resources: bool,
  pub supports_filter: bool,
  pub supports_skip: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateMethod {
  pub supports_user_settable_create: bool,
}

/// A non-CRUD action addressed as `<item path>:<name>`.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomMethod {
  pub name: String,
  pub method: Method,
  pub request: Option<Schema>,
  pub response: Option<Schema>,
}

/// Capability records discovered on one path, merged into a [`Resource`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
  pub get: Option<GetMethod>,
  pub list: Option<ListMethod>,
  pub create: Option<CreateMethod>,
  pub update: Option<UpdateMethod>,
  pub delete: Option<DeleteMethod>,
}

/// A node of the resource graph.
///
/// `parents` and `children` hold singulars, which are the keys of
/// [`Api::resources`](super::Api::resources). They are kept mutually
/// consistent by the builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
  pub singular: String,
  pub plural: String,
  pub parents: Vec<String>,
  pub children: Vec<String>,
  pub pattern_elems: Vec<String>,
  pub schema: Schema,
  pub get_method: Option<GetMethod>,
  pub list_method: Option<ListMethod>,
  pub create_method: Option<CreateMethod>,
  pub update_method: Option<UpdateMethod>,
  pub delete_method: Option<DeleteMethod>,
  pub custom_methods: Vec<CustomMethod>,
}

impl Resource {
  /// `pattern_elems` joined with `/`, e.g. `publishers/{publisher}`.
  pub fn pattern(&self) -> String {
    self.pattern_elems.join("/")
  }

  /// The plural with the primary parent's `singular-` prefix removed, so
  /// `book-editions` under `book` becomes `editions`.
  pub fn collection_name(&self) -> &str {
    self
      .parents
      .first()
      .and_then(|parent| self.plural.strip_prefix(parent.as_str()))
      .and_then(|rest| rest.strip_prefix('-'))
      .unwrap_or(&self.plural)
  }

  /// Placeholder names of the ancestors, i.e. every placeholder except the
  /// resource's own trailing one.
  pub fn parent_placeholders(&self) -> impl Iterator<Item = &str> {
    let ancestors = self.pattern_elems.len().saturating_sub(1);
    self.pattern_elems[..ancestors]
      .iter()
      .filter(|elem| is_placeholder(elem))
      .map(|elem| placeholder_name(elem))
  }

  pub fn capabilities(&self) -> Capabilities {
    Capabilities {
      get: self.get_method,
      list: self.list_method,
      create: self.create_method,
      update: self.update_method,
      delete: self.delete_method,
    }
  }

  /// Present records in `capabilities` replace this resource's records.
  pub fn merge(&mut self, capabilities: Capabilities) {
    if capabilities.get.is_some() {
      self.get_method = capabilities.get;
    }
    if capabilities.list.is_some() {
      self.list_method = capabilities.list;
    }
    if capabilities.create.is_some() {
      self.create_method = capabilities.create;
    }
    if capabilities.update.is_some() {
      self.update_method = capabilities.update;
    }
    if capabilities.delete.is_some() {
      self.delete_method = capabilities.delete;
    }
  }

  pub fn custom_method(&self, name: &str) -> Option<&CustomMethod> {
    self.custom_methods.iter().find(|custom| custom.name == name)
  }
}
