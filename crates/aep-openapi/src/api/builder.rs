//! Recovers the resource graph from the paths of an OpenAPI document.
//!
//! Paths are visited in declared order. Each resource-shaped path
//! contributes capability records and a candidate body schema; the schema's
//! `$ref` name decides which resource the records are merged into, so the
//! same resource described by several paths ends up as one node. Custom
//! methods are collected by base pattern and attached once every path has
//! been seen.

use std::collections::HashSet;

use http::Method;
use indexmap::IndexMap;
use tracing::debug;

use super::{
  Api,
  diagnostics::{BuildStats, BuildWarning},
  error::ApiError,
  pattern::{PatternInfo, placeholder_name},
  resource::{Capabilities, CreateMethod, CustomMethod, DeleteMethod, GetMethod, ListMethod, Resource, UpdateMethod},
};
use crate::{
  constants::{FIELD_FILTER, FIELD_ID, FIELD_SKIP, FIELD_UNREACHABLE, OK_STATUS},
  naming::{kebab_to_pascal, pascal_to_kebab},
  openapi::{OasVersion, OpenApi, Operation, Parameter, PathItem, Response, Schema, SchemaResolver},
};

/// Inputs of a build besides the document itself.
///
/// An empty `server_url` means "use the document's first server". Only paths
/// starting with `path_prefix` are considered, and the prefix is stripped
/// before classification and appended to the document's server URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, bon::Builder)]
pub struct BuildOptions {
  #[builder(default, into)]
  pub server_url: String,
  #[builder(default, into)]
  pub path_prefix: String,
}

#[derive(Debug, Clone)]
pub struct BuildOutput {
  pub api: Api,
  pub stats: BuildStats,
}

pub(super) struct ApiBuilder<'a> {
  document: &'a OpenApi,
  options: &'a BuildOptions,
  resolver: SchemaResolver<'a>,
  resources: IndexMap<String, Resource>,
  claimed: HashSet<&'a str>,
  custom_methods: IndexMap<String, Vec<CustomMethod>>,
  stats: BuildStats,
}

impl<'a> ApiBuilder<'a> {
  pub(super) fn new(document: &'a OpenApi, options: &'a BuildOptions) -> Result<Self, ApiError> {
    let version = OasVersion::detect(document).ok_or(ApiError::UndetectedVersion)?;
    debug!(%version, paths = document.paths.len(), "building resource graph");

    Ok(Self {
      document,
      options,
      resolver: SchemaResolver::new(document, version),
      resources: IndexMap::new(),
      claimed: HashSet::new(),
      custom_methods: IndexMap::new(),
      stats: BuildStats::default(),
    })
  }

  pub(super) fn build(mut self) -> Result<BuildOutput, ApiError> {
    let document = self.document;
    for (path, item) in &document.paths {
      self.visit_path(path, item)?;
    }

    self.attach_custom_methods();
    let server_url = self.server_url()?;
    let schemas = self.unclaimed_schemas();

    self.stats.record_resources(self.resources.len());
    self.stats.record_schemas(schemas.len());

    let api = Api {
      server_url,
      name: document.info.title.clone(),
      contact: document.info.contact.clone().filter(|contact| !contact.is_empty()),
      resources: self.resources,
      schemas,
    };

    Ok(BuildOutput { api, stats: self.stats })
  }

  const fn version(&self) -> OasVersion {
    self.resolver.version()
  }

  fn visit_path(&mut self, path: &str, item: &'a PathItem) -> Result<(), ApiError> {
    let prefix = self.options.path_prefix.as_str();
    let Some(trimmed) = path.strip_prefix(prefix).filter(|rest| rest.starts_with('/')) else {
      debug!(path, prefix, "path is outside the prefix");
      self.stats.record_skipped_path();
      return Ok(());
    };

    let Some(info) = PatternInfo::classify(trimmed) else {
      debug!(path, "path is not resource-shaped");
      self.stats.record_skipped_path();
      return Ok(());
    };
    self.stats.record_path();

    if let Some(name) = info.custom_method_name.as_deref() {
      if !info.is_resource_pattern {
        self.stats.record_warning(BuildWarning::CollectionCustomMethod { path: path.to_string() });
        return Ok(());
      }
      return self.collect_custom_methods(path, trimmed, name, item);
    }

    let (candidate, capabilities) = if info.is_resource_pattern {
      self.inspect_item(item)?
    } else {
      self.inspect_collection(path, item)?
    };

    let Some(candidate) = candidate else {
      return Ok(());
    };
    let Some(key) = candidate.reference_name() else {
      self.stats.record_warning(BuildWarning::AnonymousResourceSchema { path: path.to_string() });
      return Ok(());
    };

    let base = trimmed.split_once(':').map_or(trimmed, |(base, _)| base);
    let mut pattern: Vec<String> = base.split('/').skip(1).map(ToString::to_string).collect();
    let collection_end = if info.is_resource_pattern {
      pattern.len() - 1
    } else {
      pattern.len()
    };
    let singular = nested_singular(&pattern[..collection_end], pascal_to_kebab(key));
    if !info.is_resource_pattern {
      pattern.push(format!("{{{singular}}}"));
    }

    let schema = self.resolver.dereference(candidate)?;
    self.claimed.insert(key);

    let singular = self.obtain(&singular, pattern, schema, &mut Vec::new())?;
    if let Some(resource) = self.resources.get_mut(&singular) {
      resource.merge(capabilities);
    }

    Ok(())
  }

  fn inspect_item(&self, item: &'a PathItem) -> Result<(Option<&'a Schema>, Capabilities), ApiError> {
    let mut candidate = None;
    let mut capabilities = Capabilities::default();

    if item.delete.is_some() {
      capabilities.delete = Some(DeleteMethod);
    }
    if let Some(response) = ok_response(item.get.as_ref()) {
      capabilities.get = Some(GetMethod);
      candidate = self.resolver.response_schema(response)?;
    }
    if let Some(response) = ok_response(item.patch.as_ref()) {
      capabilities.update = Some(UpdateMethod);
      candidate = self.resolver.response_schema(response)?.or(candidate);
    }

    Ok((candidate, capabilities))
  }

  fn inspect_collection(
    &mut self,
    path: &str,
    item: &'a PathItem,
  ) -> Result<(Option<&'a Schema>, Capabilities), ApiError> {
    let mut candidate = None;
    let mut capabilities = Capabilities::default();

    if let Some(post) = &item.post
      && let Some(response) = post.responses.get(OK_STATUS)
    {
      candidate = self.resolver.response_schema(response)?;
      capabilities.create = Some(CreateMethod {
        supports_user_settable_create: self.resolver.parameters(post)?.iter().any(|param| param.name == FIELD_ID),
      });
    }

    if let Some(get) = &item.get
      && let Some(response) = get.responses.get(OK_STATUS)
    {
      let Some(schema) = self.resolver.response_schema(response)? else {
        self.stats.record_warning(BuildWarning::UnresolvedListShape {
          path: path.to_string(),
          reason: "the response schema is missing".to_string(),
        });
        return Ok((candidate, capabilities));
      };

      let resolved = self.resolver.dereference(schema)?;
      let items = resolved
        .properties
        .values()
        .find(|property| property.is_array())
        .and_then(|array| array.items.as_deref());

      match items {
        Some(items) => {
          candidate = Some(items);
          capabilities.list = Some(list_method(&self.resolver.parameters(get)?, resolved));
        }
        None => self.stats.record_warning(BuildWarning::UnresolvedListShape {
          path: path.to_string(),
          reason: "no array property with items is present".to_string(),
        }),
      }
    }

    Ok((candidate, capabilities))
  }

  fn collect_custom_methods(&mut self, path: &str, trimmed: &str, name: &str, item: &'a PathItem) -> Result<(), ApiError> {
    let base = trimmed
      .split_once(':')
      .map_or(trimmed, |(base, _)| base)
      .trim_start_matches('/')
      .to_string();
    let mut methods = Vec::new();

    if let Some(post) = &item.post
      && let Some(response) = post.responses.get(OK_STATUS)
    {
      let response = self.resolve_optional(self.resolver.response_schema(response)?)?;
      let request = self
        .resolver
        .request_schema(post)?
        .ok_or_else(|| ApiError::MissingRequestBody {
          name: name.to_string(),
          path: path.to_string(),
        })?;
      let request = self.resolver.dereference(request)?.clone();

      methods.push(CustomMethod {
        name: name.to_string(),
        method: Method::POST,
        request: Some(request),
        response,
      });
    }

    if let Some(response) = ok_response(item.get.as_ref()) {
      let response = self.resolve_optional(self.resolver.response_schema(response)?)?;
      methods.push(CustomMethod {
        name: name.to_string(),
        method: Method::GET,
        request: None,
        response,
      });
    }

    self.custom_methods.entry(base).or_default().extend(methods);
    Ok(())
  }

  fn resolve_optional(&self, schema: Option<&'a Schema>) -> Result<Option<Schema>, ApiError> {
    Ok(schema.map(|schema| self.resolver.dereference(schema)).transpose()?.cloned())
  }

  /// Returns the singular of the resource `schema` describes, creating the
  /// node (and, through its annotation, its ancestors) on first sight.
  /// `lineage` holds the singulars currently being created, so an
  /// annotation whose parent chain loops back is rejected.
  fn obtain(
    &mut self,
    singular: &str,
    pattern: Vec<String>,
    schema: &'a Schema,
    lineage: &mut Vec<String>,
  ) -> Result<String, ApiError> {
    let annotation = schema.resource.as_ref();
    let singular = annotation.map_or(singular, |annotation| annotation.singular.as_str()).to_string();

    if let Some(existing) = self.resources.get_mut(&singular) {
      if existing.pattern_elems.is_empty() && !pattern.is_empty() {
        if existing.plural.is_empty() {
          existing.plural = collection_literal(&pattern);
        }
        existing.pattern_elems = pattern;
      }
      return Ok(singular);
    }

    if lineage.contains(&singular) {
      return Err(ApiError::CircularParent { resource: singular });
    }

    let pattern_elems = annotation
      .and_then(|annotation| annotation.patterns.first())
      .map_or(pattern, |declared| split_pattern(declared));
    let plural = annotation
      .map(|annotation| annotation.plural.clone())
      .filter(|plural| !plural.is_empty())
      .unwrap_or_else(|| collection_literal(&pattern_elems));

    let mut resource = Resource {
      singular: singular.clone(),
      plural,
      pattern_elems,
      schema: schema.clone(),
      ..Resource::default()
    };

    if let Some(annotation) = annotation {
      lineage.push(singular.clone());
      for parent in &annotation.parents {
        let (key, parent_schema) = self.parent_schema(parent).ok_or_else(|| ApiError::ParentSchemaNotFound {
          resource: singular.clone(),
          parent: parent.clone(),
        })?;
        self.claimed.insert(key);

        let parent_schema = self.resolver.dereference(parent_schema)?;
        let parent_singular = self.obtain(parent, Vec::new(), parent_schema, lineage)?;
        if let Some(parent_resource) = self.resources.get_mut(&parent_singular)
          && !parent_resource.children.contains(&singular)
        {
          parent_resource.children.push(singular.clone());
        }
        if !resource.parents.contains(&parent_singular) {
          resource.parents.push(parent_singular);
        }
      }
      lineage.pop();
    }

    self.resources.insert(singular.clone(), resource);
    Ok(singular)
  }

  /// Annotation parents name singulars. Documents written by the generator
  /// store schemas under the singular; others usually use PascalCase keys.
  fn parent_schema(&self, parent: &str) -> Option<(&'a str, &'a Schema)> {
    self
      .resolver
      .lookup(parent)
      .or_else(|| self.resolver.lookup(&kebab_to_pascal(parent)))
  }

  fn attach_custom_methods(&mut self) {
    for (pattern, methods) in std::mem::take(&mut self.custom_methods) {
      if methods.is_empty() {
        continue;
      }

      match self.resources.values_mut().find(|resource| resource.pattern() == pattern) {
        Some(resource) => {
          self.stats.record_custom_methods(methods.len());
          resource.custom_methods.extend(methods);
        }
        None => self.stats.record_warning(BuildWarning::UnattachedCustomMethods {
          pattern,
          count: methods.len(),
        }),
      }
    }
  }

  fn server_url(&self) -> Result<String, ApiError> {
    if !self.options.server_url.is_empty() {
      return Ok(self.options.server_url.clone());
    }

    let declared = match self.document.servers.first() {
      Some(server) => Some(server.url.clone()),
      None if self.version() == OasVersion::V2 => self.document.host.as_ref().map(|host| {
        let scheme = self.document.schemes.first().map_or("https", String::as_str);
        let base_path = self.document.base_path.as_deref().unwrap_or_default().trim_end_matches('/');
        format!("{scheme}://{host}{base_path}")
      }),
      None => None,
    };

    declared
      .filter(|url| !url.is_empty())
      .map(|url| format!("{url}{}", self.options.path_prefix))
      .ok_or(ApiError::NoServerUrl)
  }

  fn unclaimed_schemas(&self) -> IndexMap<String, Schema> {
    self
      .resolver
      .schemas()
      .filter(|(key, _)| !self.claimed.contains(key.as_str()) && !self.resources.contains_key(key.as_str()))
      .map(|(key, schema)| (key.clone(), schema.clone()))
      .collect()
  }
}

fn ok_response(operation: Option<&Operation>) -> Option<&Response> {
  operation?.responses.get(OK_STATUS)
}

/// Flags come from the declared query parameters. A response carrying an
/// `unreachable` property also marks unreachable resources, which is how
/// generated documents express it.
fn list_method(parameters: &[&Parameter], response: &Schema) -> ListMethod {
  let mut list = ListMethod {
    has_unreachable_resources: response.properties.contains_key(FIELD_UNREACHABLE),
    ..ListMethod::default()
  };
  for param in parameters {
    match param.name.as_str() {
      FIELD_SKIP => list.supports_skip = true,
      FIELD_UNREACHABLE => list.has_unreachable_resources = true,
      FIELD_FILTER => list.supports_filter = true,
      _ => {}
    }
  }
  list
}

/// Strips the enclosing parent's name from the front of a derived singular.
/// `segments` ends with the collection literal; when a parent placeholder
/// precedes it, `book-edition` under `{book}` becomes `edition`.
fn nested_singular(segments: &[String], singular: String) -> String {
  if segments.len() >= 3 {
    let parent = placeholder_name(&segments[segments.len() - 2]);
    if let Some(rest) = singular.strip_prefix(parent).and_then(|rest| rest.strip_prefix('-'))
      && !rest.is_empty()
    {
      return rest.to_string();
    }
  }
  singular
}

/// The literal right before the trailing placeholder.
fn collection_literal(pattern: &[String]) -> String {
  pattern
    .len()
    .checked_sub(2)
    .and_then(|index| pattern.get(index))
    .cloned()
    .unwrap_or_default()
}

fn split_pattern(pattern: &str) -> Vec<String> {
  pattern.trim_start_matches('/').split('/').map(ToString::to_string).collect()
}
