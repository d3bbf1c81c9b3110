//! Writes a resource graph back out as an OpenAPI 3.1 document.
//!
//! Every resource is emitted under every parent path it can be reached by,
//! with the standard operation ids (`ListWidget`, `CreateWidget`, ...), and
//! its schema is stored under its singular carrying an `x-aep-resource`
//! annotation that lets the builder read the document back losslessly.

use http::Method;
use indexmap::IndexMap;
use tracing::debug;

use super::{Api, pattern::placeholder_name, resource::CustomMethod, resource::Resource};
use crate::{
  constants::{
    FIELD_FILTER, FIELD_FORCE, FIELD_ID, FIELD_MAX_PAGE_SIZE, FIELD_NEXT_PAGE_TOKEN, FIELD_PAGE_TOKEN, FIELD_RESULTS,
    FIELD_SKIP, FIELD_UNREACHABLE, GENERATED_INFO_VERSION, GENERATED_OPENAPI_VERSION, JSON_CONTENT_TYPE,
    MERGE_PATCH_CONTENT_TYPE, NO_CONTENT_STATUS, OK_STATUS, SCHEMA_REF_PREFIX, SUCCESS_DESCRIPTION,
  },
  naming::kebab_to_pascal,
  openapi::{
    Components, Contact, Info, OpenApi, Operation, Parameter, PathItem, RequestBody, ResourceAnnotation, Response,
    Schema, Server,
  },
};

/// One way of reaching a resource's collection: the path up to (not
/// including) the collection segment, and the path parameters it declares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParentPattern {
  pub pattern: String,
  pub params: Vec<Parameter>,
}

/// Returns the resource's collection segment (with its leading `/`) and
/// every parent path variant it lives under.
///
/// A resource with pattern elements has exactly one variant, read off those
/// elements. Otherwise the variants are the union over its declared parents
/// of `/<parent collection>/{<parent>}`, each prefixed by that parent's own
/// variants. Root resources yield no variants.
pub fn generate_parent_patterns_with_params(api: &Api, resource: &Resource) -> (String, Vec<ParentPattern>) {
  parent_patterns(api, resource, &mut Vec::new())
}

fn parent_patterns<'a>(
  api: &'a Api,
  resource: &'a Resource,
  lineage: &mut Vec<&'a str>,
) -> (String, Vec<ParentPattern>) {
  let elems = &resource.pattern_elems;
  if elems.len() >= 2 {
    let ancestors = &elems[..elems.len() - 2];
    let params = ancestors
      .iter()
      .skip(1)
      .step_by(2)
      .map(|elem| Parameter::path(placeholder_name(elem)))
      .collect();
    let pattern = if ancestors.is_empty() {
      String::new()
    } else {
      format!("/{}", ancestors.join("/"))
    };
    return (format!("/{}", elems[elems.len() - 2]), vec![ParentPattern { pattern, params }]);
  }

  let collection = format!("/{}", resource.collection_name());
  let mut variants = Vec::new();
  lineage.push(&resource.singular);

  for parent in api.parents(resource) {
    if lineage.contains(&parent.singular.as_str()) {
      debug!(resource = %resource.singular, parent = %parent.singular, "skipping cyclic parent");
      continue;
    }

    let base_pattern = format!("/{}/{{{}}}", parent.collection_name(), parent.singular);
    let base_param = Parameter::path(&parent.singular).referencing(&parent.singular);

    if parent.parents.is_empty() {
      variants.push(ParentPattern {
        pattern: base_pattern,
        params: vec![base_param],
      });
      continue;
    }

    let (_, grand_variants) = parent_patterns(api, parent, lineage);
    for grand in grand_variants {
      let mut params = grand.params;
      params.push(base_param.clone());
      variants.push(ParentPattern {
        pattern: format!("{}{base_pattern}", grand.pattern),
        params,
      });
    }
  }

  lineage.pop();
  (collection, variants)
}

/// Converts `api` into an OpenAPI 3.1 document. The graph is not modified;
/// annotated copies of the resource schemas are written to the output.
pub fn generate(api: &Api) -> OpenApi {
  let mut paths: IndexMap<String, PathItem> = IndexMap::new();
  let mut schemas: IndexMap<String, Schema> = IndexMap::new();

  for resource in api.resources.values() {
    let (collection, mut variants) = generate_parent_patterns_with_params(api, resource);
    if variants.is_empty() {
      variants.push(ParentPattern::default());
    }

    let emitter = OperationEmitter::new(resource, !resource.children.is_empty());
    let mut patterns = Vec::with_capacity(variants.len());

    for variant in &variants {
      let collection_path = format!("{}{collection}", variant.pattern);
      let item_path = format!("{collection_path}/{{{}}}", resource.singular);
      patterns.push(item_path.trim_start_matches('/').to_string());

      if resource.list_method.is_some() {
        add_operation(&mut paths, &collection_path, &Method::GET, emitter.list(variant));
      }
      if resource.create_method.is_some() {
        add_operation(&mut paths, &collection_path, &Method::POST, emitter.create(variant));
      }
      if resource.get_method.is_some() {
        add_operation(&mut paths, &item_path, &Method::GET, emitter.get(variant));
      }
      if resource.update_method.is_some() {
        add_operation(&mut paths, &item_path, &Method::PATCH, emitter.update(variant));
      }
      if resource.delete_method.is_some() {
        add_operation(&mut paths, &item_path, &Method::DELETE, emitter.delete(variant));
      }
      for custom in &resource.custom_methods {
        let custom_path = format!("{item_path}:{}", custom.name);
        add_operation(&mut paths, &custom_path, &custom.method, emitter.custom(variant, custom));
      }
    }

    let mut schema = resource.schema.clone();
    schema.resource = Some(ResourceAnnotation {
      singular: resource.singular.clone(),
      plural: resource.plural.clone(),
      patterns,
      parents: resource.parents.clone(),
    });
    schemas.insert(resource.singular.clone(), schema);
  }

  for (name, schema) in &api.schemas {
    schemas.insert(name.clone(), schema.clone());
  }

  OpenApi {
    openapi: Some(GENERATED_OPENAPI_VERSION.to_string()),
    servers: vec![Server {
      url: api.server_url.clone(),
      description: None,
    }],
    info: Info {
      title: api.name.clone(),
      version: GENERATED_INFO_VERSION.to_string(),
      description: Some(format!("An API for {}", api.name)),
      contact: api.contact.as_ref().map(|contact| Contact {
        name: contact.name.clone(),
        email: contact.email.clone(),
        url: contact.url.clone(),
      }),
    },
    paths,
    components: Some(Components {
      schemas,
      ..Components::default()
    }),
    ..OpenApi::default()
  }
}

fn add_operation(paths: &mut IndexMap<String, PathItem>, path: &str, method: &Method, operation: Operation) {
  let item = paths.entry(path.to_string()).or_default();
  if !item.set_operation(method, operation) {
    debug!(path, %method, "method has no slot in a path item");
  }
}

/// Builds the operations of one resource; shared pieces are computed once.
struct OperationEmitter<'a> {
  resource: &'a Resource,
  pascal: String,
  schema_ref: Schema,
  item_param: Parameter,
  cascading_delete: bool,
}

impl<'a> OperationEmitter<'a> {
  fn new(resource: &'a Resource, cascading_delete: bool) -> Self {
    Self {
      resource,
      pascal: kebab_to_pascal(&resource.singular),
      schema_ref: Schema::reference_to(format!("{SCHEMA_REF_PREFIX}{}", resource.singular)),
      item_param: Parameter::path(&resource.singular),
      cascading_delete,
    }
  }

  fn singular(&self) -> &str {
    &self.resource.singular
  }

  fn item_params(&self, variant: &ParentPattern) -> Vec<Parameter> {
    let mut params = variant.params.clone();
    params.push(self.item_param.clone());
    params
  }

  fn resource_response(&self) -> IndexMap<String, Response> {
    IndexMap::from([(
      OK_STATUS.to_string(),
      Response::json(SUCCESS_DESCRIPTION, self.schema_ref.clone()),
    )])
  }

  fn list(&self, variant: &ParentPattern) -> Operation {
    let Some(list) = self.resource.list_method else {
      return Operation::default();
    };

    let mut properties = IndexMap::from([
      (FIELD_RESULTS.to_string(), Schema::array_of(self.schema_ref.clone())),
      (FIELD_NEXT_PAGE_TOKEN.to_string(), Schema::of_type("string")),
    ]);
    if list.has_unreachable_resources {
      properties.insert(
        FIELD_UNREACHABLE.to_string(),
        Schema::array_of(Schema::of_type("string")),
      );
    }

    let mut parameters = variant.params.clone();
    parameters.push(Parameter::query(FIELD_MAX_PAGE_SIZE, "integer"));
    parameters.push(Parameter::query(FIELD_PAGE_TOKEN, "string"));
    if list.supports_skip {
      parameters.push(Parameter::query(FIELD_SKIP, "integer"));
    }
    if list.supports_filter {
      parameters.push(Parameter::query(FIELD_FILTER, "string"));
    }

    Operation {
      operation_id: Some(format!("List{}", self.pascal)),
      description: Some(format!("List method for {}", self.singular())),
      parameters,
      responses: IndexMap::from([(
        OK_STATUS.to_string(),
        Response::json(SUCCESS_DESCRIPTION, Schema::object(properties)),
      )]),
      ..Operation::default()
    }
  }

  fn create(&self, variant: &ParentPattern) -> Operation {
    let mut parameters = variant.params.clone();
    if self
      .resource
      .create_method
      .is_some_and(|create| create.supports_user_settable_create)
    {
      parameters.push(Parameter::query(FIELD_ID, "string"));
    }

    Operation {
      operation_id: Some(format!("Create{}", self.pascal)),
      description: Some(format!("Create method for {}", self.singular())),
      parameters,
      request_body: Some(RequestBody::with_content(JSON_CONTENT_TYPE, self.schema_ref.clone())),
      responses: self.resource_response(),
      ..Operation::default()
    }
  }

  fn get(&self, variant: &ParentPattern) -> Operation {
    Operation {
      operation_id: Some(format!("Get{}", self.pascal)),
      description: Some(format!("Get method for {}", self.singular())),
      parameters: self.item_params(variant),
      responses: self.resource_response(),
      ..Operation::default()
    }
  }

  fn update(&self, variant: &ParentPattern) -> Operation {
    Operation {
      operation_id: Some(format!("Update{}", self.pascal)),
      description: Some(format!("Update method for {}", self.singular())),
      parameters: self.item_params(variant),
      request_body: Some(RequestBody::with_content(MERGE_PATCH_CONTENT_TYPE, self.schema_ref.clone())),
      responses: IndexMap::from([(
        OK_STATUS.to_string(),
        Response::with_content(SUCCESS_DESCRIPTION, MERGE_PATCH_CONTENT_TYPE, self.schema_ref.clone()),
      )]),
      ..Operation::default()
    }
  }

  fn delete(&self, variant: &ParentPattern) -> Operation {
    let mut parameters = self.item_params(variant);
    if self.cascading_delete {
      parameters.push(Parameter::query(FIELD_FORCE, "boolean"));
    }

    Operation {
      operation_id: Some(format!("Delete{}", self.pascal)),
      description: Some(format!("Delete method for {}", self.singular())),
      parameters,
      responses: IndexMap::from([(
        NO_CONTENT_STATUS.to_string(),
        Response::json(SUCCESS_DESCRIPTION, Schema::default()),
      )]),
      ..Operation::default()
    }
  }

  fn custom(&self, variant: &ParentPattern, custom: &CustomMethod) -> Operation {
    let response = match &custom.response {
      Some(schema) => Response::json(SUCCESS_DESCRIPTION, schema.clone()),
      None => Response {
        description: SUCCESS_DESCRIPTION.to_string(),
        ..Response::default()
      },
    };
    let request_body = (custom.method == Method::POST).then(|| {
      RequestBody::with_content(JSON_CONTENT_TYPE, custom.request.clone().unwrap_or_default())
    });

    Operation {
      operation_id: Some(format!(":{}{}", kebab_to_pascal(&custom.name), self.pascal)),
      description: Some(format!("Custom method {} for {}", custom.name, self.singular())),
      parameters: self.item_params(variant),
      request_body,
      responses: IndexMap::from([(OK_STATUS.to_string(), response)]),
      ..Operation::default()
    }
  }
}
