//! Tool descriptions of the standard methods, one tool per method a
//! resource supports, with JSON Schema inputs derived from the resource
//! schema and its pattern.

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
  api::{Api, Resource},
  constants::{FIELD_ID, FIELD_PATH},
  openapi::{Schema, SchemaType},
};

pub const RESOURCE_MIME_TYPE: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
  pub name: String,
  pub description: String,
  pub input_schema: Schema,
}

impl ToolDefinition {
  /// `input` is stored in the shape [`input_shape`] gives it.
  pub fn new(name: String, description: String, input: &Schema) -> Self {
    Self {
      name,
      description,
      input_schema: input_shape(input),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTemplate {
  pub uri_template: String,
  pub name: String,
  pub mime_type: String,
}

/// Tools of every resource, in resource order.
pub fn tools_for_api(api: &Api) -> Vec<ToolDefinition> {
  api.resources.values().flat_map(tools_for_resource).collect()
}

pub fn resource_templates(api: &Api) -> Vec<ResourceTemplate> {
  api
    .resources
    .values()
    .map(|resource| resource_template(resource, &api.server_url))
    .collect()
}

pub fn tools_for_resource(resource: &Resource) -> Vec<ToolDefinition> {
  let mut tools = Vec::new();
  if resource.create_method.is_some() {
    tools.push(create_tool(resource));
  }
  if resource.list_method.is_some() {
    tools.push(list_tool(resource));
  }
  if resource.get_method.is_some() {
    tools.push(get_tool(resource));
  }
  if resource.update_method.is_some() {
    tools.push(update_tool(resource));
  }
  if resource.delete_method.is_some() {
    tools.push(delete_tool(resource));
  }
  tools
}

/// Body fields plus every ancestor placeholder. The server assigns `path`,
/// so it is never required; `id` is when the caller chooses it.
pub fn create_tool(resource: &Resource) -> ToolDefinition {
  let mut properties = body_properties(resource);
  let mut required = Vec::new();

  for name in resource.parent_placeholders() {
    properties.insert(name.to_string(), Schema::of_type("string"));
    required.push(name.to_string());
  }

  if resource
    .create_method
    .is_some_and(|create| create.supports_user_settable_create)
  {
    required.push(FIELD_ID.to_string());
    if let Some(id) = properties.get_mut(FIELD_ID) {
      id.read_only = Some(false);
    }
  }
  required.retain(|name| name != FIELD_PATH);

  ToolDefinition::new(
    format!("create-{}", resource.singular),
    format!("Create a {}", resource.singular),
    &Schema {
      required,
      ..Schema::object(properties)
    },
  )
}

pub fn list_tool(resource: &Resource) -> ToolDefinition {
  let properties = resource
    .parent_placeholders()
    .map(|name| {
      let schema = Schema {
        description: Some(format!(
          "The {name} to filter the list of {} resources",
          resource.singular
        )),
        ..Schema::of_type("string")
      };
      (name.to_string(), schema)
    })
    .collect();

  ToolDefinition::new(
    format!("list-{}", resource.singular),
    format!("List all {} resources", resource.singular),
    &Schema::object(properties),
  )
}

pub fn get_tool(resource: &Resource) -> ToolDefinition {
  ToolDefinition::new(
    format!("get-{}", resource.singular),
    format!("Get details of a specific {}", resource.singular),
    &path_only(),
  )
}

pub fn update_tool(resource: &Resource) -> ToolDefinition {
  let mut properties = body_properties(resource);
  properties
    .entry(FIELD_PATH.to_string())
    .or_insert_with(|| Schema::of_type("string"));

  ToolDefinition::new(
    format!("update-{}", resource.singular),
    format!("Update a {}", resource.singular),
    &Schema {
      required: vec![FIELD_PATH.to_string()],
      ..Schema::object(properties)
    },
  )
}

pub fn delete_tool(resource: &Resource) -> ToolDefinition {
  ToolDefinition::new(
    format!("delete-{}", resource.singular),
    format!("Delete a {}", resource.singular),
    &path_only(),
  )
}

pub fn resource_template(resource: &Resource, server_url: &str) -> ResourceTemplate {
  ResourceTemplate {
    uri_template: format!("{server_url}/{}", resource.pattern()),
    name: resource.singular.clone(),
    mime_type: RESOURCE_MIME_TYPE.to_string(),
  }
}

/// The JSON Schema a validator should check tool input against. A schema
/// that is only a `$ref` becomes an empty object carrying the reference.
pub fn input_shape(schema: &Schema) -> Schema {
  if let Some(reference) = &schema.reference {
    return Schema {
      reference: Some(reference.clone()),
      ..Schema::object(IndexMap::new())
    };
  }

  let mut shape = schema.clone();
  if shape.schema_type.is_none() {
    shape.schema_type = Some(SchemaType::Single("object".to_string()));
  }
  shape
}

/// Body fields as tool inputs. A field that is only a `$ref` is shaped
/// with [`input_shape`]; inline fields are copied as declared.
fn body_properties(resource: &Resource) -> IndexMap<String, Schema> {
  resource
    .schema
    .properties
    .iter()
    .map(|(name, schema)| {
      let shape = if schema.reference.is_some() {
        input_shape(schema)
      } else {
        schema.clone()
      };
      (name.clone(), shape)
    })
    .collect()
}

fn path_only() -> Schema {
  Schema {
    required: vec![FIELD_PATH.to_string()],
    ..Schema::object(IndexMap::from([(FIELD_PATH.to_string(), Schema::of_type("string"))]))
  }
}
