use http::Method;
use serde_json::json;

use crate::{
  api::{Api, ApiError, BuildOptions, BuildOutput, BuildWarning},
  openapi::{OpenApi, ResolveError},
};

fn parse(value: serde_json::Value) -> OpenApi {
  serde_json::from_value(value).unwrap()
}

fn fixture(bytes: &str) -> OpenApi {
  serde_json::from_str(bytes).unwrap()
}

fn build(doc: &OpenApi) -> BuildOutput {
  Api::from_openapi(doc, &BuildOptions::default()).unwrap()
}

fn widget_ref() -> serde_json::Value {
  json!({ "$ref": "#/components/schemas/Widget" })
}

fn ok(schema: serde_json::Value) -> serde_json::Value {
  json!({ "200": { "description": "ok", "content": { "application/json": { "schema": schema } } } })
}

fn document(paths: serde_json::Value) -> OpenApi {
  parse(json!({
    "openapi": "3.1.0",
    "info": { "title": "Test", "version": "1" },
    "servers": [{ "url": "https://api.example.com" }],
    "paths": paths,
    "components": {
      "schemas": {
        "Widget": { "type": "object", "properties": { "name": { "type": "string" } } },
        "BookEdition": { "type": "object", "properties": { "title": { "type": "string" } } }
      }
    }
  }))
}

#[test]
fn test_basic_crud_yields_single_resource() {
  let output = build(&fixture(include_str!("../../../fixtures/widgets.json")));
  let api = &output.api;

  assert_eq!(api.resources.len(), 1);
  let widget = api.resource("widget").unwrap();
  assert_eq!(widget.pattern_elems, vec!["widgets", "{widget}"]);
  assert_eq!(widget.plural, "widgets");
  assert!(widget.get_method.is_some());
  assert!(widget.update_method.is_some());
  assert!(widget.delete_method.is_some());

  let list = widget.list_method.unwrap();
  assert!(list.supports_filter);
  assert!(!list.supports_skip);
  assert!(!list.has_unreachable_resources);
  assert!(widget.create_method.unwrap().supports_user_settable_create);

  assert!(widget.schema.properties.contains_key("size"));
  assert!(widget.schema.extra.contains_key("x-aep-field-numbers"));
}

#[test]
fn test_document_metadata_is_carried() {
  let output = build(&fixture(include_str!("../../../fixtures/widgets.json")));

  assert_eq!(output.api.name, "Widget API");
  assert_eq!(output.api.server_url, "https://api.example.com");
  let contact = output.api.contact.unwrap();
  assert_eq!(contact.email.as_deref(), Some("widgets@example.com"));
}

#[test]
fn test_custom_methods_are_attached_by_pattern() {
  let output = build(&fixture(include_str!("../../../fixtures/widgets.json")));
  let widget = output.api.resource("widget").unwrap();

  let start = widget.custom_method("start").unwrap();
  assert_eq!(start.method, Method::POST);
  assert!(start.request.as_ref().unwrap().properties.contains_key("foo"));
  assert!(start.response.as_ref().unwrap().properties.contains_key("name"));

  let inspect = widget.custom_method("inspect").unwrap();
  assert_eq!(inspect.method, Method::GET);
  assert!(inspect.request.is_none());
  assert!(inspect.response.as_ref().unwrap().properties.contains_key("healthy"));
}

#[test]
fn test_widgets_stats_and_passthrough_schemas() {
  let output = build(&fixture(include_str!("../../../fixtures/widgets.json")));
  let stats = &output.stats;

  assert_eq!(stats.paths_visited, 6);
  assert_eq!(stats.paths_skipped, 1);
  assert_eq!(stats.resources_discovered, 1);
  assert_eq!(stats.custom_methods_attached, 2);
  assert_eq!(stats.schemas_passed_through, 1);
  assert_eq!(
    stats.warnings,
    vec![BuildWarning::UnresolvedListShape {
      path: "/healthz".to_string(),
      reason: "the response schema is missing".to_string(),
    }]
  );
  assert_eq!(
    stats.warnings[0].to_string(),
    "Resource /healthz has a LIST method, but the response schema is missing"
  );

  assert_eq!(output.api.schemas.keys().collect::<Vec<_>>(), vec!["Inspection"]);
}

#[test]
fn test_custom_method_without_request_body_is_an_error() {
  let doc = document(json!({
    "/widgets/{widget}": { "get": { "responses": ok(widget_ref()) } },
    "/widgets/{widget}:start": { "post": { "responses": ok(widget_ref()) } }
  }));

  let err = Api::from_openapi(&doc, &BuildOptions::default()).unwrap_err();
  assert_eq!(
    err,
    ApiError::MissingRequestBody {
      name: "start".to_string(),
      path: "/widgets/{widget}:start".to_string(),
    }
  );
}

#[test]
fn test_nested_singular_drops_parent_prefix() {
  let list = json!({
    "type": "object",
    "properties": {
      "results": { "type": "array", "items": { "$ref": "#/components/schemas/BookEdition" } }
    }
  });
  let doc = document(json!({
    "/publishers/{publisher}/books/{book}/editions": { "get": { "responses": ok(list) } },
    "/publishers/{publisher}/books/{book}/editions/{edition}": {
      "get": { "responses": ok(json!({ "$ref": "#/components/schemas/BookEdition" })) }
    }
  }));

  let api = build(&doc).api;
  assert_eq!(api.resources.keys().collect::<Vec<_>>(), vec!["edition"]);

  let edition = api.resource("edition").unwrap();
  assert_eq!(
    edition.pattern_elems,
    vec!["publishers", "{publisher}", "books", "{book}", "editions", "{edition}"]
  );
  assert_eq!(edition.plural, "editions");
  assert!(edition.list_method.is_some());
  assert!(edition.get_method.is_some());
}

#[test]
fn test_missing_server_is_an_error() {
  let mut doc = document(json!({ "/widgets/{widget}": { "get": { "responses": ok(widget_ref()) } } }));
  doc.servers.clear();

  let err = Api::from_openapi(&doc, &BuildOptions::default()).unwrap_err();
  assert_eq!(err, ApiError::NoServerUrl);

  let options = BuildOptions::builder().server_url("http://localhost:9000").build();
  let output = Api::from_openapi(&doc, &options).unwrap();
  assert_eq!(output.api.server_url, "http://localhost:9000");
}

#[test]
fn test_undetected_version() {
  let doc = parse(json!({ "info": { "title": "t", "version": "1" }, "paths": {} }));
  assert_eq!(
    Api::from_openapi(&doc, &BuildOptions::default()).unwrap_err(),
    ApiError::UndetectedVersion
  );
}

#[test]
fn test_merge_is_independent_of_path_order() {
  let doc = fixture(include_str!("../../../fixtures/widgets.json"));
  let mut reversed = doc.clone();
  reversed.paths.reverse();

  let forward = build(&doc).api;
  let backward = build(&reversed).api;

  let a = forward.resource("widget").unwrap();
  let b = backward.resource("widget").unwrap();
  assert_eq!(a.pattern_elems, b.pattern_elems);
  assert_eq!(a.plural, b.plural);
  assert_eq!(a.capabilities(), b.capabilities());

  let mut names_a: Vec<_> = a.custom_methods.iter().map(|m| m.name.as_str()).collect();
  let mut names_b: Vec<_> = b.custom_methods.iter().map(|m| m.name.as_str()).collect();
  names_a.sort_unstable();
  names_b.sort_unstable();
  assert_eq!(names_a, names_b);
}

#[test]
fn test_annotated_resources_link_parents_and_children() {
  let output = build(&fixture(include_str!("../../../fixtures/bookstore.json")));
  let api = &output.api;

  assert_eq!(
    api.resources.keys().collect::<Vec<_>>(),
    vec!["publisher", "book", "book-edition"]
  );

  let publisher = api.resource("publisher").unwrap();
  assert!(publisher.parents.is_empty());
  assert_eq!(publisher.children, vec!["book"]);
  assert!(publisher.list_method.unwrap().supports_skip);

  let book = api.resource("book").unwrap();
  assert_eq!(book.parents, vec!["publisher"]);
  assert_eq!(book.children, vec!["book-edition"]);
  assert_eq!(book.pattern_elems, vec!["publishers", "{publisher}", "books", "{book}"]);
  let list = book.list_method.unwrap();
  assert!(list.has_unreachable_resources);
  assert!(list.supports_filter);
  assert!(book.create_method.unwrap().supports_user_settable_create);
  assert!(book.custom_method("archive").is_some());

  let edition = api.resource("book-edition").unwrap();
  assert_eq!(edition.parents, vec!["book"]);
  assert_eq!(edition.plural, "book-editions");
  assert_eq!(edition.collection_name(), "editions");

  assert_eq!(api.parents(edition).map(|r| r.singular.as_str()).collect::<Vec<_>>(), vec!["book"]);
  assert_eq!(api.children(publisher).map(|r| r.singular.as_str()).collect::<Vec<_>>(), vec!["book"]);
  assert_eq!(api.schemas.keys().collect::<Vec<_>>(), vec!["author"]);
  assert_eq!(api.server_url, "http://localhost:8081");
}

#[test]
fn test_unknown_resource_lookup() {
  let api = build(&fixture(include_str!("../../../fixtures/bookstore.json"))).api;
  assert_eq!(
    api.resource("shelf").unwrap_err(),
    ApiError::ResourceNotFound("shelf".to_string())
  );
}

#[test]
fn test_annotation_parent_must_exist() {
  let doc = parse(json!({
    "openapi": "3.1.0",
    "servers": [{ "url": "https://api.example.com" }],
    "paths": {
      "/shelves/{shelf}/books/{book}": {
        "get": { "responses": ok(json!({ "$ref": "#/components/schemas/Book" })) }
      }
    },
    "components": {
      "schemas": {
        "Book": {
          "type": "object",
          "x-aep-resource": {
            "singular": "book",
            "plural": "books",
            "patterns": ["shelves/{shelf}/books/{book}"],
            "parents": ["shelf"]
          }
        }
      }
    }
  }));

  assert_eq!(
    Api::from_openapi(&doc, &BuildOptions::default()).unwrap_err(),
    ApiError::ParentSchemaNotFound {
      resource: "book".to_string(),
      parent: "shelf".to_string(),
    }
  );
}

#[test]
fn test_annotation_parent_found_by_pascal_key() {
  let doc = parse(json!({
    "openapi": "3.1.0",
    "servers": [{ "url": "https://api.example.com" }],
    "paths": {
      "/shelves/{shelf}/books/{book}": {
        "get": { "responses": ok(json!({ "$ref": "#/components/schemas/Book" })) }
      }
    },
    "components": {
      "schemas": {
        "Book": {
          "type": "object",
          "x-aep-resource": { "singular": "book", "plural": "books", "parents": ["shelf-unit"] }
        },
        "ShelfUnit": { "type": "object" }
      }
    }
  }));

  let api = build(&doc).api;
  let parent = api.resource("shelf-unit").unwrap();
  assert_eq!(parent.children, vec!["book"]);
  assert!(parent.pattern_elems.is_empty());
  assert!(api.schemas.is_empty());
}

#[test]
fn test_annotation_parent_cycle_is_rejected() {
  let doc = parse(json!({
    "openapi": "3.1.0",
    "servers": [{ "url": "https://api.example.com" }],
    "paths": {
      "/as/{a}": { "get": { "responses": ok(json!({ "$ref": "#/components/schemas/a" })) } }
    },
    "components": {
      "schemas": {
        "a": { "type": "object", "x-aep-resource": { "singular": "a", "parents": ["b"] } },
        "b": { "type": "object", "x-aep-resource": { "singular": "b", "parents": ["a"] } }
      }
    }
  }));

  assert_eq!(
    Api::from_openapi(&doc, &BuildOptions::default()).unwrap_err(),
    ApiError::CircularParent { resource: "a".to_string() }
  );
}

#[test]
fn test_dangling_reference_is_an_error() {
  let doc = document(json!({
    "/gadgets/{gadget}": { "get": { "responses": ok(json!({ "$ref": "#/components/schemas/Gadget" })) } }
  }));

  let err = Api::from_openapi(&doc, &BuildOptions::default()).unwrap_err();
  assert_eq!(
    err,
    ApiError::Resolve(ResolveError::SchemaNotFound {
      reference: "#/components/schemas/Gadget".to_string()
    })
  );
}

#[test]
fn test_unmodeled_shapes_produce_warnings() {
  let doc = document(json!({
    "/widgets/{widget}": { "get": { "responses": ok(widget_ref()) } },
    "/widgets:batchGet": { "get": { "responses": ok(widget_ref()) } },
    "/gizmos/{gizmo}": { "get": { "responses": ok(json!({ "type": "object" })) } },
    "/gadgets/{gadget}:spin": { "get": { "responses": ok(widget_ref()) } },
    "/widgets/{widget}/parts": { "get": { "responses": ok(json!({ "type": "object" })) } }
  }));

  let output = build(&doc);
  assert_eq!(
    output.stats.warnings,
    vec![
      BuildWarning::CollectionCustomMethod {
        path: "/widgets:batchGet".to_string()
      },
      BuildWarning::AnonymousResourceSchema {
        path: "/gizmos/{gizmo}".to_string()
      },
      BuildWarning::UnresolvedListShape {
        path: "/widgets/{widget}/parts".to_string(),
        reason: "no array property with items is present".to_string(),
      },
      BuildWarning::UnattachedCustomMethods {
        pattern: "gadgets/{gadget}".to_string(),
        count: 1,
      },
    ]
  );
  assert_eq!(output.stats.warnings.iter().filter(|w| w.is_skipped_item()).count(), 3);
  assert_eq!(output.api.resources.len(), 1);
}

#[test]
fn test_swagger_document_with_prefix() {
  let doc = fixture(include_str!("../../../fixtures/petstore_v2.json"));
  let options = BuildOptions::builder().path_prefix("/v1").build();
  let output = Api::from_openapi(&doc, &options).unwrap();
  let api = &output.api;

  assert_eq!(api.server_url, "https://pets.example.com/api/v1");
  assert_eq!(api.resources.keys().collect::<Vec<_>>(), vec!["pet"]);

  let pet = api.resource("pet").unwrap();
  assert_eq!(pet.pattern_elems, vec!["pets", "{pet}"]);
  assert!(pet.list_method.unwrap().supports_skip);
  assert!(!pet.create_method.unwrap().supports_user_settable_create);
  assert!(pet.get_method.is_some());
  assert!(pet.delete_method.is_some());
  assert!(pet.update_method.is_none());

  let feed = pet.custom_method("feed").unwrap();
  assert!(feed.request.as_ref().unwrap().properties.contains_key("food"));

  assert_eq!(output.stats.paths_skipped, 1);
  assert_eq!(
    api.schemas.keys().collect::<Vec<_>>(),
    vec!["ListPetsResponse", "FeedRequest"]
  );
}

#[test]
fn test_swagger_without_host_has_no_server() {
  let mut doc = fixture(include_str!("../../../fixtures/petstore_v2.json"));
  doc.host = None;

  assert_eq!(
    Api::from_openapi(&doc, &BuildOptions::default()).unwrap_err(),
    ApiError::NoServerUrl
  );
}

fn with_reusable_components(paths: serde_json::Value) -> OpenApi {
  parse(json!({
    "openapi": "3.1.0",
    "info": { "title": "Test", "version": "1" },
    "servers": [{ "url": "https://api.example.com" }],
    "paths": paths,
    "components": {
      "schemas": {
        "Widget": { "type": "object", "properties": { "name": { "type": "string" } } },
        "ListWidgetsResponse": {
          "type": "object",
          "properties": { "results": { "type": "array", "items": { "$ref": "#/components/schemas/Widget" } } }
        },
        "StartRequest": { "type": "object", "properties": { "force": { "type": "boolean" } } }
      },
      "parameters": {
        "WidgetId": { "name": "id", "in": "query", "schema": { "type": "string" } },
        "Skip": { "name": "skip", "in": "query", "schema": { "type": "integer" } }
      },
      "requestBodies": {
        "StartWidget": {
          "content": { "application/json": { "schema": { "$ref": "#/components/schemas/StartRequest" } } }
        }
      },
      "responses": {
        "WidgetOk": {
          "description": "ok",
          "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Widget" } } }
        }
      }
    }
  }))
}

#[test]
fn test_referenced_parameters_drive_method_flags() {
  let doc = with_reusable_components(json!({
    "/widgets": {
      "post": {
        "parameters": [{ "$ref": "#/components/parameters/WidgetId" }],
        "responses": { "200": { "$ref": "#/components/responses/WidgetOk" } }
      },
      "get": {
        "parameters": [{ "$ref": "#/components/parameters/Skip" }],
        "responses": ok(json!({ "$ref": "#/components/schemas/ListWidgetsResponse" }))
      }
    }
  }));

  let output = build(&doc);
  let widget = output.api.resource("widget").unwrap();
  assert!(widget.create_method.unwrap().supports_user_settable_create);
  assert!(widget.list_method.unwrap().supports_skip);
  assert_eq!(widget.pattern_elems, vec!["widgets", "{widget}"]);
}

#[test]
fn test_custom_method_with_referenced_request_body() {
  let doc = with_reusable_components(json!({
    "/widgets/{widget}": { "get": { "responses": { "200": { "$ref": "#/components/responses/WidgetOk" } } } },
    "/widgets/{widget}:start": {
      "post": {
        "requestBody": { "$ref": "#/components/requestBodies/StartWidget" },
        "responses": { "200": { "$ref": "#/components/responses/WidgetOk" } }
      }
    }
  }));

  let output = build(&doc);
  let start = output.api.resource("widget").unwrap().custom_method("start").unwrap();
  assert!(start.request.as_ref().unwrap().properties.contains_key("force"));
  assert!(start.response.as_ref().unwrap().properties.contains_key("name"));
}

#[test]
fn test_unknown_referenced_parameter_is_an_error() {
  let doc = with_reusable_components(json!({
    "/widgets": {
      "post": {
        "parameters": [{ "$ref": "#/components/parameters/Missing" }],
        "responses": ok(widget_ref())
      }
    }
  }));

  let err = Api::from_openapi(&doc, &BuildOptions::default()).unwrap_err();
  assert_eq!(
    err,
    ApiError::Resolve(ResolveError::ComponentNotFound {
      reference: "#/components/parameters/Missing".to_string()
    })
  );
}

#[test]
fn test_empty_custom_suffix_does_not_leak_into_pattern() {
  let doc = document(json!({
    "/widgets/{widget}:": { "get": { "responses": ok(widget_ref()) } },
    "/widgets/{widget}": { "delete": { "responses": {} } }
  }));

  let output = build(&doc);
  let widget = output.api.resource("widget").unwrap();
  assert_eq!(widget.pattern_elems, vec!["widgets", "{widget}"]);
  assert_eq!(widget.pattern(), "widgets/{widget}");
  assert!(widget.get_method.is_some());
}
