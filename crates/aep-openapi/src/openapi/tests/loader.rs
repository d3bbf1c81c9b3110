use std::io::Write;

use crate::openapi::{DocumentFormat, DocumentSource, LoadError, load_document, parse_document};

#[test]
fn test_document_source_detection() {
  assert_eq!(
    DocumentSource::parse("https://example.com/openapi.json"),
    DocumentSource::Url("https://example.com/openapi.json".to_string())
  );
  assert_eq!(
    DocumentSource::parse("http://localhost:8081/openapi.json"),
    DocumentSource::Url("http://localhost:8081/openapi.json".to_string())
  );
  assert_eq!(
    DocumentSource::parse("specs/openapi.yaml"),
    DocumentSource::File("specs/openapi.yaml".to_string())
  );
  assert_eq!(
    DocumentSource::parse("ftp://example.com/openapi.json"),
    DocumentSource::File("ftp://example.com/openapi.json".to_string())
  );
}

#[test]
fn test_format_from_extension_and_content() {
  assert_eq!(DocumentFormat::from_extension("yaml"), Some(DocumentFormat::Yaml));
  assert_eq!(DocumentFormat::from_extension("yml"), Some(DocumentFormat::Yaml));
  assert_eq!(DocumentFormat::from_extension("json"), Some(DocumentFormat::Json));
  assert_eq!(DocumentFormat::from_extension("txt"), None);

  assert_eq!(DocumentFormat::sniff(b"  \n{\"openapi\": \"3.1.0\"}"), DocumentFormat::Json);
  assert_eq!(DocumentFormat::sniff(b"openapi: 3.1.0\n"), DocumentFormat::Yaml);
}

#[test]
fn test_parse_json_fixture() {
  let doc = parse_document(include_bytes!("../../../fixtures/widgets.json"), DocumentFormat::Json).unwrap();
  assert_eq!(doc.openapi.as_deref(), Some("3.1.0"));
  assert_eq!(doc.info.title, "Widget API");
  assert_eq!(doc.servers[0].url, "https://api.example.com");
  assert!(doc.paths.contains_key("/widgets/{widget}:start"));
}

#[test]
fn test_parse_yaml_fixture() {
  let doc = parse_document(include_bytes!("../../../fixtures/widgets.yaml"), DocumentFormat::Yaml).unwrap();
  assert_eq!(doc.openapi.as_deref(), Some("3.0.3"));
  assert_eq!(doc.paths.len(), 2);
  assert!(doc.components.unwrap().schemas.contains_key("Widget"));
}

#[test]
fn test_json_error_reports_path() {
  let bad = br#"{"openapi": "3.1.0", "paths": {"/widgets": {"get": {"parameters": [{"name": "x", "in": "nowhere"}]}}}}"#;
  let err = parse_document(bad, DocumentFormat::Json).unwrap_err();

  match err {
    LoadError::Json { path, .. } => assert!(path.starts_with("paths./widgets.get.parameters"), "path was {path}"),
    other => panic!("expected JSON error, got {other}"),
  }
}

#[test]
fn test_unknown_schema_keywords_survive_round_trip() {
  let doc = parse_document(include_bytes!("../../../fixtures/widgets.json"), DocumentFormat::Json).unwrap();
  let widget = &doc.components.as_ref().unwrap().schemas["Widget"];
  assert!(widget.extra.contains_key("x-aep-field-numbers"));

  let value = serde_json::to_value(widget).unwrap();
  assert_eq!(value["x-aep-field-numbers"]["1"], "name");
  assert_eq!(value["required"][0], "name");
}

#[tokio::test]
async fn test_load_document_from_yaml_file() {
  let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
  file.write_all(include_bytes!("../../../fixtures/widgets.yaml")).unwrap();

  let doc = load_document(file.path().to_str().unwrap()).await.unwrap();
  assert_eq!(doc.info.title, "Widget API");
}

#[tokio::test]
async fn test_load_document_sniffs_json_without_extension() {
  let mut file = tempfile::NamedTempFile::new().unwrap();
  file.write_all(include_bytes!("../../../fixtures/petstore_v2.json")).unwrap();

  let doc = load_document(file.path().to_str().unwrap()).await.unwrap();
  assert_eq!(doc.swagger.as_deref(), Some("2.0"));
  assert!(doc.definitions.unwrap().contains_key("Pet"));
}

#[tokio::test]
async fn test_load_document_missing_file() {
  let err = load_document("/definitely/not/here/openapi.json").await.unwrap_err();
  assert!(matches!(err, LoadError::Read { .. }));
}
