use aep_openapi::{Client, Resource};
use anyhow::{Context, bail};
use http::{HeaderMap, HeaderName, HeaderValue};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::ui::{CallAction, CallCommand};

/// Splits `NAME=VALUE` entries; only the first `=` separates.
fn parse_key_values(entries: &[String], flag: &str) -> anyhow::Result<IndexMap<String, String>> {
  entries
    .iter()
    .map(|entry| -> anyhow::Result<(String, String)> {
      let (key, value) = entry
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Invalid {flag} format '{entry}': expected NAME=VALUE"))?;
      Ok((key.to_string(), value.to_string()))
    })
    .collect()
}

fn parse_headers(entries: &[String]) -> anyhow::Result<HeaderMap> {
  let mut headers = HeaderMap::new();
  for (name, value) in parse_key_values(entries, "--header")? {
    let name = HeaderName::from_bytes(name.as_bytes()).with_context(|| format!("invalid header name '{name}'"))?;
    let value = HeaderValue::from_str(&value).with_context(|| format!("invalid value for header '{name}'"))?;
    headers.insert(name, value);
  }
  Ok(headers)
}

fn parse_body(body: Option<&str>) -> anyhow::Result<Value> {
  match body {
    Some(body) => serde_json::from_str(body).context("--body is not valid JSON"),
    None => Ok(Value::Object(Map::new())),
  }
}

fn ensure_supported(resource: &Resource, action: CallAction) -> anyhow::Result<()> {
  let supported = match action {
    CallAction::Create => resource.create_method.is_some(),
    CallAction::List => resource.list_method.is_some(),
    CallAction::Get => resource.get_method.is_some(),
    CallAction::Update => resource.update_method.is_some(),
    CallAction::Delete => resource.delete_method.is_some(),
  };
  if !supported {
    bail!("resource \"{}\" has no {action:?} method", resource.singular);
  }
  Ok(())
}

pub async fn call_resource(command: CallCommand) -> anyhow::Result<()> {
  let api = command.source.build().await?.api;
  let resource = api.resource(&command.resource)?;
  ensure_supported(resource, command.action)?;

  let client = Client::new(api.server_url.clone(), parse_headers(&command.headers)?)?;
  let parameters = parse_key_values(&command.params, "--param")?;
  let body = parse_body(command.body.as_deref())?;
  let path = || command.path.as_deref().context("--path is required for this action");

  let result = match command.action {
    CallAction::Create => client.create(resource, &parameters, body).await?,
    CallAction::List => Value::Array(client.list(resource, &parameters).await?),
    CallAction::Get => client.get(path()?).await?,
    CallAction::Update => client.update(path()?, body).await?,
    CallAction::Delete => {
      client.delete(path()?).await?;
      Value::Object(Map::new())
    }
  };

  println!("{}", serde_json::to_string_pretty(&result)?);
  Ok(())
}

#[cfg(test)]
mod tests {
  use aep_openapi::api::GetMethod;

  use super::*;

  #[test]
  fn test_parse_key_values_empty() {
    assert!(parse_key_values(&[], "--param").unwrap().is_empty());
  }

  #[test]
  fn test_parse_key_values_keeps_order_and_equals_in_value() {
    let parsed = parse_key_values(
      &["publisher=acme".to_string(), "filter=a=b".to_string()],
      "--param",
    )
    .unwrap();
    assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["publisher", "filter"]);
    assert_eq!(parsed["filter"], "a=b");
  }

  #[test]
  fn test_parse_key_values_invalid_format() {
    let err = parse_key_values(&["publisher".to_string()], "--param").unwrap_err();
    assert!(err.to_string().contains("Invalid --param format 'publisher'"));
  }

  #[test]
  fn test_parse_headers() {
    let headers = parse_headers(&["Authorization=Bearer abc".to_string()]).unwrap();
    assert_eq!(headers["authorization"], "Bearer abc");

    assert!(parse_headers(&["bad header=x".to_string()]).is_err());
  }

  #[test]
  fn test_parse_body() {
    assert_eq!(parse_body(None).unwrap(), Value::Object(Map::new()));
    assert_eq!(parse_body(Some(r#"{"title": "Dune"}"#)).unwrap()["title"], "Dune");
    assert!(parse_body(Some("{")).is_err());
  }

  #[test]
  fn test_ensure_supported() {
    let resource = Resource {
      singular: "book".to_string(),
      get_method: Some(GetMethod),
      ..Resource::default()
    };
    assert!(ensure_supported(&resource, CallAction::Get).is_ok());

    let err = ensure_supported(&resource, CallAction::Delete).unwrap_err();
    assert_eq!(err.to_string(), "resource \"book\" has no Delete method");
  }
}
