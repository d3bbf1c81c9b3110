use aep_openapi::tools::{resource_templates, tools_for_api};
use serde_json::json;

use crate::ui::SourceArgs;

pub async fn print_tools(source: &SourceArgs) -> anyhow::Result<()> {
  let api = source.build().await?.api;
  let listing = json!({
    "tools": tools_for_api(&api),
    "resourceTemplates": resource_templates(&api),
  });
  println!("{}", serde_json::to_string_pretty(&listing)?);
  Ok(())
}
