use aep_openapi::{Api, BuildOptions, BuildOutput, load_document};
use anyhow::Context;
use tracing::debug;

use crate::ui::SourceArgs;

impl SourceArgs {
  pub fn build_options(&self) -> BuildOptions {
    BuildOptions::builder()
      .path_prefix(self.prefix.as_str())
      .server_url(self.server_url.clone().unwrap_or_default())
      .build()
  }

  /// Loads the document and recovers its resource graph.
  pub async fn build(&self) -> anyhow::Result<BuildOutput> {
    debug!(input = %self.input, prefix = %self.prefix, "loading document");
    let document = load_document(&self.input)
      .await
      .with_context(|| format!("failed to load {}", self.input))?;
    Api::from_openapi(&document, &self.build_options())
      .with_context(|| format!("failed to read resources from {}", self.input))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn source(prefix: &str, server_url: Option<&str>) -> SourceArgs {
    SourceArgs {
      input: "openapi.json".to_string(),
      prefix: prefix.to_string(),
      server_url: server_url.map(ToString::to_string),
    }
  }

  #[test]
  fn test_build_options_defaults() {
    assert_eq!(source("", None).build_options(), BuildOptions::default());
  }

  #[test]
  fn test_build_options_carry_flags() {
    let options = source("/v1", Some("http://localhost:8081")).build_options();
    assert_eq!(options.path_prefix, "/v1");
    assert_eq!(options.server_url, "http://localhost:8081");
  }

  #[tokio::test]
  async fn test_build_reports_missing_input() {
    let err = source("", None).build().await.unwrap_err();
    assert!(err.to_string().contains("failed to load openapi.json"));
  }
}
