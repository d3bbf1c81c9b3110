use std::path::{Path, PathBuf};

use aep_openapi::{BuildStats, OpenApi};
use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::ui::{Colors, GenerateCommand, SourceArgs};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  Json,
  Yaml,
}

impl OutputFormat {
  pub fn for_path(path: &Path) -> Self {
    match path.extension().and_then(|ext| ext.to_str()) {
      Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => Self::Yaml,
      _ => Self::Json,
    }
  }

  pub fn render(self, document: &OpenApi) -> anyhow::Result<String> {
    Ok(match self {
      Self::Json => {
        let mut rendered = serde_json::to_string_pretty(document)?;
        rendered.push('\n');
        rendered
      }
      Self::Yaml => serde_yaml::to_string(document)?,
    })
  }
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub source: SourceArgs,
  pub output: PathBuf,
  pub format: OutputFormat,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> Self {
    let GenerateCommand {
      source,
      output,
      verbose,
      quiet,
    } = command;

    Self {
      format: OutputFormat::for_path(&output),
      source,
      output,
      verbose,
      quiet,
    }
  }

  async fn write_output(&self, contents: String) -> anyhow::Result<()> {
    if let Some(parent) = self.output.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&self.output, contents).await?;
    Ok(())
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading OpenAPI document from: {}", self.config.source.input)
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generating(&self) {
    self.info(&"Generating OpenAPI 3.1 document...".with(self.colors.primary()).to_string());
  }

  fn print_statistics(&self, stats: &BuildStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Paths visited:", stats.paths_visited.to_string());
    if stats.paths_skipped > 0 {
      self.stat("", format!("{} not resource-shaped", stats.paths_skipped));
    }
    self.stat("Resources:", stats.resources_discovered.to_string());
    if stats.custom_methods_attached > 0 {
      self.stat("", format!("{} custom methods", stats.custom_methods_attached));
    }
    if self.config.verbose {
      self.stat("Schemas passed through:", stats.schemas_passed_through.to_string());
    }
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len().to_string());
    }

    self.print_warnings(stats);
  }

  fn print_warnings(&self, stats: &BuildStats) {
    let mut printed_header = false;
    for warning in &stats.warnings {
      if !(warning.is_skipped_item() || self.config.verbose) {
        continue;
      }

      if !printed_header {
        println!();
        printed_header = true;
      }

      let label = if warning.is_skipped_item() { "Skipped:" } else { "Warning:" };
      eprintln!(
        "{} {}",
        label.with(self.colors.accent()),
        warning.to_string().with(self.colors.primary())
      );
    }
  }

  fn log_writing(&self) {
    self.info(
      &format!("Writing to: {}", self.config.output.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Successfully generated OpenAPI document".with(self.colors.success())
      );
    }
  }
}

pub async fn generate_document(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let output = config.source.build().await?;

  logger.log_generating();
  let document = output.api.to_openapi();
  logger.print_statistics(&output.stats);

  logger.log_writing();
  config.write_output(config.format.render(&document)?).await?;

  logger.log_success();
  Ok(())
}
