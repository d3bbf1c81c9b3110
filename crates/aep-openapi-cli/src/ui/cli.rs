use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "aep-openapi")]
#[command(author, version, about = "Resource-oriented OpenAPI toolkit", styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

/// Where the document comes from and how its paths map onto resources.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
  /// Path or http(s) URL of the OpenAPI document (JSON or YAML)
  #[arg(short, long, value_name = "FILE|URL")]
  pub input: String,

  /// Only consider paths under this prefix, e.g. `/v1`
  #[arg(long, value_name = "PREFIX", default_value = "")]
  pub prefix: String,

  /// Server URL to use instead of the one declared in the document
  #[arg(long, value_name = "URL")]
  pub server_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information recovered from an OpenAPI document
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Regenerate a resource-oriented OpenAPI 3.1 document
  Generate(GenerateCommand),
  /// Print tool definitions and resource templates as JSON
  Tools {
    #[command(flatten)]
    source: SourceArgs,
  },
  /// Execute a standard method against the live API
  Call(CallCommand),
}

impl Commands {
  pub fn is_verbose(&self) -> bool {
    matches!(self, Self::Generate(GenerateCommand { verbose: true, .. }))
  }
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List the resources and the methods they support
  Resources {
    #[command(flatten)]
    source: SourceArgs,
  },
  /// List the operations of the regenerated document
  Operations {
    #[command(flatten)]
    source: SourceArgs,
  },
}

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
  #[command(flatten)]
  pub source: SourceArgs,

  /// Where to write the document; `.yaml`/`.yml` selects YAML, anything else JSON
  #[arg(short, long, value_name = "FILE")]
  pub output: PathBuf,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallAction {
  Create,
  List,
  Get,
  Update,
  Delete,
}

#[derive(Args, Debug, Clone)]
pub struct CallCommand {
  #[command(flatten)]
  pub source: SourceArgs,

  /// Singular of the resource to call
  #[arg(short, long, value_name = "SINGULAR")]
  pub resource: String,

  #[arg(short, long, value_enum)]
  pub action: CallAction,

  /// Resource path for get, update and delete, e.g. `publishers/acme`
  #[arg(long, value_name = "PATH")]
  pub path: Option<String>,

  /// Parent placeholder value for create and list (repeatable)
  #[arg(long = "param", value_name = "NAME=VALUE")]
  pub params: Vec<String>,

  /// Extra request header (repeatable)
  #[arg(long = "header", value_name = "NAME=VALUE")]
  pub headers: Vec<String>,

  /// JSON request body for create and update
  #[arg(long, value_name = "JSON")]
  pub body: Option<String>,
}
