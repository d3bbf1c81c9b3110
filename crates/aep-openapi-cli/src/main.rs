#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::ui::{Cli, Colors, Commands, ListCommands, colors};

mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.command.is_verbose());
  let colors = Colors::new(colors::colors_enabled(cli.color), colors::detect_theme(cli.theme));

  match cli.command {
    Commands::List { list_command } => match list_command {
      ListCommands::Resources { source } => ui::commands::list_resources(&source, &colors).await?,
      ListCommands::Operations { source } => ui::commands::list_operations(&source, &colors).await?,
    },
    Commands::Generate(command) => {
      let config = ui::commands::GenerateConfig::from_command(command);
      ui::commands::generate_document(config, &colors).await?;
    }
    Commands::Tools { source } => ui::commands::print_tools(&source).await?,
    Commands::Call(command) => ui::commands::call_resource(command).await?,
  }

  Ok(())
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` wins over the
/// defaults.
fn init_tracing(verbose: bool) {
  let default = if verbose { "aep_openapi=debug" } else { "error" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}
