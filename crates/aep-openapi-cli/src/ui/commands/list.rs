use aep_openapi::Resource;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use itertools::Itertools;

use crate::ui::{Colors, SourceArgs, colors::comfy, term_width};

fn table(colors: &Colors, headers: &[&str]) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in headers {
    row.add_cell(Cell::new(header).fg(comfy(colors.label())));
  }
  table.set_header(row);
  table
}

/// Standard methods first, then custom methods as `:name`.
fn method_summary(resource: &Resource) -> String {
  let standard = [
    ("list", resource.list_method.is_some()),
    ("create", resource.create_method.is_some()),
    ("get", resource.get_method.is_some()),
    ("update", resource.update_method.is_some()),
    ("delete", resource.delete_method.is_some()),
  ]
  .into_iter()
  .filter_map(|(name, present)| present.then(|| name.to_string()));
  let custom = resource.custom_methods.iter().map(|custom| format!(":{}", custom.name));
  standard.chain(custom).join(" ")
}

pub async fn list_resources(source: &SourceArgs, colors: &Colors) -> anyhow::Result<()> {
  let api = source.build().await?.api;
  let mut table = table(colors, &["SINGULAR", "PLURAL", "PATTERN", "METHODS", "PARENTS"]);

  for resource in api.resources.values() {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(&resource.singular)
        .fg(comfy(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(&resource.plural).fg(comfy(colors.info())));
    row.add_cell(Cell::new(resource.pattern()).fg(comfy(colors.primary())));
    row.add_cell(Cell::new(method_summary(resource)).fg(comfy(colors.accent())));
    row.add_cell(Cell::new(resource.parents.join(", ")).fg(comfy(colors.info())));
    table.add_row(row);
  }

  println!("{table}");
  Ok(())
}

pub async fn list_operations(source: &SourceArgs, colors: &Colors) -> anyhow::Result<()> {
  let document = source.build().await?.api.to_openapi();
  let mut table = table(colors, &["OPERATION ID", "METHOD", "PATH"]);

  for (path, method, operation) in document.operations() {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(operation.operation_id.as_deref().unwrap_or_default())
        .fg(comfy(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(method.as_str())
        .fg(comfy(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(path).fg(comfy(colors.primary())));
    table.add_row(row);
  }

  println!("{table}");
  Ok(())
}
