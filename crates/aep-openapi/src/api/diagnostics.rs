use strum::Display;

/// Counters and non-fatal findings of one build.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildStats {
  pub paths_visited: usize,
  pub paths_skipped: usize,
  pub resources_discovered: usize,
  pub custom_methods_attached: usize,
  pub schemas_passed_through: usize,
  pub warnings: Vec<BuildWarning>,
}

impl BuildStats {
  pub fn record_path(&mut self) {
    self.paths_visited += 1;
  }

  pub fn record_skipped_path(&mut self) {
    self.paths_visited += 1;
    self.paths_skipped += 1;
  }

  pub fn record_resources(&mut self, count: usize) {
    self.resources_discovered += count;
  }

  pub fn record_custom_methods(&mut self, count: usize) {
    self.custom_methods_attached += count;
  }

  pub fn record_schemas(&mut self, count: usize) {
    self.schemas_passed_through += count;
  }

  pub fn record_warning(&mut self, warning: BuildWarning) {
    tracing::warn!("{warning}");
    self.warnings.push(warning);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum BuildWarning {
  #[strum(to_string = "Resource {path} has a LIST method, but {reason}")]
  UnresolvedListShape { path: String, reason: String },
  #[strum(to_string = "Resource body on {path} is not a $ref, so no singular can be derived")]
  AnonymousResourceSchema { path: String },
  #[strum(to_string = "Custom method {path} is not addressed on an item path")]
  CollectionCustomMethod { path: String },
  #[strum(to_string = "{count} custom method(s) on {pattern} match no resource")]
  UnattachedCustomMethods { pattern: String, count: usize },
}

impl BuildWarning {
  /// Warnings that mean something in the document was dropped.
  pub fn is_skipped_item(&self) -> bool {
    matches!(
      self,
      Self::UnresolvedListShape { .. } | Self::AnonymousResourceSchema { .. } | Self::CollectionCustomMethod { .. }
    )
  }
}
