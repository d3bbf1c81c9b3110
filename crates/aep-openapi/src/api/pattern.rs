/// Shape of a path template, as far as resource inference is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternInfo {
  /// The path ends in a placeholder and addresses a single item.
  pub is_resource_pattern: bool,
  /// Text after the first `:`, when present and non-empty.
  pub custom_method_name: Option<String>,
}

impl PatternInfo {
  /// Classifies `path` (with its leading `/`). Segments must alternate
  /// literal and `{placeholder}`, starting with a literal; anything else,
  /// including empty segments, is not resource-shaped and yields `None`.
  pub fn classify(path: &str) -> Option<Self> {
    let (base, custom) = match path.split_once(':') {
      Some((base, custom)) => (base, Some(custom)),
      None => (path, None),
    };

    let segments = path_segments(base)?;
    let alternates = segments
      .iter()
      .enumerate()
      .all(|(i, segment)| is_placeholder(segment) == (i % 2 == 1));
    if !alternates {
      return None;
    }

    Some(Self {
      is_resource_pattern: segments.len() % 2 == 0,
      custom_method_name: custom.filter(|name| !name.is_empty()).map(ToString::to_string),
    })
  }
}

/// Splits `/a/{b}/c` into `["a", "{b}", "c"]`.
pub(crate) fn path_segments(path: &str) -> Option<Vec<&str>> {
  let segments: Vec<&str> = path.strip_prefix('/')?.split('/').collect();
  if segments.iter().any(|segment| segment.is_empty()) {
    return None;
  }
  Some(segments)
}

pub fn is_placeholder(segment: &str) -> bool {
  segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}')
}

/// `{book}` -> `book`; literals come back unchanged.
pub fn placeholder_name(segment: &str) -> &str {
  segment
    .strip_prefix('{')
    .and_then(|inner| inner.strip_suffix('}'))
    .unwrap_or(segment)
}
