use indexmap::IndexMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::ClientError;
use crate::api::{Resource, pattern::placeholder_name};

pub const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

#[must_use]
pub fn encode_segment(segment: &str) -> String {
  utf8_percent_encode(segment, PATH_SEGMENT_ENCODE_SET).to_string()
}

/// Builds the collection URL of `resource` under `server_url`.
///
/// Every ancestor placeholder is filled from `parameters`. Values may be
/// full resource paths (`publishers/acme`); only their last segment is
/// used. `suffix` is appended verbatim.
pub fn base_path(
  resource: &Resource,
  server_url: &str,
  parameters: &IndexMap<String, String>,
  suffix: &str,
) -> Result<String, ClientError> {
  let mut url = server_url.trim_end_matches('/').to_string();
  let collection = resource.pattern_elems.len().saturating_sub(1);

  for (i, elem) in resource.pattern_elems[..collection].iter().enumerate() {
    url.push('/');
    if i % 2 == 0 {
      url.push_str(elem);
      continue;
    }

    let name = placeholder_name(elem);
    let value = parameters
      .get(name)
      .filter(|value| !value.is_empty())
      .ok_or_else(|| ClientError::MissingParameter {
        name: name.to_string(),
        pattern: resource.pattern(),
      })?;
    let last = value.rsplit('/').find(|segment| !segment.is_empty()).unwrap_or(value);
    url.push_str(&encode_segment(last));
  }

  url.push_str(suffix);
  Ok(url)
}

/// `server_url` joined with a resource path, tolerating a leading `/`.
pub fn item_url(server_url: &str, path: &str) -> String {
  format!("{}/{}", server_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
