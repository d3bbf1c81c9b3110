//! Identifier case conversion between the PascalCase names used by schema
//! keys and the kebab-case names used for resource singulars and plurals.
//!
//! Every function here is total: any input, including the empty string,
//! produces a value.

use itertools::Itertools;

/// Converts a PascalCase identifier to kebab-case.
///
/// A run of capitals is treated as an acronym: the word boundary is placed
/// before the run and before its last capital when a lowercase letter
/// follows, so `XMLHttpRequest` becomes `xml-http-request` rather than being
/// split letter by letter.
#[must_use]
pub fn pascal_to_kebab(s: &str) -> String {
  let chars: Vec<char> = s.chars().collect();
  let mut delimiters = Vec::new();
  let mut previous_is_upper = false;
  let mut in_acronym = false;

  for (i, c) in chars.iter().enumerate() {
    if c.is_ascii_uppercase() {
      if previous_is_upper && !in_acronym {
        in_acronym = true;
        delimiters.push(i - 1);
      }
      previous_is_upper = true;
    } else {
      if previous_is_upper {
        delimiters.push(i - 1);
      }
      in_acronym = false;
      previous_is_upper = false;
    }
  }

  let mut parts: Vec<String> = Vec::new();
  let mut start = 0;
  for delimiter in delimiters {
    if delimiter != start {
      parts.push(chars[start..delimiter].iter().collect());
      start = delimiter;
    }
  }
  parts.push(chars[start..].iter().collect());

  parts.join("-").to_lowercase()
}

/// `foo-bar-baz` -> `fooBarBaz`
#[must_use]
pub fn kebab_to_camel(s: &str) -> String {
  s.split('-')
    .enumerate()
    .map(|(i, part)| if i == 0 { part.to_string() } else { upper_first(part) })
    .join("")
}

/// `foo-bar-baz` -> `FooBarBaz`
#[must_use]
pub fn kebab_to_pascal(s: &str) -> String {
  upper_first(&kebab_to_camel(s))
}

/// `foo-bar-baz` -> `foo_bar_baz`
#[must_use]
pub fn kebab_to_snake(s: &str) -> String {
  s.replace('-', "_")
}

#[must_use]
pub fn upper_first(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
