use std::collections::BTreeMap;

use regex::Regex;

use crate::error::ArtifactError;

/// A set of literal token replacements applied to templated files.
///
/// All tokens are replaced in a single left-to-right pass, so a replacement
/// value is never rescanned for other tokens. When two tokens match at the
/// same offset the longer one wins.
///
/// Matching is purely literal: a token that also occurs as ordinary content
/// is replaced there too.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
  values: BTreeMap<String, String>,
  matcher: Option<Regex>,
}

impl Substitutions {
  pub fn new(values: BTreeMap<String, String>) -> Result<Self, ArtifactError> {
    if values.contains_key("") {
      return Err(ArtifactError::InvalidPlaceholder {
        token: String::new(),
        reason: "token must not be empty".to_string(),
      });
    }

    let matcher = if values.is_empty() {
      None
    } else {
      let mut tokens: Vec<&str> = values.keys().map(String::as_str).collect();
      tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
      let pattern = tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
      let regex = Regex::new(&pattern).map_err(|e| ArtifactError::InvalidPlaceholder {
        token: tokens.join(", "),
        reason: e.to_string(),
      })?;
      Some(regex)
    };

    Ok(Self { values, matcher })
  }

  pub fn get(&self, token: &str) -> Option<&str> {
    self.values.get(token).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Replaces every occurrence of every token, returning the new text and
  /// the number of replacements made.
  pub fn apply(&self, text: &str) -> (String, usize) {
    let Some(matcher) = &self.matcher else {
      return (text.to_string(), 0);
    };

    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut last = 0;
    for found in matcher.find_iter(text) {
      out.push_str(&text[last..found.start()]);
      out.push_str(self.get(found.as_str()).unwrap_or(found.as_str()));
      last = found.end();
      count += 1;
    }
    out.push_str(&text[last..]);
    (out, count)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn subs(pairs: &[(&str, &str)]) -> Substitutions {
    Substitutions::new(
      pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
    )
    .unwrap()
  }

  #[test]
  fn test_replaces_every_occurrence() {
    let s = subs(&[("API_GATEWAY_URL", "https://abc.example/prod")]);
    let (out, count) = s.apply("a=API_GATEWAY_URL; b=API_GATEWAY_URL;");
    assert_eq!(out, "a=https://abc.example/prod; b=https://abc.example/prod;");
    assert_eq!(count, 2);
  }

  #[test]
  fn test_longest_token_wins() {
    let s = subs(&[("API_URL", "short"), ("API_URL_V2", "long")]);
    let (out, count) = s.apply("API_URL_V2 API_URL");
    assert_eq!(out, "long short");
    assert_eq!(count, 2);
  }

  #[test]
  fn test_values_are_not_rescanned() {
    let s = subs(&[("A", "B"), ("B", "A")]);
    let (out, _) = s.apply("AB");
    assert_eq!(out, "BA");
  }

  #[test]
  fn test_regex_metacharacters_are_literal() {
    let s = subs(&[("${api.url}", "x")]);
    let (out, count) = s.apply("${api.url} $apiXurl}");
    assert_eq!(out, "x $apiXurl}");
    assert_eq!(count, 1);
  }

  #[test]
  fn test_empty_set_is_identity() {
    let s = Substitutions::default();
    assert_eq!(s.apply("untouched"), ("untouched".to_string(), 0));
  }

  #[test]
  fn test_empty_token_rejected() {
    let err = Substitutions::new(BTreeMap::from([(String::new(), "x".to_string())])).unwrap_err();
    assert!(matches!(err, ArtifactError::InvalidPlaceholder { .. }));
  }
}
