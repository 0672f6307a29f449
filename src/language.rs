//! Language tag sets used for graph filtering and sort preference.

use std::fmt;

use serde_json::Value;

use crate::error::{LinkedDataError, Result};

/// Wildcard tag meaning "every language".
pub const ALL_LANGUAGES: &str = "*";

/// An ordered, normalized set of language tags.
///
/// Tags are lowercased and de-duplicated, keeping first occurrence. The
/// first tag is the preferred language for sorting. An empty set means no
/// language filtering; a set containing the wildcard `*` is normalized to
/// the empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageSet {
    tags: Vec<String>,
}

impl LanguageSet {
    /// Builds a set from any sequence of tags.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim().to_ascii_lowercase();
            if tag.is_empty() {
                continue;
            }
            if tag == ALL_LANGUAGES {
                return Self::default();
            }
            if !normalized.contains(&tag) {
                normalized.push(tag);
            }
        }
        Self { tags: normalized }
    }

    /// Parses a comma separated list such as `"en, fr"`.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Reads the `language` element of a configuration block, which may be
    /// a single string or an array of strings.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidConfiguration`] for any other JSON shape.
    pub fn from_config_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self::parse(s)),
            Value::Array(items) => {
                let mut tags = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => tags.push(s.as_str()),
                        other => {
                            return Err(LinkedDataError::InvalidConfiguration(format!(
                                "language entries must be strings, found {other}"
                            )));
                        },
                    }
                }
                Ok(Self::new(tags))
            },
            Value::Null => Ok(Self::default()),
            other => Err(LinkedDataError::InvalidConfiguration(format!(
                "language must be a string or an array of strings, found {other}"
            ))),
        }
    }

    /// Returns true when no filtering applies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Returns true if `tag` is in the set (case-insensitive).
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Returns the preferred (first) language, if any.
    #[must_use]
    pub fn preferred(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }

    /// Returns an iterator over the normalized tags.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

impl fmt::Display for LanguageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tags.is_empty() {
            write!(f, "{ALL_LANGUAGES}")
        } else {
            write!(f, "{}", self.tags.join(","))
        }
    }
}
