//! Subauthority maps.
//!
//! A subauthority is a named partition of an authority (for example
//! `personal_name` under a name authority). The map translates the key a
//! caller uses into the value the external service expects.

use indexmap::IndexMap;

use crate::error::{LinkedDataError, Result};

/// Mapping from internal subauthority key to external value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubauthMap {
    entries: IndexMap<String, String>,
}

impl SubauthMap {
    /// Creates a map from `(key, external value)` pairs.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into().trim().to_string(), v.into()))
                .collect(),
        }
    }

    /// Looks up the external value of `key`.
    ///
    /// An exact match wins; otherwise keys are compared case-insensitively.
    #[must_use]
    pub fn external_name(&self, key: &str) -> Option<&str> {
        let key = key.trim();
        self.entries
            .get(key)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
    }

    /// Looks up the external value of `key`, failing if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidLinkedDataAuthority`] naming the key.
    pub fn require_external_name(&self, key: &str) -> Result<&str> {
        self.external_name(key).ok_or_else(|| {
            LinkedDataError::InvalidLinkedDataAuthority(format!(
                "unable to initialize linked data sub-authority '{key}'"
            ))
        })
    }

    /// Returns true if `key` resolves.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.external_name(key).is_some()
    }

    /// Returns the configured keys in configuration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of subauthorities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no subauthorities are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
