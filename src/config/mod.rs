//! Authority configuration model.
//!
//! One JSON block per authority describes how to build request URLs and how
//! to read the returned graph, separately for the `search` and `term`
//! actions. Blocks are validated once into an immutable [`AuthorityConfig`];
//! configuration errors surface here, before any request is made.
//!
//! # Example
//!
//! ```ignore
//! use authlink::config::AuthorityConfig;
//!
//! let json = std::fs::read_to_string("authorities/loc_names.json")?;
//! let config = AuthorityConfig::from_json_str("loc_names", &json)?;
//! assert!(config.supports_search());
//! ```

mod action;
mod context_map;
mod iri_template;
mod results_map;
mod subauth_map;

pub use action::{
    ActionConfig, RawActionConfig, SearchConfig, TermConfig, TermIdKind, DEFAULT_QUERY_VARIABLE,
    DEFAULT_TERM_ID_VARIABLE,
};
pub use context_map::{
    ContextGroup, ContextMap, ContextPropertyMap, NoTranslations, RawContextGroup, RawContextMap,
    RawContextProperty, Translator,
};
pub use iri_template::{IriTemplate, IriTemplateMapping, RawIriTemplate, RawIriTemplateMapping};
pub use results_map::{FieldSource, ResultField, ResultsMap, SearchResultsMap, TermResultsMap};
pub use subauth_map::SubauthMap;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{LinkedDataError, Result};
use crate::namespaces::DEFAULT_PREFIXES;

/// CURIE prefixes available to one authority configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMap {
    prefixes: IndexMap<String, String>,
}

impl Default for PrefixMap {
    fn default() -> Self {
        Self {
            prefixes: DEFAULT_PREFIXES
                .iter()
                .map(|(p, ns)| ((*p).to_string(), (*ns).to_string()))
                .collect(),
        }
    }
}

impl PrefixMap {
    /// Creates the built-in prefixes extended (or overridden) by `custom`.
    #[must_use]
    pub fn with_custom(custom: &IndexMap<String, String>) -> Self {
        let mut map = Self::default();
        for (prefix, namespace) in custom {
            map.prefixes.insert(prefix.clone(), namespace.clone());
        }
        map
    }

    /// Returns the namespace bound to `prefix`.
    #[must_use]
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Expands a predicate to a full IRI.
    ///
    /// Accepts `<iri>`, absolute IRIs and `prefix:local` CURIEs.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidConfiguration`] for an unknown
    /// prefix or a value that is not an IRI at all.
    pub fn expand(&self, value: &str) -> Result<String> {
        let value = value.trim();
        if let Some(inner) = value.strip_prefix('<').and_then(|v| v.strip_suffix('>')) {
            return Ok(inner.to_string());
        }
        let Some((prefix, local)) = value.split_once(':') else {
            return Err(LinkedDataError::InvalidConfiguration(format!(
                "'{value}' is neither an IRI nor a prefixed name"
            )));
        };
        if let Some(namespace) = self.namespace(prefix) {
            return Ok(format!("{namespace}{local}"));
        }
        if local.starts_with("//") || prefix.eq_ignore_ascii_case("urn") {
            return Ok(value.to_string());
        }
        Err(LinkedDataError::InvalidConfiguration(format!(
            "unknown prefix '{prefix}' in '{value}'"
        )))
    }
}

/// Raw per-authority configuration block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthorityConfig {
    /// Additional CURIE prefixes.
    #[serde(default)]
    pub prefixes: IndexMap<String, String>,
    /// Search action block.
    #[serde(default)]
    pub search: Option<RawActionConfig>,
    /// Term action block.
    #[serde(default)]
    pub term: Option<RawActionConfig>,
}

/// Validated configuration of one authority.
///
/// Either action may be absent; an authority with neither supports nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityConfig {
    authority_name: String,
    prefixes: PrefixMap,
    search: Option<SearchConfig>,
    term: Option<TermConfig>,
}

impl AuthorityConfig {
    /// Validates a raw block for `authority_name`.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidConfiguration`] if either action
    /// block is malformed.
    pub fn from_raw(authority_name: &str, raw: &RawAuthorityConfig) -> Result<Self> {
        let prefixes = PrefixMap::with_custom(&raw.prefixes);
        let in_authority = |err: LinkedDataError| match err {
            LinkedDataError::InvalidConfiguration(msg) => {
                LinkedDataError::InvalidConfiguration(format!("{authority_name}: {msg}"))
            },
            other => other,
        };
        let search = raw
            .search
            .as_ref()
            .map(|block| SearchConfig::from_raw(block, &prefixes))
            .transpose()
            .map_err(in_authority)?;
        let term = raw
            .term
            .as_ref()
            .map(|block| TermConfig::from_raw(block, &prefixes))
            .transpose()
            .map_err(in_authority)?;

        Ok(Self {
            authority_name: authority_name.to_string(),
            prefixes,
            search,
            term,
        })
    }

    /// Validates an already parsed JSON block.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not have the configuration shape
    /// or fails validation.
    pub fn from_value(authority_name: &str, value: &Value) -> Result<Self> {
        let raw = RawAuthorityConfig::deserialize(value).map_err(|e| {
            LinkedDataError::InvalidConfiguration(format!("{authority_name}: {e}"))
        })?;
        Self::from_raw(authority_name, &raw)
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or fails validation.
    pub fn from_json_str(authority_name: &str, json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(authority_name, &value)
    }

    /// Returns the authority name.
    #[must_use]
    pub fn authority_name(&self) -> &str {
        &self.authority_name
    }

    /// Returns the prefixes of this authority.
    #[must_use]
    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    /// Search configuration, if the authority supports search.
    #[must_use]
    pub fn search(&self) -> Option<&SearchConfig> {
        self.search.as_ref()
    }

    /// Term configuration, if the authority supports term lookup.
    #[must_use]
    pub fn term(&self) -> Option<&TermConfig> {
        self.term.as_ref()
    }

    /// Returns true if the authority supports search.
    #[must_use]
    pub fn supports_search(&self) -> bool {
        self.search.is_some()
    }

    /// Returns true if the authority supports term lookup.
    #[must_use]
    pub fn supports_term(&self) -> bool {
        self.term.is_some()
    }
}
