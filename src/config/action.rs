//! Per-action configuration (search and term).

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{LinkedDataError, Result};
use crate::language::LanguageSet;
use crate::request_header::RequestHeader;

use super::context_map::{ContextMap, RawContextMap};
use super::iri_template::{IriTemplate, RawIriTemplate};
use super::results_map::{ResultsMap, SearchResultsMap, TermResultsMap};
use super::subauth_map::SubauthMap;
use super::PrefixMap;

/// Default name of the variable carrying the search text.
pub const DEFAULT_QUERY_VARIABLE: &str = "query";

/// Default name of the variable carrying the term identifier.
pub const DEFAULT_TERM_ID_VARIABLE: &str = "term_id";

/// Raw action block (`search` or `term`) of an authority configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawActionConfig {
    /// IRI template describing the request URL.
    #[serde(default)]
    pub url: Option<RawIriTemplate>,
    /// Names of the template variables carrying request values.
    #[serde(default)]
    pub qa_replacement_patterns: IndexMap<String, String>,
    /// Whether term ids are bare ids (`ID`) or full URIs (`URI`).
    #[serde(default)]
    pub term_id: Option<String>,
    /// Default language(s), a string or an array.
    #[serde(default)]
    pub language: Option<Value>,
    /// Field → predicate mapping.
    #[serde(default)]
    pub results: Option<IndexMap<String, String>>,
    /// Subauthority key → external value.
    #[serde(default)]
    pub subauthorities: Option<IndexMap<String, String>>,
    /// Context properties (search only).
    #[serde(default)]
    pub context: Option<RawContextMap>,
}

/// How a term identifier is passed to the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TermIdKind {
    /// A bare identifier, e.g. `n79021164`.
    #[default]
    Id,
    /// A full URI, e.g. `http://id.loc.gov/authorities/names/n79021164`.
    Uri,
}

impl TermIdKind {
    fn parse(value: Option<&str>) -> Result<Self> {
        match value.map(str::trim) {
            None => Ok(Self::Id),
            Some(v) if v.eq_ignore_ascii_case("id") => Ok(Self::Id),
            Some(v) if v.eq_ignore_ascii_case("uri") => Ok(Self::Uri),
            Some(other) => Err(LinkedDataError::InvalidConfiguration(format!(
                "term_id must be 'ID' or 'URI', found '{other}'"
            ))),
        }
    }
}

/// Behaviour shared by the search and term action configurations.
pub trait ActionConfig {
    /// The results map variant of this action.
    type Results: ResultsMap;

    /// Action name used in diagnostics.
    const ACTION: &'static str;

    /// URL template of the action.
    fn url(&self) -> &IriTemplate;

    /// Results map of the action.
    fn results_map(&self) -> &Self::Results;

    /// Subauthorities, or `None` when the action supports none.
    fn subauth_map(&self) -> Option<&SubauthMap>;

    /// Template variable carrying the subauthority value.
    fn subauth_variable(&self) -> Option<&str>;

    /// Template variable carrying the query text or term id.
    fn action_request_variable(&self) -> &str;

    /// Default languages, or `None` when unconfigured.
    fn default_language(&self) -> Option<&LanguageSet>;

    /// Returns true if the action supports subauthorities.
    fn supports_subauthorities(&self) -> bool {
        self.subauth_map().is_some()
    }

    /// Builds the request URL for `request_value` (query text or term id).
    ///
    /// Bindings are the header's replacements, then the request value under
    /// [`action_request_variable`](Self::action_request_variable), then the
    /// subauthority's external value under the subauth variable.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidLinkedDataAuthority`] when the
    /// header names a subauthority the action does not know, and
    /// [`LinkedDataError::InvalidRequest`] when a required template variable
    /// stays unbound.
    fn build_url(&self, request_value: &str, header: &RequestHeader) -> Result<String> {
        let mut bindings = header.replacements.clone();
        bindings.insert(
            self.action_request_variable().to_string(),
            request_value.to_string(),
        );
        if let Some(key) = header.subauthority.as_deref() {
            let subauth_map = self.subauth_map().ok_or_else(|| {
                LinkedDataError::InvalidLinkedDataAuthority(format!(
                    "{} action does not support subauthority '{key}'",
                    Self::ACTION
                ))
            })?;
            let external = subauth_map.require_external_name(key)?;
            if let Some(variable) = self.subauth_variable() {
                bindings.insert(variable.to_string(), external.to_string());
            }
        }
        self.url().expand(&bindings)
    }
}

/// Fields common to both actions, validated once.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ActionCommon {
    url: IriTemplate,
    subauth_map: Option<SubauthMap>,
    subauth_variable: Option<String>,
    request_variable: String,
    default_language: Option<LanguageSet>,
}

impl ActionCommon {
    fn from_raw(raw: &RawActionConfig, action: &str, default_request_var: &str) -> Result<Self> {
        let url = raw.url.as_ref().ok_or_else(|| {
            LinkedDataError::InvalidConfiguration(format!("{action} action is missing url"))
        })?;
        let url = IriTemplate::from_raw(url)?;

        let request_variable = raw
            .qa_replacement_patterns
            .get(default_request_var)
            .cloned()
            .unwrap_or_else(|| default_request_var.to_string());
        if !url.has_variable(&request_variable) {
            return Err(LinkedDataError::InvalidConfiguration(format!(
                "{action} url template has no '{request_variable}' variable"
            )));
        }

        let subauth_map = raw.subauthorities.as_ref().map(|entries| {
            SubauthMap::new(entries.iter().map(|(k, v)| (k.clone(), v.clone())))
        });
        let subauth_variable = raw.qa_replacement_patterns.get("subauth").cloned();
        if subauth_map.is_some() {
            match subauth_variable.as_deref() {
                None => {
                    return Err(LinkedDataError::InvalidConfiguration(format!(
                        "{action} action declares subauthorities without a subauth replacement pattern"
                    )));
                },
                Some(var) if !url.has_variable(var) => {
                    return Err(LinkedDataError::InvalidConfiguration(format!(
                        "{action} url template has no '{var}' variable"
                    )));
                },
                Some(_) => {},
            }
        }

        let default_language = raw
            .language
            .as_ref()
            .map(LanguageSet::from_config_value)
            .transpose()?;

        Ok(Self {
            url,
            subauth_map,
            subauth_variable,
            request_variable,
            default_language,
        })
    }
}

fn results_block<'a>(
    raw: &'a RawActionConfig,
    action: &str,
) -> Result<&'a IndexMap<String, String>> {
    raw.results.as_ref().ok_or_else(|| {
        LinkedDataError::InvalidConfiguration(format!("{action} action is missing results"))
    })
}

/// Configuration of the search action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    common: ActionCommon,
    results_map: SearchResultsMap,
    context_map: Option<ContextMap>,
}

impl SearchConfig {
    /// Validates a raw `search` block.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidConfiguration`] when the url or
    /// label predicate is missing, or any sub-element is malformed.
    pub fn from_raw(raw: &RawActionConfig, prefixes: &PrefixMap) -> Result<Self> {
        let common = ActionCommon::from_raw(raw, Self::ACTION, DEFAULT_QUERY_VARIABLE)?;
        let results_map = SearchResultsMap::new(results_block(raw, Self::ACTION)?, prefixes)?;
        let context_map = raw
            .context
            .as_ref()
            .map(|ctx| ContextMap::from_raw(ctx, prefixes))
            .transpose()?;
        Ok(Self {
            common,
            results_map,
            context_map,
        })
    }

    /// Context properties, or `None` when unconfigured.
    #[must_use]
    pub fn context_map(&self) -> Option<&ContextMap> {
        self.context_map.as_ref()
    }

    /// Returns true if the search supports context.
    #[must_use]
    pub fn supports_context(&self) -> bool {
        self.context_map.is_some()
    }

    /// Returns true if results are ranked by a sort predicate.
    #[must_use]
    pub fn supports_sort(&self) -> bool {
        self.results_map
            .has_predicate(super::results_map::ResultField::Sort)
    }
}

impl ActionConfig for SearchConfig {
    type Results = SearchResultsMap;
    const ACTION: &'static str = "search";

    fn url(&self) -> &IriTemplate {
        &self.common.url
    }

    fn results_map(&self) -> &SearchResultsMap {
        &self.results_map
    }

    fn subauth_map(&self) -> Option<&SubauthMap> {
        self.common.subauth_map.as_ref()
    }

    fn subauth_variable(&self) -> Option<&str> {
        self.common.subauth_variable.as_deref()
    }

    fn action_request_variable(&self) -> &str {
        &self.common.request_variable
    }

    fn default_language(&self) -> Option<&LanguageSet> {
        self.common.default_language.as_ref()
    }
}

/// Configuration of the term action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermConfig {
    common: ActionCommon,
    results_map: TermResultsMap,
    term_id: TermIdKind,
}

impl TermConfig {
    /// Validates a raw `term` block.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidConfiguration`] when the url or
    /// label predicate is missing, or any sub-element is malformed.
    pub fn from_raw(raw: &RawActionConfig, prefixes: &PrefixMap) -> Result<Self> {
        let common = ActionCommon::from_raw(raw, Self::ACTION, DEFAULT_TERM_ID_VARIABLE)?;
        let results_map = TermResultsMap::new(results_block(raw, Self::ACTION)?, prefixes)?;
        let term_id = TermIdKind::parse(raw.term_id.as_deref())?;
        Ok(Self {
            common,
            results_map,
            term_id,
        })
    }

    /// How term identifiers are passed to the authority. With
    /// [`TermIdKind::Uri`], term selection prefers the subject whose URI is
    /// the requested id.
    #[must_use]
    pub const fn term_id_kind(&self) -> TermIdKind {
        self.term_id
    }
}

impl ActionConfig for TermConfig {
    type Results = TermResultsMap;
    const ACTION: &'static str = "term";

    fn url(&self) -> &IriTemplate {
        &self.common.url
    }

    fn results_map(&self) -> &TermResultsMap {
        &self.results_map
    }

    fn subauth_map(&self) -> Option<&SubauthMap> {
        self.common.subauth_map.as_ref()
    }

    fn subauth_variable(&self) -> Option<&str> {
        self.common.subauth_variable.as_deref()
    }

    fn action_request_variable(&self) -> &str {
        &self.common.request_variable
    }

    fn default_language(&self) -> Option<&LanguageSet> {
        self.common.default_language.as_ref()
    }
}
