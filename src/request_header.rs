//! Per-request options.

use indexmap::IndexMap;

use crate::language::LanguageSet;
use crate::rdf::RdfFormat;

/// Options of one search or term request.
///
/// # Examples
///
/// ```ignore
/// use authlink::request_header::RequestHeader;
///
/// let header = RequestHeader::new()
///     .with_subauthority("person")
///     .with_language("fr")
///     .with_replacement("maxRecords", "10")
///     .with_context(true);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeader {
    /// Subauthority key, translated through the action's subauthority map.
    pub subauthority: Option<String>,
    /// Languages overriding the action's default language.
    pub language: Option<LanguageSet>,
    /// Extra URL template bindings.
    pub replacements: IndexMap<String, String>,
    /// Attach context values to search results.
    pub context: bool,
    /// Parse the response in this format instead of negotiating it.
    pub format: Option<RdfFormat>,
}

impl RequestHeader {
    /// Creates a header with no options set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subauthority.
    #[must_use]
    pub fn with_subauthority(mut self, subauthority: impl Into<String>) -> Self {
        self.subauthority = Some(subauthority.into());
        self
    }

    /// Sets the languages from a comma separated list.
    #[must_use]
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(LanguageSet::parse(language));
        self
    }

    /// Sets the languages.
    #[must_use]
    pub fn with_languages(mut self, language: LanguageSet) -> Self {
        self.language = Some(language);
        self
    }

    /// Adds a URL template binding.
    #[must_use]
    pub fn with_replacement(mut self, variable: impl Into<String>, value: impl Into<String>) -> Self {
        self.replacements.insert(variable.into(), value.into());
        self
    }

    /// Requests context values on search results.
    #[must_use]
    pub const fn with_context(mut self, enabled: bool) -> Self {
        self.context = enabled;
        self
    }

    /// Forces the response format.
    #[must_use]
    pub const fn with_format(mut self, format: RdfFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Returns the languages in effect: the request's own, else `default`.
    #[must_use]
    pub fn effective_language(&self, default: Option<&LanguageSet>) -> LanguageSet {
        self.language
            .clone()
            .or_else(|| default.cloned())
            .unwrap_or_default()
    }
}
