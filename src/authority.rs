//! Linked data authority facade.
//!
//! [`LinkedDataAuthority`] ties a resolved configuration to a graph loader
//! and exposes the two actions. It refuses an action the authority does
//! not configure before building any request.
//!
//! # Examples
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use authlink::{AuthorityRegistry, HttpGraphLoader, LinkedDataAuthority, RequestHeader};
//!
//! let registry = AuthorityRegistry::from_directory("config/authorities");
//! let loader = Arc::new(HttpGraphLoader::with_timeout(Duration::from_secs(10))?);
//! let authority = LinkedDataAuthority::new(&registry, "agrovoc", loader)?;
//!
//! let results = authority.search("milk", &RequestHeader::new().with_language("en"))?;
//! let term = authority.find("c_4826", &RequestHeader::new())?;
//! ```

use std::fmt;
use std::sync::Arc;

use crate::config::{AuthorityConfig, NoTranslations, Translator};
use crate::error::{LinkedDataError, Result};
use crate::graph_service::GraphLoader;
use crate::registry::AuthorityRegistry;
use crate::request_header::RequestHeader;
use crate::search_query::{SearchQuery, SearchResult};
use crate::term_query::{TermQuery, TermResult};

/// One configured authority, ready to search and look up terms.
#[derive(Clone)]
pub struct LinkedDataAuthority {
    config: Arc<AuthorityConfig>,
    loader: Arc<dyn GraphLoader>,
    translator: Arc<dyn Translator>,
}

impl fmt::Debug for LinkedDataAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedDataAuthority")
            .field("authority", &self.config.authority_name())
            .field("search", &self.config.supports_search())
            .field("term", &self.config.supports_term())
            .finish_non_exhaustive()
    }
}

impl LinkedDataAuthority {
    /// Resolves `authority_name` through `registry`.
    ///
    /// # Errors
    ///
    /// Returns the registry's resolution error: unknown authority or
    /// invalid configuration.
    pub fn new(
        registry: &AuthorityRegistry,
        authority_name: &str,
        loader: Arc<dyn GraphLoader>,
    ) -> Result<Self> {
        Ok(Self::from_config(registry.resolve(authority_name)?, loader))
    }

    /// Wraps an already resolved configuration.
    #[must_use]
    pub fn from_config(config: Arc<AuthorityConfig>, loader: Arc<dyn GraphLoader>) -> Self {
        Self {
            config,
            loader,
            translator: Arc::new(NoTranslations),
        }
    }

    /// Resolves context labels through `translator`.
    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// The authority's configuration.
    #[must_use]
    pub fn config(&self) -> &AuthorityConfig {
        &self.config
    }

    /// The authority's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.config.authority_name()
    }

    /// Searches the authority.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::UnsupportedAction`] when the authority has
    /// no search configuration, otherwise the errors of
    /// [`SearchQuery::search`].
    pub fn search(&self, query: &str, header: &RequestHeader) -> Result<Vec<SearchResult>> {
        let config = self
            .config
            .search()
            .ok_or_else(|| self.unsupported("search"))?;
        SearchQuery::new(config, self.loader.as_ref(), self.translator.as_ref())
            .search(query, header)
    }

    /// Looks up a single term.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::UnsupportedAction`] when the authority has
    /// no term configuration, otherwise the errors of [`TermQuery::find`].
    pub fn find(&self, id: &str, header: &RequestHeader) -> Result<Option<TermResult>> {
        let config = self.config.term().ok_or_else(|| self.unsupported("term"))?;
        TermQuery::new(config, self.loader.as_ref()).find(id, header)
    }

    fn unsupported(&self, action: &str) -> LinkedDataError {
        LinkedDataError::UnsupportedAction {
            authority: self.name().to_string(),
            action: action.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{RdfFormat, RdfGraph};
    use serde_json::json;

    struct Unreachable;

    impl GraphLoader for Unreachable {
        fn load(&self, url: &str, _format: Option<RdfFormat>) -> Result<RdfGraph> {
            panic!("unexpected fetch of {url}")
        }
    }

    fn registry() -> AuthorityRegistry {
        AuthorityRegistry::from_blocks([(
            "term_only",
            json!({
                "term": {
                    "url": {
                        "template": "http://localhost/term/{term_id}",
                        "mapping": [{ "variable": "term_id", "required": true }]
                    },
                    "results": { "label_predicate": "skos:prefLabel" }
                }
            }),
        )])
    }

    #[test]
    fn test_unsupported_action_before_fetch() {
        let authority =
            LinkedDataAuthority::new(&registry(), "TERM_ONLY", Arc::new(Unreachable)).unwrap();
        let err = authority.search("milk", &RequestHeader::new()).unwrap_err();
        assert!(matches!(
            err,
            LinkedDataError::UnsupportedAction { ref authority, ref action }
                if authority == "term_only" && action == "search"
        ));
    }

    #[test]
    fn test_unknown_subauthority_before_fetch() {
        let authority =
            LinkedDataAuthority::new(&registry(), "term_only", Arc::new(Unreachable)).unwrap();
        let err = authority
            .find("n1", &RequestHeader::new().with_subauthority("person"))
            .unwrap_err();
        assert!(matches!(err, LinkedDataError::InvalidLinkedDataAuthority(_)));
    }

    #[test]
    fn test_unknown_authority() {
        assert!(matches!(
            LinkedDataAuthority::new(&registry(), "nope", Arc::new(Unreachable)),
            Err(LinkedDataError::InvalidLinkedDataAuthority(_))
        ));
    }
}
