#![warn(missing_docs)]

//! # authlink: linked data authority lookup
//!
//! A uniform lookup and normalization layer over linked data vocabulary
//! services (library authorities, taxonomies, gazetteers). Each authority is
//! described by a JSON configuration block; the crate turns a search or term
//! request into the authority's own URL, fetches the RDF graph it returns,
//! and normalizes it into a fixed JSON shape.
//!
//! ## Quick Start
//!
//! ### Searching an authority
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use authlink::{AuthorityRegistry, HttpGraphLoader, LinkedDataAuthority, RequestHeader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = AuthorityRegistry::from_directory("config/authorities");
//! let loader = Arc::new(HttpGraphLoader::with_timeout(Duration::from_secs(10))?);
//! let authority = LinkedDataAuthority::new(&registry, "loc_names", loader)?;
//!
//! let header = RequestHeader::new()
//!     .with_subauthority("personal_name")
//!     .with_language("en");
//! for hit in authority.search("twain", &header)? {
//!     println!("{} {}", hit.uri, hit.label);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Looking up a term
//!
//! ```ignore
//! # use authlink::{LinkedDataAuthority, RequestHeader};
//! # fn run(authority: &LinkedDataAuthority) -> authlink::Result<()> {
//! if let Some(term) = authority.find("n79021164", &RequestHeader::new())? {
//!     println!("{}", serde_json::to_string_pretty(&term).unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Authority configuration model (actions, results maps, subauthorities, context)
//! - [`registry`]: Lazily populated, shared cache of authority configurations
//! - [`graph_service`]: Graph loading and language/blank node filtering
//! - [`consolidate`]: Extraction of per-subject records from a graph
//! - [`sort`]: Language-aware value sorting and record ranking
//! - [`search_query`]: The search pipeline
//! - [`term_query`]: The term lookup pipeline
//! - [`authority`]: `LinkedDataAuthority` facade over both actions
//! - [`rdf`]: In-memory RDF graph model and parsing
//! - [`ldpath`]: Path expressions used by context properties
//! - [`error`]: Error types and result type

pub mod authority;
pub mod config;
pub mod consolidate;
pub mod error;
pub mod graph_service;
pub mod language;
pub mod ldpath;
pub mod namespaces;
pub mod rdf;
pub mod registry;
pub mod request_header;
pub mod search_query;
pub mod sort;
pub mod term_query;

pub use authority::LinkedDataAuthority;
pub use config::{
    ActionConfig, AuthorityConfig, ContextMap, FieldSource, NoTranslations, PrefixMap,
    ResultField, ResultsMap, SearchConfig, SearchResultsMap, SubauthMap, TermConfig,
    TermResultsMap, Translator,
};
pub use consolidate::{ConsolidatedRecord, RecordBuilder};
pub use error::{LinkedDataError, Result};
pub use graph_service::{GraphLoader, HttpGraphLoader};
pub use language::LanguageSet;
pub use ldpath::LdPath;
pub use rdf::{RdfFormat, RdfGraph, RdfNode, RdfTriple};
pub use registry::{AuthorityRegistry, ConfigSource};
pub use request_header::RequestHeader;
pub use search_query::{SearchQuery, SearchResult};
pub use term_query::{TermQuery, TermResult};
