//! Term lookup pipeline.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ActionConfig, ResultField, ResultsMap, TermConfig, TermIdKind};
use crate::consolidate::{extract, ConsolidatedRecord};
use crate::error::{LinkedDataError, Result};
use crate::graph_service::{filter, retain_predicates, GraphLoader};
use crate::rdf::{RdfGraph, RdfNode};
use crate::request_header::RequestHeader;

/// A normalized term.
///
/// List fields hold distinct values in language-sorted order; optional
/// fields are omitted from JSON when empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermResult {
    /// URI of the term.
    pub uri: String,
    /// Identifier of the term.
    pub id: String,
    /// Preferred labels.
    pub label: Vec<String>,
    /// Alternate labels.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub altlabel: Vec<String>,
    /// Broader terms.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub broader: Vec<String>,
    /// Narrower terms.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub narrower: Vec<String>,
    /// Equivalent resources.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sameas: Vec<String>,
    /// Every predicate on the term: one value as a string, several as an array.
    pub predicates: IndexMap<String, Value>,
}

/// Looks up terms for one authority's term configuration.
pub struct TermQuery<'a> {
    config: &'a TermConfig,
    loader: &'a dyn GraphLoader,
}

impl fmt::Debug for TermQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermQuery")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> TermQuery<'a> {
    /// Creates a lookup over `config`, fetching graphs through `loader`.
    #[must_use]
    pub fn new(config: &'a TermConfig, loader: &'a dyn GraphLoader) -> Self {
        Self { config, loader }
    }

    /// Finds the term identified by `id`.
    ///
    /// Returns `Ok(None)` when the graph holds no labelled subject.
    ///
    /// # Errors
    ///
    /// Returns configuration errors raised while building the URL, the
    /// classified transport errors of the [`GraphLoader`], and
    /// [`LinkedDataError::TermNotFound`] when several subjects match but none
    /// of their URIs identifies the requested term.
    pub fn find(&self, id: &str, header: &RequestHeader) -> Result<Option<TermResult>> {
        let url = self.config.build_url(id, header)?;
        debug!(url = %url, "fetching linked data term");
        let graph = self.loader.load(&url, header.format)?;
        self.normalize(&graph, id, &url, header)
    }

    /// Converts a loaded term graph into a [`TermResult`].
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::TermNotFound`] for `url` when narrowing
    /// several candidate subjects leaves none.
    pub fn normalize(
        &self,
        graph: &RdfGraph,
        id: &str,
        url: &str,
        header: &RequestHeader,
    ) -> Result<Option<TermResult>> {
        let language = header.effective_language(self.config.default_language());
        let preferred = language.preferred();

        let results_map = self.config.results_map();
        let filtered = filter(graph, Some(&language), false);
        let filtered = retain_predicates(&filtered, &results_map.predicates());
        let records = extract(&filtered, results_map);
        if records.is_empty() {
            debug!(url = %url, "no labelled subject in term graph");
            return Ok(None);
        }

        let Some(record) = select(records, id, self.config.term_id_kind()) else {
            warn!(url = %url, id = %id, "no candidate subject matches the requested term");
            return Err(LinkedDataError::TermNotFound {
                url: url.to_string(),
            });
        };
        let record = record.into_language_sorted(preferred);

        Ok(Some(TermResult {
            uri: record.uri().to_string(),
            id: record.id(preferred),
            label: record.strings(ResultField::Label, preferred),
            altlabel: record.strings(ResultField::AltLabel, preferred),
            broader: record.strings(ResultField::Broader, preferred),
            narrower: record.strings(ResultField::Narrower, preferred),
            sameas: record.strings(ResultField::SameAs, preferred),
            predicates: predicates_of(graph, record.subject()),
        }))
    }
}

/// Picks the record describing `id` among extracted candidates.
///
/// A single candidate is taken as is. When the authority takes full URIs as
/// ids, a candidate whose URI is exactly `id` wins. Otherwise candidates are
/// narrowed to those whose URI contains `id`, then to those whose URI ends
/// with it.
fn select(
    mut records: Vec<ConsolidatedRecord>,
    id: &str,
    kind: TermIdKind,
) -> Option<ConsolidatedRecord> {
    if records.len() == 1 {
        return records.pop();
    }
    if kind == TermIdKind::Uri {
        if let Some(pos) = records.iter().position(|r| r.uri() == id) {
            return Some(records.swap_remove(pos));
        }
    }
    records.retain(|r| r.uri().contains(id));
    records.retain(|r| r.uri().ends_with(id));
    records.into_iter().next()
}

/// Collects every predicate on `subject`, skipping blank node objects.
fn predicates_of(graph: &RdfGraph, subject: &RdfNode) -> IndexMap<String, Value> {
    let mut collected: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for triple in graph.triples_for_subject(subject) {
        if triple.object.is_blank() {
            continue;
        }
        let values = collected.entry(triple.predicate.as_str()).or_default();
        let value = triple.object.lexical();
        if !values.contains(&value) {
            values.push(value);
        }
    }
    collected
        .into_iter()
        .map(|(predicate, values)| {
            let value = match values.as_slice() {
                [single] => Value::String((*single).to_string()),
                many => Value::Array(many.iter().map(|v| Value::String((*v).to_string())).collect()),
            };
            (predicate.to_string(), value)
        })
        .collect()
}
