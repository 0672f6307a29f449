//! Search pipeline.
//!
//! A search builds the request URL, loads the authority graph, drops
//! anonymous subjects and unwanted languages, extracts one record per
//! labelled subject and returns them as [`SearchResult`]s. When the
//! authority configures a sort predicate, records are first ranked with the
//! deep record comparator and then put in their final order by sort key.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{ActionConfig, ContextMap, ResultField, ResultsMap, SearchConfig, Translator};
use crate::consolidate::{extract, ConsolidatedRecord};
use crate::error::Result;
use crate::graph_service::{filter, retain_predicates, GraphLoader};
use crate::rdf::RdfGraph;
use crate::request_header::RequestHeader;
use crate::sort::{deep_sort, sort_by_keys};

/// Labels longer than this are truncated.
pub const MAX_LABEL_LENGTH: usize = 98;

const ELLIPSIS: &str = "...";

/// One normalized search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// URI of the matching resource.
    pub uri: String,
    /// Identifier of the resource.
    pub id: String,
    /// Display label, built from the labels and alternate labels.
    pub label: String,
    /// Sort key; only used for ordering and never serialized.
    #[serde(skip)]
    pub sort: Option<Vec<String>>,
    /// Context values, present only when requested and configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<Value>>,
}

/// Runs searches for one authority's search configuration.
pub struct SearchQuery<'a> {
    config: &'a SearchConfig,
    loader: &'a dyn GraphLoader,
    translator: &'a dyn Translator,
}

impl fmt::Debug for SearchQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchQuery")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> SearchQuery<'a> {
    /// Creates a search over `config`, fetching graphs through `loader`.
    #[must_use]
    pub fn new(
        config: &'a SearchConfig,
        loader: &'a dyn GraphLoader,
        translator: &'a dyn Translator,
    ) -> Self {
        Self {
            config,
            loader,
            translator,
        }
    }

    /// Searches the authority for `query`.
    ///
    /// # Errors
    ///
    /// Returns configuration errors raised while building the URL (unknown
    /// subauthority, unbound variable) and the classified transport errors
    /// of the [`GraphLoader`]. An empty graph is not an error.
    pub fn search(&self, query: &str, header: &RequestHeader) -> Result<Vec<SearchResult>> {
        let url = self.config.build_url(query, header)?;
        debug!(url = %url, "searching linked data authority");
        let graph = self.loader.load(&url, header.format)?;
        let results = self.normalize(&graph, header);
        debug!(url = %url, results = results.len(), "search complete");
        Ok(results)
    }

    /// Converts a loaded search graph into ordered results.
    ///
    /// With a sort predicate, records are ranked by the deep comparator and
    /// then stably re-sorted by their sort strings. The string rule decides
    /// the final order, so integer ranks end up in lexical order (`1`, `10`,
    /// `2`); the deep ranking only orders results whose sort strings tie.
    #[must_use]
    pub fn normalize(&self, graph: &RdfGraph, header: &RequestHeader) -> Vec<SearchResult> {
        let language = header.effective_language(self.config.default_language());
        let preferred = language.preferred();

        let results_map = self.config.results_map();
        let filtered = filter(graph, Some(&language), true);
        let filtered = retain_predicates(&filtered, &results_map.predicates());
        let mut records: Vec<ConsolidatedRecord> = extract(&filtered, results_map)
            .into_iter()
            .map(|record| record.into_language_sorted(preferred))
            .collect();

        let sorted = self.config.supports_sort();
        if sorted {
            records = deep_sort(records, |r| r.values(ResultField::Sort), preferred);
        }

        let context_map = self.config.context_map().filter(|_| header.context);
        let mut results: Vec<SearchResult> = records
            .iter()
            .map(|record| self.to_result(record, preferred, sorted, context_map, graph))
            .collect();

        if sorted {
            sort_by_keys(&mut results, |r| r.sort.as_deref());
        }
        for result in &mut results {
            result.sort = None;
        }
        results
    }

    fn to_result(
        &self,
        record: &ConsolidatedRecord,
        preferred: Option<&str>,
        sorted: bool,
        context_map: Option<&ContextMap>,
        graph: &RdfGraph,
    ) -> SearchResult {
        let labels = record.strings(ResultField::Label, preferred);
        let altlabels = record.strings(ResultField::AltLabel, preferred);
        SearchResult {
            uri: record.uri().to_string(),
            id: record.id(preferred),
            label: full_label(&labels, &altlabels),
            sort: sorted.then(|| record.strings(ResultField::Sort, preferred)),
            context: context_map
                .map(|map| map.context_for(graph, record.subject(), self.translator)),
        }
    }
}

/// Builds a display label from sorted labels and alternate labels.
///
/// Several labels are bracketed, alternate labels are appended in
/// parentheses, and the result is truncated to [`MAX_LABEL_LENGTH`]
/// characters with an ellipsis before trimming.
#[must_use]
pub fn full_label(labels: &[String], altlabels: &[String]) -> String {
    let mut label = if labels.len() > 1 {
        format!("[{}]", labels.join(", "))
    } else {
        labels.join("")
    };
    if !altlabels.is_empty() {
        label.push_str(" (");
        label.push_str(&altlabels.join(", "));
        label.push(')');
    }
    if label.chars().count() > MAX_LABEL_LENGTH {
        let keep = MAX_LABEL_LENGTH - ELLIPSIS.len();
        label = label.chars().take(keep).collect::<String>() + ELLIPSIS;
    }
    label.trim().to_string()
}
