//! Extraction and per-subject consolidation.
//!
//! Extraction matches the results map against a graph: every subject with
//! at least one label triple yields a row, and each other configured field
//! contributes the objects of its predicate on that subject when present.
//! Rows are folded per subject by a [`RecordBuilder`] into a
//! [`ConsolidatedRecord`] holding each field's distinct values in order of
//! first appearance.

use indexmap::IndexMap;

use crate::config::{FieldSource, ResultField, ResultsMap};
use crate::rdf::{RdfGraph, RdfNode};
use crate::sort::{language_sort, unique_sorted_strings};

/// Field values collected for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedRecord {
    subject: RdfNode,
    fields: IndexMap<ResultField, Vec<RdfNode>>,
}

impl ConsolidatedRecord {
    /// The subject the record describes.
    #[must_use]
    pub fn subject(&self) -> &RdfNode {
        &self.subject
    }

    /// The subject's URI (or blank node label).
    #[must_use]
    pub fn uri(&self) -> &str {
        self.subject.lexical()
    }

    /// Values of `field`, in order of first appearance.
    #[must_use]
    pub fn values(&self, field: ResultField) -> &[RdfNode] {
        self.fields
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns true if `field` has at least one value.
    #[must_use]
    pub fn has_values(&self, field: ResultField) -> bool {
        !self.values(field).is_empty()
    }

    /// Distinct, non-blank strings of `field` in language-sorted order.
    #[must_use]
    pub fn strings(&self, field: ResultField, preferred: Option<&str>) -> Vec<String> {
        unique_sorted_strings(self.values(field), preferred)
    }

    /// The record's identifier: the first sorted id value, else the URI.
    #[must_use]
    pub fn id(&self, preferred: Option<&str>) -> String {
        self.strings(ResultField::Id, preferred)
            .into_iter()
            .next()
            .unwrap_or_else(|| self.uri().to_string())
    }

    /// Returns the record with every field's values language-sorted.
    #[must_use]
    pub fn into_language_sorted(self, preferred: Option<&str>) -> Self {
        let fields = self
            .fields
            .into_iter()
            .map(|(field, values)| (field, language_sort(&values, preferred)))
            .collect();
        Self {
            subject: self.subject,
            fields,
        }
    }
}

/// Accumulates one subject's field values, dropping repeated values.
#[derive(Debug)]
pub struct RecordBuilder {
    subject: RdfNode,
    fields: IndexMap<ResultField, Vec<RdfNode>>,
}

impl RecordBuilder {
    /// Starts a record for `subject`.
    #[must_use]
    pub fn new(subject: RdfNode) -> Self {
        Self {
            subject,
            fields: IndexMap::new(),
        }
    }

    /// Adds `value` to `field` unless it is already there.
    pub fn push(&mut self, field: ResultField, value: RdfNode) -> &mut Self {
        let values = self.fields.entry(field).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
        self
    }

    /// Adds every value of `values` to `field`.
    pub fn extend<I>(&mut self, field: ResultField, values: I) -> &mut Self
    where
        I: IntoIterator<Item = RdfNode>,
    {
        for value in values {
            self.push(field, value);
        }
        self
    }

    /// Finishes the record.
    #[must_use]
    pub fn build(self) -> ConsolidatedRecord {
        ConsolidatedRecord {
            subject: self.subject,
            fields: self.fields,
        }
    }
}

/// Extracts one consolidated record per labelled subject of `graph`.
///
/// Records come back in order of each subject's first label triple.
#[must_use]
pub fn extract<R: ResultsMap>(graph: &RdfGraph, results_map: &R) -> Vec<ConsolidatedRecord> {
    let label_predicate = results_map.label_predicate();
    let mut subjects: Vec<&RdfNode> = Vec::new();
    for triple in graph.triples() {
        if triple.predicate == label_predicate && !subjects.contains(&&triple.subject) {
            subjects.push(&triple.subject);
        }
    }

    subjects
        .into_iter()
        .map(|subject| {
            let mut builder = RecordBuilder::new(subject.clone());
            for (field, source) in results_map.predicate_map() {
                match source {
                    FieldSource::SubjectUri => {
                        builder.push(*field, subject.clone());
                    },
                    FieldSource::Predicate(predicate) => {
                        builder.extend(*field, graph.objects(subject, predicate).cloned());
                    },
                }
            }
            builder.build()
        })
        .collect()
}
