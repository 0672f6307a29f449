//! Results maps: which predicate feeds which output field.
//!
//! Each action has its own variant. Both require a label predicate; the
//! optional fields differ between [`SearchResultsMap`] and [`TermResultsMap`].

use std::fmt;

use indexmap::IndexMap;

use crate::error::{LinkedDataError, Result};

use super::PrefixMap;

/// Output fields a results map can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultField {
    /// The subject's URI.
    Uri,
    /// Identifier of the resource.
    Id,
    /// Preferred label.
    Label,
    /// Alternate labels.
    AltLabel,
    /// Sort key (search only).
    Sort,
    /// Broader terms (term only).
    Broader,
    /// Narrower terms (term only).
    Narrower,
    /// Equivalent resources (term only).
    SameAs,
}

impl ResultField {
    /// Returns the output key of this field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uri => "uri",
            Self::Id => "id",
            Self::Label => "label",
            Self::AltLabel => "altlabel",
            Self::Sort => "sort",
            Self::Broader => "broader",
            Self::Narrower => "narrower",
            Self::SameAs => "sameas",
        }
    }

    /// Returns the configuration key naming this field's predicate.
    #[must_use]
    pub const fn config_key(&self) -> &'static str {
        match self {
            Self::Uri => "uri_predicate",
            Self::Id => "id_predicate",
            Self::Label => "label_predicate",
            Self::AltLabel => "altlabel_predicate",
            Self::Sort => "sort_predicate",
            Self::Broader => "broader_predicate",
            Self::Narrower => "narrower_predicate",
            Self::SameAs => "sameas_predicate",
        }
    }
}

impl fmt::Display for ResultField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a field's values come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// The subject's own URI.
    SubjectUri,
    /// Objects of the given predicate on the subject.
    Predicate(String),
}

impl FieldSource {
    /// Returns the predicate IRI, if this source reads one.
    #[must_use]
    pub fn predicate(&self) -> Option<&str> {
        match self {
            Self::SubjectUri => None,
            Self::Predicate(p) => Some(p),
        }
    }
}

/// Common behaviour of the search and term results maps.
pub trait ResultsMap {
    /// Optional fields this variant accepts besides `uri`, `id` and `label`.
    const OPTIONAL_FIELDS: &'static [ResultField];

    /// Ordered field → source map; always starts with `uri`, `id`, `label`.
    fn predicate_map(&self) -> &IndexMap<ResultField, FieldSource>;

    /// Returns the source of `field`, if configured.
    fn source(&self, field: ResultField) -> Option<&FieldSource> {
        self.predicate_map().get(&field)
    }

    /// Returns the label predicate.
    fn label_predicate(&self) -> &str {
        self.source(ResultField::Label)
            .and_then(FieldSource::predicate)
            .unwrap_or_default()
    }

    /// Returns true if `field` reads a predicate.
    fn has_predicate(&self, field: ResultField) -> bool {
        self.source(field)
            .and_then(FieldSource::predicate)
            .is_some()
    }

    /// Deduplicated predicates to retain when filtering a graph for this action.
    fn predicates(&self) -> Vec<&str> {
        let mut predicates: Vec<&str> = Vec::new();
        for predicate in self.predicate_map().values().filter_map(FieldSource::predicate) {
            if !predicates.contains(&predicate) {
                predicates.push(predicate);
            }
        }
        predicates
    }
}

/// Builds the shared field map, failing without a label predicate.
fn build_predicate_map(
    results: &IndexMap<String, String>,
    prefixes: &PrefixMap,
    optional: &[ResultField],
) -> Result<IndexMap<ResultField, FieldSource>> {
    let lookup = |field: ResultField| -> Result<Option<String>> {
        results
            .get(field.config_key())
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(|value| prefixes.expand(value))
            .transpose()
    };

    let label = lookup(ResultField::Label)?.ok_or_else(|| {
        LinkedDataError::InvalidConfiguration("results map is missing label_predicate".into())
    })?;

    let mut map = IndexMap::new();
    map.insert(ResultField::Uri, FieldSource::SubjectUri);
    map.insert(
        ResultField::Id,
        lookup(ResultField::Id)?.map_or(FieldSource::SubjectUri, FieldSource::Predicate),
    );
    map.insert(ResultField::Label, FieldSource::Predicate(label));
    for field in optional {
        if let Some(predicate) = lookup(*field)? {
            map.insert(*field, FieldSource::Predicate(predicate));
        }
    }
    Ok(map)
}

/// Results map of the search action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultsMap {
    predicate_map: IndexMap<ResultField, FieldSource>,
}

impl SearchResultsMap {
    /// Builds the map from a raw `results` block.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidConfiguration`] when the label
    /// predicate is missing or a predicate uses an unknown prefix.
    pub fn new(results: &IndexMap<String, String>, prefixes: &PrefixMap) -> Result<Self> {
        Ok(Self {
            predicate_map: build_predicate_map(results, prefixes, Self::OPTIONAL_FIELDS)?,
        })
    }
}

impl ResultsMap for SearchResultsMap {
    const OPTIONAL_FIELDS: &'static [ResultField] = &[ResultField::AltLabel, ResultField::Sort];

    fn predicate_map(&self) -> &IndexMap<ResultField, FieldSource> {
        &self.predicate_map
    }
}

/// Results map of the term action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermResultsMap {
    predicate_map: IndexMap<ResultField, FieldSource>,
}

impl TermResultsMap {
    /// Builds the map from a raw `results` block.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidConfiguration`] when the label
    /// predicate is missing or a predicate uses an unknown prefix.
    pub fn new(results: &IndexMap<String, String>, prefixes: &PrefixMap) -> Result<Self> {
        Ok(Self {
            predicate_map: build_predicate_map(results, prefixes, Self::OPTIONAL_FIELDS)?,
        })
    }
}

impl ResultsMap for TermResultsMap {
    const OPTIONAL_FIELDS: &'static [ResultField] = &[
        ResultField::AltLabel,
        ResultField::Broader,
        ResultField::Narrower,
        ResultField::SameAs,
    ];

    fn predicate_map(&self) -> &IndexMap<ResultField, FieldSource> {
        &self.predicate_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::properties;

    fn results(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_label_is_required_for_every_variant() {
        let prefixes = PrefixMap::default();
        let no_label = results(&[("id_predicate", "dcterms:identifier")]);

        let err = SearchResultsMap::new(&no_label, &prefixes).unwrap_err();
        assert!(matches!(err, LinkedDataError::InvalidConfiguration(_)));

        let err = TermResultsMap::new(&no_label, &prefixes).unwrap_err();
        assert!(matches!(err, LinkedDataError::InvalidConfiguration(_)));

        let blank_label = results(&[("label_predicate", "  ")]);
        assert!(TermResultsMap::new(&blank_label, &prefixes).is_err());
    }

    #[test]
    fn test_id_defaults_to_subject_uri() {
        let map = SearchResultsMap::new(
            &results(&[("label_predicate", "skos:prefLabel")]),
            &PrefixMap::default(),
        )
        .unwrap();
        assert_eq!(map.source(ResultField::Id), Some(&FieldSource::SubjectUri));
        assert_eq!(map.source(ResultField::Uri), Some(&FieldSource::SubjectUri));
        assert_eq!(map.label_predicate(), properties::PREF_LABEL);
        assert!(!map.has_predicate(ResultField::Sort));
    }

    #[test]
    fn test_search_ignores_term_only_fields() {
        let map = SearchResultsMap::new(
            &results(&[
                ("label_predicate", "skos:prefLabel"),
                ("sort_predicate", "skos:prefLabel"),
                ("broader_predicate", "skos:broader"),
            ]),
            &PrefixMap::default(),
        )
        .unwrap();
        assert!(map.has_predicate(ResultField::Sort));
        assert!(map.source(ResultField::Broader).is_none());
        assert_eq!(map.predicates(), vec![properties::PREF_LABEL]);
    }

    #[test]
    fn test_term_predicates_are_deduplicated_in_order() {
        let map = TermResultsMap::new(
            &results(&[
                ("id_predicate", properties::IDENTIFIER),
                ("label_predicate", "skos:prefLabel"),
                ("altlabel_predicate", "skos:altLabel"),
                ("broader_predicate", "skos:broader"),
                ("narrower_predicate", "skos:narrower"),
                ("sameas_predicate", "skos:prefLabel"),
                ("sort_predicate", "skos:altLabel"),
            ]),
            &PrefixMap::default(),
        )
        .unwrap();
        assert_eq!(
            map.predicates(),
            vec![
                properties::IDENTIFIER,
                properties::PREF_LABEL,
                properties::ALT_LABEL,
                properties::BROADER,
                properties::NARROWER,
            ]
        );
        assert!(map.source(ResultField::Sort).is_none());
    }

    #[test]
    fn test_unknown_prefix_is_configuration_error() {
        let err = TermResultsMap::new(
            &results(&[("label_predicate", "nope:label")]),
            &PrefixMap::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
