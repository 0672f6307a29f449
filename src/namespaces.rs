//! Namespace definitions for vocabularies used by linked data authorities.
//!
//! Authority configurations may abbreviate predicates as `prefix:local`
//! CURIEs. The prefixes defined here are always available; a configuration
//! may add its own through its `prefixes` block.

/// RDF namespace.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// RDF Schema namespace.
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";

/// XML Schema namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// OWL namespace.
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";

/// SKOS core namespace.
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";

/// SKOS-XL namespace.
pub const SKOSXL: &str = "http://www.w3.org/2008/05/skos-xl#";

/// Dublin Core terms namespace.
pub const DCTERMS: &str = "http://purl.org/dc/terms/";

/// schema.org namespace.
pub const SCHEMA: &str = "http://schema.org/";

/// MADS/RDF namespace (Metadata Authority Description Schema).
pub const MADSRDF: &str = "http://www.loc.gov/mads/rdf/v1#";

/// GeoNames ontology namespace.
pub const GEONAMES: &str = "http://www.geonames.org/ontology#";

/// VIVO core namespace.
pub const VIVO: &str = "http://vivoweb.org/ontology/core#";

/// Built-in CURIE prefixes, available to every authority configuration.
pub const DEFAULT_PREFIXES: &[(&str, &str)] = &[
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("xsd", XSD),
    ("owl", OWL),
    ("skos", SKOS),
    ("skosxl", SKOSXL),
    ("dcterms", DCTERMS),
    ("schema", SCHEMA),
    ("madsrdf", MADSRDF),
    ("gn", GEONAMES),
    ("vivo", VIVO),
];

/// Frequently configured predicates.
pub mod properties {
    /// `skos:prefLabel`
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    /// `skos:altLabel`
    pub const ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
    /// `skos:broader`
    pub const BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
    /// `skos:narrower`
    pub const NARROWER: &str = "http://www.w3.org/2004/02/skos/core#narrower";
    /// `skos:exactMatch`
    pub const EXACT_MATCH: &str = "http://www.w3.org/2004/02/skos/core#exactMatch";
    /// `rdfs:label`
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// `owl:sameAs`
    pub const SAME_AS: &str = "http://www.w3.org/2002/07/owl#sameAs";
    /// `dcterms:identifier`
    pub const IDENTIFIER: &str = "http://purl.org/dc/terms/identifier";
    /// `rdf:type`
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefixes_are_unique() {
        let mut names: Vec<_> = DEFAULT_PREFIXES.iter().map(|(p, _)| *p).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DEFAULT_PREFIXES.len());
    }

    #[test]
    fn test_properties_live_in_their_namespaces() {
        assert!(properties::PREF_LABEL.starts_with(SKOS));
        assert!(properties::LABEL.starts_with(RDFS));
        assert!(properties::SAME_AS.starts_with(OWL));
        assert!(properties::IDENTIFIER.starts_with(DCTERMS));
    }
}
