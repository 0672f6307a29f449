//! RDF graph model for authority responses.
//!
//! This module provides a small owned representation of an RDF graph and
//! parsing through the oxrdfio library. Authority responses are parsed once
//! into an [`RdfGraph`]; every later stage (filtering, extraction, context
//! paths) works on these owned triples.

use std::fmt;
use std::io::Read;

use oxrdf::{NamedOrBlankNode, Quad, Term};
use oxrdfio::{JsonLdProfileSet, RdfFormat as OxRdfFormat, RdfParser};

use crate::error::{LinkedDataError, Result};
use crate::namespaces::XSD;

/// Serialization format of an authority response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RdfFormat {
    /// RDF/XML format (application/rdf+xml) - Most common for older authorities
    #[default]
    RdfXml,
    /// JSON-LD format (application/ld+json)
    JsonLd,
    /// Turtle format (text/turtle)
    Turtle,
    /// N-Triples format (application/n-triples)
    NTriples,
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RdfXml => write!(f, "RDF/XML"),
            Self::JsonLd => write!(f, "JSON-LD"),
            Self::Turtle => write!(f, "Turtle"),
            Self::NTriples => write!(f, "N-Triples"),
        }
    }
}

impl RdfFormat {
    /// Returns the MIME type for this RDF format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::RdfXml => "application/rdf+xml",
            Self::JsonLd => "application/ld+json",
            Self::Turtle => "text/turtle",
            Self::NTriples => "application/n-triples",
        }
    }

    /// Returns the typical file extension for this RDF format.
    #[must_use]
    pub const fn file_extension(&self) -> &'static str {
        match self {
            Self::RdfXml => "rdf",
            Self::JsonLd => "jsonld",
            Self::Turtle => "ttl",
            Self::NTriples => "nt",
        }
    }

    /// Guesses the format from a `Content-Type` header value.
    ///
    /// Parameters such as `; charset=utf-8` are ignored.
    #[must_use]
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/rdf+xml" | "application/xml" | "text/xml" => Some(Self::RdfXml),
            "application/ld+json" | "application/json" => Some(Self::JsonLd),
            "text/turtle" | "application/x-turtle" => Some(Self::Turtle),
            "application/n-triples" | "text/plain" => Some(Self::NTriples),
            _ => None,
        }
    }

    /// Guesses the format from the extension of a URL path or file name.
    #[must_use]
    pub fn from_extension(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let (_, ext) = path.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "rdf" | "xml" | "owl" => Some(Self::RdfXml),
            "jsonld" | "json" => Some(Self::JsonLd),
            "ttl" => Some(Self::Turtle),
            "nt" => Some(Self::NTriples),
            _ => None,
        }
    }
}

/// A single RDF triple (subject, predicate, object).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdfTriple {
    /// The subject of the triple.
    pub subject: RdfNode,
    /// The predicate (property) of the triple.
    pub predicate: String,
    /// The object of the triple.
    pub object: RdfNode,
}

impl RdfTriple {
    /// Creates a new RDF triple.
    #[must_use]
    pub fn new(subject: RdfNode, predicate: impl Into<String>, object: RdfNode) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

/// An RDF node (subject or object in a triple).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfNode {
    /// A named node (IRI/URI).
    Uri(String),
    /// A blank node with a local identifier.
    BlankNode(String),
    /// A literal value with optional language tag or datatype.
    Literal {
        /// The literal value.
        value: String,
        /// Optional language tag (e.g., "en", "ja").
        language: Option<String>,
        /// Optional datatype URI.
        datatype: Option<String>,
    },
}

impl RdfNode {
    /// Creates a new URI node.
    #[must_use]
    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }

    /// Creates a new blank node.
    #[must_use]
    pub fn blank(id: impl Into<String>) -> Self {
        Self::BlankNode(id.into())
    }

    /// Creates a new plain literal.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Creates a new literal with a language tag.
    #[must_use]
    pub fn literal_with_lang(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: Some(lang.into()),
            datatype: None,
        }
    }

    /// Creates a new typed literal.
    #[must_use]
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }

    /// Returns true if this is a URI node.
    #[must_use]
    pub const fn is_uri(&self) -> bool {
        matches!(self, Self::Uri(_))
    }

    /// Returns true if this is a blank node.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }

    /// Returns true if this is a literal.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }

    /// Returns the language tag of a literal, if any.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Literal {
                language: Some(lang),
                ..
            } if !lang.is_empty() => Some(lang),
            _ => None,
        }
    }

    /// Returns the datatype IRI of a typed literal, if any.
    #[must_use]
    pub fn datatype(&self) -> Option<&str> {
        match self {
            Self::Literal {
                datatype: Some(dt), ..
            } => Some(dt),
            _ => None,
        }
    }

    /// Returns the string form of the node: the lexical value of a literal,
    /// the IRI of a named node, or the label of a blank node.
    #[must_use]
    pub fn lexical(&self) -> &str {
        match self {
            Self::Uri(uri) => uri,
            Self::BlankNode(id) => id,
            Self::Literal { value, .. } => value,
        }
    }
}

impl fmt::Display for RdfNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uri(uri) => write!(f, "<{uri}>"),
            Self::BlankNode(id) => write!(f, "_:{id}"),
            Self::Literal {
                value,
                language: Some(lang),
                ..
            } => write!(f, "\"{value}\"@{lang}"),
            Self::Literal {
                value,
                datatype: Some(dt),
                ..
            } => write!(f, "\"{value}\"^^<{dt}>"),
            Self::Literal { value, .. } => write!(f, "\"{value}\""),
        }
    }
}

/// An RDF graph containing triples.
///
/// Triples keep the order in which they were parsed or added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RdfGraph {
    triples: Vec<RdfTriple>,
}

impl RdfGraph {
    /// Creates a new empty RDF graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple to the graph.
    pub fn add_triple(&mut self, triple: RdfTriple) {
        self.triples.push(triple);
    }

    /// Adds a triple from components.
    pub fn add(&mut self, subject: RdfNode, predicate: impl Into<String>, object: RdfNode) {
        self.add_triple(RdfTriple::new(subject, predicate, object));
    }

    /// Returns the number of triples in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Returns an iterator over the triples.
    pub fn triples(&self) -> impl Iterator<Item = &RdfTriple> {
        self.triples.iter()
    }

    /// Returns an iterator over the triples whose subject is `subject`.
    pub fn triples_for_subject<'a>(
        &'a self,
        subject: &'a RdfNode,
    ) -> impl Iterator<Item = &'a RdfTriple> + 'a {
        self.triples.iter().filter(move |t| &t.subject == subject)
    }

    /// Returns the objects of every `(subject, predicate, ?)` triple.
    pub fn objects<'a>(
        &'a self,
        subject: &'a RdfNode,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a RdfNode> + 'a {
        self.triples_for_subject(subject)
            .filter(move |t| t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Returns the subjects of every `(?, predicate, object)` triple.
    pub fn subjects<'a>(
        &'a self,
        predicate: &'a str,
        object: &'a RdfNode,
    ) -> impl Iterator<Item = &'a RdfNode> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.predicate == predicate && &t.object == object)
            .map(|t| &t.subject)
    }

    /// Returns a new graph holding only the triples accepted by `keep`.
    #[must_use]
    pub fn filtered<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&RdfTriple) -> bool,
    {
        Self {
            triples: self.triples.iter().filter(|t| keep(t)).cloned().collect(),
        }
    }

    /// Parses an RDF graph from a reader in the specified format.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::RdfParse`] describing the first syntax
    /// error. Callers fetching remote graphs reclassify it as a service
    /// error carrying the URL.
    pub fn parse_from_reader<R: Read>(reader: R, format: RdfFormat) -> Result<Self> {
        let parser = RdfParser::from_format(to_oxrdf_format(format)).for_reader(reader);

        let mut graph = Self::new();
        for result in parser {
            let quad = result.map_err(|e| {
                LinkedDataError::RdfParse(format!("unparseable {format} content: {e}"))
            })?;
            if let Some(triple) = from_oxrdf_quad(&quad) {
                graph.add_triple(triple);
            }
        }

        Ok(graph)
    }

    /// Parses an RDF graph from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn parse(input: &str, format: RdfFormat) -> Result<Self> {
        Self::parse_from_reader(input.as_bytes(), format)
    }
}

impl FromIterator<RdfTriple> for RdfGraph {
    fn from_iter<I: IntoIterator<Item = RdfTriple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

/// Converts our [`RdfFormat`] to oxrdfio's format.
fn to_oxrdf_format(format: RdfFormat) -> OxRdfFormat {
    match format {
        RdfFormat::RdfXml => OxRdfFormat::RdfXml,
        RdfFormat::JsonLd => OxRdfFormat::JsonLd {
            profile: JsonLdProfileSet::default(),
        },
        RdfFormat::Turtle => OxRdfFormat::Turtle,
        RdfFormat::NTriples => OxRdfFormat::NTriples,
    }
}

/// Converts an oxrdf Quad to our [`RdfTriple`], dropping the graph name.
///
/// Quoted triples have no counterpart in authority responses and are skipped.
fn from_oxrdf_quad(quad: &Quad) -> Option<RdfTriple> {
    let subject = match &quad.subject {
        NamedOrBlankNode::NamedNode(n) => RdfNode::Uri(n.as_str().to_string()),
        NamedOrBlankNode::BlankNode(b) => RdfNode::BlankNode(b.as_str().to_string()),
        #[allow(unreachable_patterns)]
        _ => return None,
    };

    let object = match &quad.object {
        Term::NamedNode(n) => RdfNode::Uri(n.as_str().to_string()),
        Term::BlankNode(b) => RdfNode::BlankNode(b.as_str().to_string()),
        Term::Literal(lit) => {
            let language = lit.language().map(str::to_string);
            let xsd_string = format!("{XSD}string");
            let datatype = if language.is_none() && lit.datatype().as_str() != xsd_string {
                Some(lit.datatype().as_str().to_string())
            } else {
                None
            };
            RdfNode::Literal {
                value: lit.value().to_string(),
                language,
                datatype,
            }
        },
        #[allow(unreachable_patterns)]
        _ => return None,
    };

    Some(RdfTriple::new(subject, quad.predicate.as_str(), object))
}
