//! Graph retrieval and filtering.
//!
//! [`GraphLoader`] is the transport seam: it turns a request URL into an
//! [`RdfGraph`] and reports failures as classified [`LinkedDataError`]s.
//! [`HttpGraphLoader`] is the blocking HTTP implementation; tests and
//! offline tools can supply their own loader.
//!
//! Failures are never retried here; retry policy belongs to the caller.

use std::borrow::Cow;
use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use crate::error::{LinkedDataError, Result};
use crate::language::LanguageSet;
use crate::rdf::{RdfFormat, RdfGraph};

/// `Accept` header sent to authorities, most specific formats first.
pub const ACCEPT_RDF: &str = "application/n-triples, text/turtle;q=0.9, \
     application/rdf+xml;q=0.8, application/ld+json;q=0.7, */*;q=0.1";

/// Fetches and parses authority graphs.
pub trait GraphLoader: Send + Sync {
    /// Loads the graph behind `url`.
    ///
    /// `format` forces the parse format; otherwise the loader negotiates it.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::TermNotFound`],
    /// [`LinkedDataError::ServiceUnavailable`] or
    /// [`LinkedDataError::ServiceError`] as classified by [`classify_status`]
    /// and [`service_error`].
    fn load(&self, url: &str, format: Option<RdfFormat>) -> Result<RdfGraph>;
}

/// Host and port of a request URL, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Host name, or `unknown` if the URL does not parse.
    pub host: String,
    /// Port, falling back to the scheme default.
    pub port: u16,
}

impl Endpoint {
    /// Extracts host and port from `url`.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        url::Url::parse(url).map_or_else(
            |_| Self {
                host: "unknown".to_string(),
                port: 0,
            },
            |parsed| Self {
                host: parsed.host_str().unwrap_or("unknown").to_string(),
                port: parsed.port_or_known_default().unwrap_or(0),
            },
        )
    }
}

/// Maps an HTTP status to the domain error it represents.
///
/// Returns `None` for success statuses.
#[must_use]
pub fn classify_status(status: u16, url: &str) -> Option<LinkedDataError> {
    if (200..300).contains(&status) {
        return None;
    }
    let Endpoint { host, port } = Endpoint::from_url(url);
    Some(match status {
        404 => LinkedDataError::TermNotFound {
            url: url.to_string(),
        },
        503 => LinkedDataError::ServiceUnavailable {
            host,
            port,
            url: url.to_string(),
        },
        other => LinkedDataError::ServiceError {
            host,
            port,
            url: url.to_string(),
            message: format!("unexpected HTTP status {other}"),
        },
    })
}

/// Builds a [`LinkedDataError::ServiceError`] for `url`.
#[must_use]
pub fn service_error(url: &str, message: impl Into<String>) -> LinkedDataError {
    let Endpoint { host, port } = Endpoint::from_url(url);
    LinkedDataError::ServiceError {
        host,
        port,
        url: url.to_string(),
        message: message.into(),
    }
}

fn service_unavailable(url: &str) -> LinkedDataError {
    let Endpoint { host, port } = Endpoint::from_url(url);
    LinkedDataError::ServiceUnavailable {
        host,
        port,
        url: url.to_string(),
    }
}

/// Blocking HTTP loader built on `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpGraphLoader {
    client: Client,
}

impl HttpGraphLoader {
    /// Creates a loader with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`LinkedDataError::InvalidConfiguration`] if the HTTP client
    /// cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("authlink/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                LinkedDataError::InvalidConfiguration(format!("unable to build HTTP client: {e}"))
            })?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl GraphLoader for HttpGraphLoader {
    fn load(&self, url: &str, format: Option<RdfFormat>) -> Result<RdfGraph> {
        debug!(url = %url, "fetching authority graph");
        let accept = format.map_or(ACCEPT_RDF, |f| f.mime_type());
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    service_unavailable(url)
                } else {
                    service_error(url, e.to_string())
                }
            })?;

        if let Some(err) = classify_status(response.status().as_u16(), url) {
            return Err(err);
        }

        let format = format
            .or_else(|| {
                response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(RdfFormat::from_media_type)
            })
            .or_else(|| RdfFormat::from_extension(url))
            .unwrap_or_default();

        let body = response
            .bytes()
            .map_err(|e| service_error(url, e.to_string()))?;
        let graph = parse_graph(url, body.as_ref(), format)?;
        debug!(url = %url, %format, triples = graph.len(), "parsed authority graph");
        Ok(graph)
    }
}

/// Parses a graph fetched from `url`.
///
/// # Errors
///
/// Unparseable content is the service's fault and is reported as
/// [`LinkedDataError::ServiceError`] for `url`.
pub fn parse_graph<R: Read>(url: &str, reader: R, format: RdfFormat) -> Result<RdfGraph> {
    RdfGraph::parse_from_reader(reader, format).map_err(|e| match e {
        LinkedDataError::RdfParse(message) => service_error(url, message),
        other => service_error(url, other.to_string()),
    })
}

/// Filters `graph` by language and/or anonymous subjects.
///
/// A triple is dropped when `remove_blank_subjects` is set and its subject
/// is a blank node, or when `language` is non-empty and the object is a
/// language-tagged literal whose tag is not in the set. Untagged objects
/// are never dropped by language. When nothing can be dropped the input
/// graph is returned unchanged.
#[must_use]
pub fn filter<'a>(
    graph: &'a RdfGraph,
    language: Option<&LanguageSet>,
    remove_blank_subjects: bool,
) -> Cow<'a, RdfGraph> {
    let language = language.filter(|l| !l.is_empty());
    if language.is_none() && !remove_blank_subjects {
        return Cow::Borrowed(graph);
    }
    Cow::Owned(graph.filtered(|triple| {
        if remove_blank_subjects && triple.subject.is_blank() {
            return false;
        }
        match (language, triple.object.language()) {
            (Some(langs), Some(tag)) => langs.contains(tag),
            _ => true,
        }
    }))
}

/// Keeps only the triples whose predicate is one of `predicates`.
///
/// Extraction reads nothing else, so pipelines prune the language-filtered
/// graph with their results map's predicates before extracting.
#[must_use]
pub fn retain_predicates(graph: &RdfGraph, predicates: &[&str]) -> RdfGraph {
    graph.filtered(|triple| predicates.contains(&triple.predicate.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::properties;
    use crate::rdf::RdfNode;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    fn graph() -> RdfGraph {
        let mut g = RdfGraph::new();
        let cow = RdfNode::uri("http://example.org/cow");
        g.add(cow.clone(), properties::PREF_LABEL, RdfNode::literal_with_lang("cow", "en"));
        g.add(cow.clone(), properties::PREF_LABEL, RdfNode::literal_with_lang("vache", "fr"));
        g.add(cow.clone(), properties::PREF_LABEL, RdfNode::literal_with_lang("Kuh", "DE"));
        g.add(cow.clone(), properties::ALT_LABEL, RdfNode::literal("mucca"));
        g.add(cow, properties::BROADER, RdfNode::blank("b1"));
        g.add(RdfNode::blank("b1"), properties::PREF_LABEL, RdfNode::literal_with_lang("animal", "en"));
        g
    }

    #[test]
    fn test_filter_by_language_keeps_untagged() {
        let langs = LanguageSet::new(["en", "de"]);
        let g = graph();
        let filtered = filter(&g, Some(&langs), false);
        let values: Vec<_> = filtered.triples().map(|t| t.object.lexical()).collect();
        assert_eq!(values, vec!["cow", "Kuh", "mucca", "b1", "animal"]);
    }

    #[test]
    fn test_filter_blank_subjects() {
        let g = graph();
        let filtered = filter(&g, None, true);
        assert_eq!(filtered.len(), 5);
        assert!(filtered.triples().all(|t| !t.subject.is_blank()));
    }

    #[test]
    fn test_filter_combined() {
        let langs = LanguageSet::new(["fr"]);
        let g = graph();
        let filtered = filter(&g, Some(&langs), true);
        let values: Vec<_> = filtered.triples().map(|t| t.object.lexical()).collect();
        assert_eq!(values, vec!["vache", "mucca", "b1"]);
    }

    #[test]
    fn test_no_filtering_returns_same_graph() {
        let g = graph();
        assert!(matches!(filter(&g, None, false), Cow::Borrowed(_)));
        assert!(matches!(
            filter(&g, Some(&LanguageSet::default()), false),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_retain_predicates() {
        let kept = retain_predicates(&graph(), &[properties::PREF_LABEL]);
        assert_eq!(kept.len(), 4);
        assert!(kept.triples().all(|t| t.predicate == properties::PREF_LABEL));
        assert!(retain_predicates(&graph(), &[]).is_empty());
    }

    #[test]
    fn test_language_without_matches_yields_empty_labels() {
        let langs = LanguageSet::new(["ja"]);
        let g = graph();
        let filtered = filter(&g, Some(&langs), false);
        assert!(filtered.triples().all(|t| t.object.language().is_none()));
    }

    #[test]
    fn test_classify_status() {
        let url = "http://localhost:8080/term?id=bad";
        assert!(classify_status(200, url).is_none());
        assert!(matches!(
            classify_status(404, url),
            Some(LinkedDataError::TermNotFound { url: u }) if u == url
        ));
        assert!(matches!(
            classify_status(503, url),
            Some(LinkedDataError::ServiceUnavailable { port: 8080, .. })
        ));
        assert!(matches!(
            classify_status(500, url),
            Some(LinkedDataError::ServiceError { .. })
        ));
        assert!(matches!(
            classify_status(400, url),
            Some(LinkedDataError::ServiceError { .. })
        ));
    }

    /// Serves one canned HTTP response on a loopback port and returns the
    /// URL plus a handle yielding the request head that was received.
    fn serve_once(
        status: &str,
        content_type: &str,
        body: &str,
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let url = format!("http://{}/graph", listener.local_addr().expect("local addr"));
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream);
            let mut head = String::new();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }
            reader
                .into_inner()
                .write_all(response.as_bytes())
                .expect("write response");
            head
        });
        (url, handle)
    }

    fn loader() -> HttpGraphLoader {
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("client");
        HttpGraphLoader::with_client(client)
    }

    const NTRIPLE: &str =
        "<http://example.org/cow> <http://www.w3.org/2004/02/skos/core#prefLabel> \"cow\"@en .\n";

    #[test]
    fn test_http_negotiates_format_from_content_type() {
        let (url, server) = serve_once("200 OK", "application/n-triples; charset=utf-8", NTRIPLE);
        let graph = loader().load(&url, None).unwrap();
        assert_eq!(graph.len(), 1);

        let head = server.join().unwrap().to_ascii_lowercase();
        assert!(head.contains("accept: application/n-triples"));
    }

    #[test]
    fn test_http_forced_format_overrides_content_type() {
        let turtle = "@prefix skos: <http://www.w3.org/2004/02/skos/core#> .\n\
                      <http://example.org/cow> skos:prefLabel \"cow\"@en .\n";
        let (url, server) = serve_once("200 OK", "text/plain", turtle);
        let graph = loader().load(&url, Some(RdfFormat::Turtle)).unwrap();
        assert_eq!(graph.len(), 1);

        let head = server.join().unwrap().to_ascii_lowercase();
        assert!(head.contains("accept: text/turtle"));
    }

    #[test]
    fn test_http_unparseable_body_is_service_error() {
        let (url, server) = serve_once("200 OK", "text/turtle", "this is <not turtle");
        let err = loader().load(&url, None).unwrap_err();
        server.join().unwrap();

        match err {
            LinkedDataError::ServiceError {
                host,
                url: failed,
                message,
                ..
            } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(failed, url);
                assert!(message.contains("Turtle"));
                assert!(!message.contains("Invalid request"));
            },
            other => panic!("expected a service error, got {other:?}"),
        }
    }

    #[test]
    fn test_http_404_is_term_not_found() {
        let (url, server) = serve_once("404 Not Found", "text/plain", "missing");
        let err = loader().load(&url, None).unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, LinkedDataError::TermNotFound { url: ref u } if *u == url));
    }

    #[test]
    fn test_http_503_is_service_unavailable() {
        let (url, server) = serve_once("503 Service Unavailable", "text/plain", "busy");
        let err = loader().load(&url, None).unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, LinkedDataError::ServiceUnavailable { .. }));
    }

    #[test]
    fn test_http_refused_connection_is_service_unavailable() {
        let port = TcpListener::bind("127.0.0.1:0")
            .and_then(|l| l.local_addr())
            .expect("free port")
            .port();
        let url = format!("http://127.0.0.1:{port}/graph");
        let err = loader().load(&url, None).unwrap_err();
        assert!(matches!(
            err,
            LinkedDataError::ServiceUnavailable { port: p, .. } if p == port
        ));
    }

    #[test]
    fn test_parse_graph_reclassifies_syntax_errors() {
        let err = parse_graph("http://localhost/x.nt", "not rdf".as_bytes(), RdfFormat::NTriples)
            .unwrap_err();
        assert!(matches!(err, LinkedDataError::ServiceError { ref url, .. } if url == "http://localhost/x.nt"));
    }

    #[test]
    fn test_endpoint_from_url() {
        assert_eq!(
            Endpoint::from_url("https://id.loc.gov/search"),
            Endpoint {
                host: "id.loc.gov".into(),
                port: 443
            }
        );
        assert_eq!(Endpoint::from_url("not a url").host, "unknown");
    }
}
