//! Common test helpers shared across the integration test suite.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use authlink::graph_service::{classify_status, parse_graph};
use authlink::{
    AuthorityRegistry, GraphLoader, LinkedDataAuthority, LinkedDataError, RdfFormat, RdfGraph,
    Result,
};

/// Request URL of the `lod_cornell` search for `cornell` with default bindings.
#[allow(dead_code)]
pub const CORNELL_SEARCH_URL: &str =
    "http://localhost/test_default/search?subauth=search_sub1_name&query=cornell&param1=delta";

/// Request URL of the `lod_cornell` term lookup for `C_9513`.
#[allow(dead_code)]
pub const C_9513_TERM_URL: &str = "http://localhost/test_default/term/C_9513?param1=alpha";

/// Path of the fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Directory holding the authority configuration fixtures.
#[allow(dead_code)]
pub fn authorities_dir() -> PathBuf {
    fixtures_dir().join("authorities")
}

/// What the fixture loader answers for a URL.
#[derive(Debug, Clone)]
pub enum FixtureResponse {
    /// An N-Triples file under `tests/fixtures/graphs`.
    Graph(&'static str),
    /// A bare HTTP status.
    Status(u16),
}

/// In-memory [`GraphLoader`] serving fixtures keyed by exact URL.
///
/// Unknown URLs answer 404. Every requested URL is recorded.
#[derive(Debug, Default)]
pub struct FixtureLoader {
    responses: HashMap<String, FixtureResponse>,
    requested: Mutex<Vec<String>>,
}

impl FixtureLoader {
    /// Creates a loader with no fixtures.
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves the graph file `name` for `url`.
    #[allow(dead_code)]
    pub fn with_graph(mut self, url: &str, name: &'static str) -> Self {
        self.responses
            .insert(url.to_string(), FixtureResponse::Graph(name));
        self
    }

    /// Answers `url` with `status`.
    #[allow(dead_code)]
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), FixtureResponse::Status(status));
        self
    }

    /// URLs requested so far, in order.
    #[allow(dead_code)]
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl GraphLoader for FixtureLoader {
    fn load(&self, url: &str, format: Option<RdfFormat>) -> Result<RdfGraph> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(url.to_string());
        }
        match self.responses.get(url) {
            Some(FixtureResponse::Graph(name)) => {
                let file = File::open(fixtures_dir().join("graphs").join(name))?;
                parse_graph(
                    url,
                    BufReader::new(file),
                    format.unwrap_or(RdfFormat::NTriples),
                )
            },
            Some(FixtureResponse::Status(status)) => Err(classify_status(*status, url)
                .unwrap_or_else(|| LinkedDataError::InvalidRequest(format!("status {status}")))),
            None => Err(classify_status(404, url).unwrap_or_else(|| {
                LinkedDataError::InvalidRequest(format!("no fixture for {url}"))
            })),
        }
    }
}

/// Registry over the authority fixtures directory.
#[allow(dead_code)]
pub fn fixture_registry() -> AuthorityRegistry {
    AuthorityRegistry::from_directory(authorities_dir())
}

/// Resolves `name` from the fixtures directory with `loader`.
#[allow(dead_code)]
pub fn fixture_authority(name: &str, loader: Arc<FixtureLoader>) -> LinkedDataAuthority {
    LinkedDataAuthority::new(&fixture_registry(), name, loader).expect("fixture authority")
}
