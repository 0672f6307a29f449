//! Integration tests for the term lookup pipeline against fixture graphs.

mod common;

use std::sync::Arc;

use authlink::{LinkedDataError, RequestHeader};
use common::{fixture_authority, FixtureLoader, C_9513_TERM_URL};
use serde_json::json;

fn term_loader() -> FixtureLoader {
    FixtureLoader::new().with_graph(C_9513_TERM_URL, "term_c_9513.nt")
}

#[test]
fn test_find_term() {
    let authority = fixture_authority("lod_cornell", Arc::new(term_loader()));
    let term = authority
        .find("C_9513", &RequestHeader::new())
        .unwrap()
        .expect("term found");

    assert_eq!(term.uri, "http://id.example.org/term/C_9513");
    assert_eq!(term.id, "C_9513");
    assert_eq!(term.label, vec!["buttermilk"]);
    assert_eq!(term.altlabel, vec!["butter milk", "Cultured buttermilk"]);
    assert_eq!(term.broader, vec!["http://id.example.org/term/C_4826"]);
    assert_eq!(term.narrower, vec!["http://id.example.org/term/C_95131"]);
    assert_eq!(
        term.sameas,
        vec![
            "http://example.org/lcsh/sh85018277",
            "http://example.org/nal/38416"
        ]
    );
}

#[test]
fn test_term_predicates_map() {
    let authority = fixture_authority("lod_cornell", Arc::new(term_loader()));
    let term = authority
        .find("C_9513", &RequestHeader::new())
        .unwrap()
        .unwrap();

    let predicates = serde_json::to_value(&term.predicates).unwrap();
    assert_eq!(
        predicates["http://www.w3.org/2004/02/skos/core#prefLabel"],
        json!(["buttermilk", "babeurre"])
    );
    assert_eq!(
        predicates["http://www.w3.org/1999/02/22-rdf-syntax-ns#type"],
        json!("http://www.w3.org/2004/02/skos/core#Concept")
    );
    assert!(predicates
        .get("http://www.w3.org/2008/05/skos-xl#prefLabel")
        .is_none());
    assert_eq!(term.predicates.len(), 7);
}

#[test]
fn test_term_language_override() {
    let authority = fixture_authority("lod_cornell", Arc::new(term_loader()));
    let term = authority
        .find("C_9513", &RequestHeader::new().with_language("fr, en"))
        .unwrap()
        .unwrap();
    assert_eq!(term.label, vec!["babeurre", "buttermilk"]);
}

#[test]
fn test_term_json_shape() {
    let authority = fixture_authority("lod_cornell", Arc::new(term_loader()));
    let term = authority
        .find("C_9513", &RequestHeader::new())
        .unwrap()
        .unwrap();
    let value = serde_json::to_value(&term).unwrap();
    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(
        keys,
        vec!["uri", "id", "label", "altlabel", "broader", "narrower", "sameas", "predicates"]
    );
}

#[test]
fn test_bad_id_is_term_not_found_with_url() {
    let loader = Arc::new(term_loader());
    let authority = fixture_authority("lod_cornell", Arc::clone(&loader));

    let err = authority
        .find("BAD_ID", &RequestHeader::new())
        .unwrap_err();

    let url = "http://localhost/test_default/term/BAD_ID?param1=alpha";
    assert!(matches!(err, LinkedDataError::TermNotFound { url: ref u } if u == url));
    assert!(err.to_string().contains(url));
    assert_eq!(loader.requested(), vec![url.to_string()]);
}

#[test]
fn test_service_unavailable() {
    let loader = term_loader().with_status(
        "http://localhost/test_default/term/C_503?param1=alpha",
        503,
    );
    let authority = fixture_authority("lod_cornell", Arc::new(loader));
    let err = authority.find("C_503", &RequestHeader::new()).unwrap_err();
    assert!(matches!(
        err,
        LinkedDataError::ServiceUnavailable { ref host, port: 80, .. } if host == "localhost"
    ));
}

#[test]
fn test_other_failures_are_service_errors() {
    let loader = term_loader().with_status(
        "http://localhost/test_default/term/C_500?param1=alpha",
        500,
    );
    let authority = fixture_authority("lod_cornell", Arc::new(loader));
    let err = authority.find("C_500", &RequestHeader::new()).unwrap_err();
    assert!(matches!(err, LinkedDataError::ServiceError { .. }));
    assert!(err.to_string().contains("C_500"));
}

#[test]
fn test_malformed_graph_is_service_error() {
    let loader = FixtureLoader::new().with_graph(C_9513_TERM_URL, "malformed.nt");
    let authority = fixture_authority("lod_cornell", Arc::new(loader));
    let err = authority.find("C_9513", &RequestHeader::new()).unwrap_err();
    assert!(matches!(
        err,
        LinkedDataError::ServiceError { ref url, .. } if url == C_9513_TERM_URL
    ));
    assert!(err.is_service_error());
}

#[test]
fn test_graph_without_labels_is_none() {
    let loader = FixtureLoader::new().with_graph(C_9513_TERM_URL, "empty.nt");
    let authority = fixture_authority("lod_cornell", Arc::new(loader));
    assert!(authority
        .find("C_9513", &RequestHeader::new())
        .unwrap()
        .is_none());
}
