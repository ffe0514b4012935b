//! Test fetching every page up front.

use serde_json::json;

use crate::e2e_tests::helpers::*;
use crate::error::QueryError;
use crate::transport::TransportError;
use crate::types::{Aggregate, Format, Query};

#[test]
fn test_fetch_all_json_truncates_padding() {
    let test = TestClient::new(2);
    test.push_counts(3, 2);
    test.push_page(&[untyped("A"), untyped("B")]);
    test.push_page(&[untyped("C"), untyped("B")]);

    let engine = test.engine();
    let aggregate = engine.fetch_all(&Query::new(), Format::Json).unwrap();

    assert_eq!(
        aggregate,
        Aggregate::Json {
            count: 3,
            npages: 2,
            out: vec![json!({"entry": "A"}), json!({"entry": "B"}), json!({"entry": "C"})],
        }
    );
    assert_eq!(test.pages_requested(), vec![0, 1]);
}

#[test]
fn test_fetch_all_text_concatenates_pages() {
    let test = TestClient::new(1);
    test.push_counts(2, 2);
    test.push_text("data_structure_1\n_x 1\n");
    test.push_text("data_structure_2\n_x 2\n");

    let engine = test.engine();
    let aggregate = engine.fetch_all_str(&Query::new(), "cif").unwrap();

    assert_eq!(
        aggregate,
        Aggregate::Cif("data_structure_1\n_x 1\ndata_structure_2\n_x 2\n".to_string())
    );
}

#[test]
fn test_fetch_all_no_matches() {
    let test = TestClient::new(2);
    test.push_counts(0, 0);

    let engine = test.engine();
    let aggregate = engine.fetch_all(&Query::new(), Format::Json).unwrap();

    assert_eq!(
        aggregate,
        Aggregate::Json {
            count: 0,
            npages: 0,
            out: vec![],
        }
    );
}

#[test]
fn test_fetch_all_fails_as_a_whole() {
    let test = TestClient::new(1);
    test.push_counts(2, 2);
    test.push_page(&[untyped("A")]);
    test.transport
        .push_error(TransportError::Request("connection reset".to_string()));

    let engine = test.engine();
    let result = engine.fetch_all(&Query::new(), Format::Json);

    assert!(matches!(result, Err(QueryError::Transport(_))));
}

#[test]
fn test_fetch_all_unknown_selector_sends_nothing() {
    let test = TestClient::new(1);

    let engine = test.engine();
    let result = engine.fetch_all_str(&Query::new(), "xml");

    assert!(matches!(result, Err(QueryError::UnsupportedFormat(ref s)) if s == "xml"));
    assert!(test.requests().is_empty());
}
