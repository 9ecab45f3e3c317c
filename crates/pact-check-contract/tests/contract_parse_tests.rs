//! Integration tests for contract document parsing.

use std::io::Write;

use pact_check_contract::{ContractError, load_contract, parse_contract};
use serde_json::json;

const PACT: &str = r#"{
  "consumer": {"name": "dashboard"},
  "provider": {"name": "user-service"},
  "interactions": [
    {
      "description": "get user",
      "providerState": "user x exists",
      "request": {"method": "GET", "path": "/users/x"},
      "response": {"status": 200, "body": {"name": "x"}}
    },
    {
      "description": "tls/domains",
      "request": {"method": "GET", "path": "/tls/domains"},
      "response": {"status": 200, "body": ["example.test"]}
    }
  ],
  "metadata": {"pactSpecification": {"version": "2.0.0"}}
}"#;

#[test]
fn contract_parse_tests_keeps_document_order() {
    let document = parse_contract(PACT).expect("contract should parse");
    let descriptions: Vec<&str> = document
        .interactions
        .iter()
        .map(|interaction| interaction.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["get user", "tls/domains"]);
    assert_eq!(document.interactions[0].response.body, json!({"name": "x"}));
    assert_eq!(
        document.interactions[0].provider_state.as_deref(),
        Some("user x exists")
    );
    assert_eq!(document.interactions[1].response.body, json!(["example.test"]));
}

#[test]
fn contract_parse_tests_rejects_invalid_json() {
    let error = parse_contract("{ not json").expect_err("should fail");
    assert!(matches!(error, ContractError::Decode(_)));
}

#[test]
fn contract_parse_tests_rejects_missing_interactions() {
    let error = parse_contract(r#"{"consumer": {"name": "x"}}"#).expect_err("should fail");
    assert!(matches!(error, ContractError::Malformed(_)));

    let error = parse_contract(r#"{"interactions": {}}"#).expect_err("should fail");
    assert!(matches!(error, ContractError::Malformed(_)));

    let error = parse_contract("[]").expect_err("should fail");
    assert!(matches!(error, ContractError::Malformed(_)));
}

#[test]
fn contract_parse_tests_is_all_or_nothing() {
    let raw = r#"{"interactions": [
        {"description": "ok", "response": {"body": 1}},
        {"response": {"body": 2}}
    ]}"#;
    let error = parse_contract(raw).expect_err("second interaction lacks description");
    match error {
        ContractError::Malformed(detail) => assert!(detail.starts_with("interaction 1")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn contract_parse_tests_accepts_empty_interactions() {
    let document = parse_contract(r#"{"interactions": []}"#).expect("contract should parse");
    assert!(document.interactions.is_empty());
}

#[test]
fn contract_parse_tests_loads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(PACT.as_bytes()).expect("write pact");
    let document = load_contract(file.path()).expect("contract should load");
    assert_eq!(document.interactions.len(), 2);

    let missing = file.path().with_extension("missing");
    let error = load_contract(&missing).expect_err("missing file");
    assert!(matches!(error, ContractError::Io { .. }));
}
