//! Integration tests for fatal run-level failures and single-document checks.

mod common;

use pact_check_app::{AppError, RunConfig, check_document, run_contract};
use pact_check_core::{ExitStatus, OutcomeStatus};
use pact_check_store::{DirectorySchemaStore, InMemorySchemaStore};

#[test]
fn run_setup_failure_tests_missing_contract_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let error = run_contract(
        &dir.path().join("absent.json"),
        &InMemorySchemaStore::new(),
        &RunConfig::default(),
    )
    .expect_err("contract is missing");
    assert!(matches!(error, AppError::ContractLoad(_)));
    assert_eq!(error.exit_status(), ExitStatus::Fatal);
}

#[test]
fn run_setup_failure_tests_malformed_contract_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("pact.json");
    std::fs::write(&path, r#"{"interactions": "nope"}"#).expect("write contract");

    let error = run_contract(&path, &InMemorySchemaStore::new(), &RunConfig::default())
        .expect_err("contract is malformed");
    assert!(matches!(error, AppError::ContractLoad(_)));
}

#[test]
fn run_setup_failure_tests_unreadable_schema_dir_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("pact.json");
    std::fs::write(&path, common::contract_text(&[])).expect("write contract");

    let store = DirectorySchemaStore::new(dir.path().join("no-such-dir"));
    let error = run_contract(&path, &store, &RunConfig::default()).expect_err("dir is missing");
    assert!(matches!(error, AppError::Store(_)));
}

#[test]
fn run_setup_failure_tests_document_mode_validates_one_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let instance = dir.path().join("user.json");
    let schema = dir.path().join("user-schema.json");
    std::fs::write(&instance, r#"{"name": "x"}"#).expect("write instance");
    std::fs::write(&schema, common::NAME_IS_NUMBER).expect("write schema");

    let verdict =
        check_document(&instance, &schema, &RunConfig::default()).expect("check should complete");
    assert_eq!(verdict.total_count(), 1);
    assert_eq!(verdict.exit_status(), ExitStatus::ValidationFailed);
    assert_eq!(verdict.outcomes()[0].violations()[0].instance_path, "/name");

    std::fs::write(&schema, common::NAME_IS_STRING).expect("rewrite schema");
    let verdict =
        check_document(&instance, &schema, &RunConfig::default()).expect("check should complete");
    assert_eq!(verdict.exit_status(), ExitStatus::Success);
}

#[test]
fn run_setup_failure_tests_document_mode_records_bad_schema() {
    let dir = tempfile::tempdir().expect("temp dir");
    let instance = dir.path().join("user.json");
    let schema = dir.path().join("user-schema.json");
    std::fs::write(&instance, "{}").expect("write instance");
    std::fs::write(&schema, "{ not json").expect("write schema");

    let verdict =
        check_document(&instance, &schema, &RunConfig::default()).expect("check should complete");
    assert!(matches!(
        verdict.outcomes()[0].status,
        OutcomeStatus::InvalidSchema { .. }
    ));

    std::fs::write(&instance, "{ not json").expect("rewrite instance");
    let error = check_document(&instance, &schema, &RunConfig::default())
        .expect_err("instance is not JSON");
    assert!(matches!(error, AppError::InstanceDecode { .. }));
}
