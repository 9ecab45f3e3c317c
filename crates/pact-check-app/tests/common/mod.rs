//! Shared fixtures for app integration tests.

use pact_check_contract::{ContractDocument, parse_contract};
use pact_check_store::InMemorySchemaStore;
use serde_json::{Value, json};

/// Schema requiring `name` to be a string.
pub const NAME_IS_STRING: &str = r#"{
  "type": "object",
  "required": ["name"],
  "properties": {"name": {"type": "string"}}
}"#;

/// Schema requiring `name` to be a number.
#[allow(dead_code)]
pub const NAME_IS_NUMBER: &str = r#"{
  "type": "object",
  "required": ["name"],
  "properties": {"name": {"type": "number"}}
}"#;

/// Builds a contract document from `(description, body)` pairs.
#[allow(dead_code)]
pub fn contract(interactions: &[(&str, Value)]) -> ContractDocument {
    parse_contract(&contract_text(interactions)).expect("fixture contract should parse")
}

/// Serializes `(description, body)` pairs as Pact JSON text.
#[allow(dead_code)]
pub fn contract_text(interactions: &[(&str, Value)]) -> String {
    let interactions: Vec<Value> = interactions
        .iter()
        .map(|(description, body)| {
            json!({
                "description": description,
                "request": {"method": "GET", "path": "/"},
                "response": {"status": 200, "body": body}
            })
        })
        .collect();
    json!({
        "consumer": {"name": "dashboard"},
        "provider": {"name": "user-service"},
        "interactions": interactions
    })
    .to_string()
}

/// Store holding the `get user` schema.
#[allow(dead_code)]
pub fn user_store(schema: &str) -> InMemorySchemaStore {
    InMemorySchemaStore::new().with_schema("get user-schema.json", schema)
}
