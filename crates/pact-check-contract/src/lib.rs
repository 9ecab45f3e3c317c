#![warn(missing_docs)]
//! # pact-check-contract
//!
//! ## Purpose
//! Parses consumer-driven contract documents (Pact files) into ordered
//! interactions.
//!
//! ## Responsibilities
//! - Decode contract text into a [`ContractDocument`].
//! - Reject documents without an `interactions` array.
//! - Keep interactions in document order.
//!
//! ## Data flow
//! Contract file -> [`load_contract`] / [`parse_contract`] -> ordered
//! [`Interaction`] values consumed by the run orchestrator.
//!
//! ## Ownership and lifetimes
//! Parsed documents are owned values; response bodies are kept as
//! `serde_json::Value` so they can be handed to the validator unchanged.
//!
//! ## Error model
//! Parsing is all-or-nothing. Any failure returns [`ContractError`] and no
//! partially populated document.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Parsed contract document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDocument {
    /// Consumer participant, when declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer: Option<Pacticipant>,
    /// Provider participant, when declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Pacticipant>,
    /// Recorded interactions in document order.
    pub interactions: Vec<Interaction>,
    /// Free-form contract metadata (for example the Pact specification version).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ContractDocument {
    /// Returns a `consumer -> provider` label when both participants are named.
    pub fn participants_label(&self) -> Option<String> {
        match (&self.consumer, &self.provider) {
            (Some(consumer), Some(provider)) => {
                Some(format!("{} -> {}", consumer.name, provider.name))
            }
            _ => None,
        }
    }
}

/// Named contract participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacticipant {
    /// Participant name.
    pub name: String,
}

/// One recorded request/response exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Free-text description; may contain `/`.
    pub description: String,
    /// Provider state the interaction was recorded under.
    #[serde(
        default,
        rename = "providerState",
        skip_serializing_if = "Option::is_none"
    )]
    pub provider_state: Option<String>,
    /// Recorded request, kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,
    /// Recorded response.
    #[serde(default)]
    pub response: InteractionResponse,
}

/// Recorded response of one interaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionResponse {
    /// HTTP status, when recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Response headers, kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Value>,
    /// Response body; `null` when the interaction recorded none.
    #[serde(default)]
    pub body: Value,
}

/// Parses contract text into a document.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON.
/// Returns [`ContractError::Malformed`] when the top level is not an object,
/// `interactions` is missing or not an array, or an interaction lacks a
/// string `description`.
pub fn parse_contract(raw: &str) -> Result<ContractDocument, ContractError> {
    let value: Value = serde_json::from_str(raw).map_err(ContractError::Decode)?;

    let Some(root) = value.as_object() else {
        return Err(ContractError::Malformed(
            "contract document is not a JSON object".to_string(),
        ));
    };

    let Some(raw_interactions) = root.get("interactions").and_then(Value::as_array) else {
        return Err(ContractError::Malformed(
            "contract document has no `interactions` array".to_string(),
        ));
    };

    let interactions = raw_interactions
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            Interaction::deserialize(raw).map_err(|error| {
                ContractError::Malformed(format!("interaction {index}: {error}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ContractDocument {
        consumer: optional_field(root.get("consumer"), "consumer")?,
        provider: optional_field(root.get("provider"), "provider")?,
        interactions,
        metadata: root.get("metadata").cloned(),
    })
}

/// Reads and parses a contract file.
///
/// # Errors
/// Returns [`ContractError::Io`] when the file cannot be read as UTF-8 text,
/// and any [`parse_contract`] error otherwise.
pub fn load_contract(path: &Path) -> Result<ContractDocument, ContractError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ContractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_contract(&raw)
}

fn optional_field<T>(raw: Option<&Value>, field: &str) -> Result<Option<T>, ContractError>
where
    T: for<'de> Deserialize<'de>,
{
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(|error| ContractError::Malformed(format!("{field}: {error}"))),
    }
}

/// Contract loading errors.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Contract file could not be read.
    #[error("cannot read contract '{}': {source}", path.display())]
    Io {
        /// Contract path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// Contract text is not valid JSON.
    #[error("contract decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Contract JSON does not have the expected shape.
    #[error("malformed contract: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for contract parsing.

    use super::*;

    #[test]
    fn missing_body_becomes_null() {
        let document = parse_contract(
            r#"{"interactions": [{"description": "ping", "response": {"status": 204}}]}"#,
        )
        .expect("contract should parse");
        assert_eq!(document.interactions[0].response.body, Value::Null);
        assert_eq!(document.interactions[0].response.status, Some(204));
    }

    #[test]
    fn participants_label_needs_both_names() {
        let document = parse_contract(
            r#"{"consumer": {"name": "web"}, "provider": {"name": "api"}, "interactions": []}"#,
        )
        .expect("contract should parse");
        assert_eq!(document.participants_label().as_deref(), Some("web -> api"));

        let anonymous = parse_contract(r#"{"interactions": []}"#).expect("contract should parse");
        assert_eq!(anonymous.participants_label(), None);
    }
}
