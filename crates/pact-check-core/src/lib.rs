#![warn(missing_docs)]
//! # pact-check-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `pact-schema-check` workspace.
//!
//! ## Responsibilities
//! - Derive schema filenames from interaction descriptions.
//! - Represent per-interaction validation outcomes and the aggregated verdict.
//! - Map a verdict onto the stable process exit status.
//!
//! ## Data flow
//! The orchestrator derives a [`schema_filename_for`] each interaction, records
//! one [`ValidationOutcome`] per interaction, and folds them into a
//! [`RunVerdict`]. The reporter reads the verdict and its [`ExitStatus`].
//!
//! ## Ownership and lifetimes
//! Outcomes own their schema and instance snapshots (`serde_json::Value`) so the
//! verdict outlives the contract document and the schema store it came from.
//!
//! ## Error model
//! Verdict construction and fingerprinting return [`CoreError`] values.
//!
//! ## Example
//! ```rust
//! use pact_check_core::schema_filename_for;
//!
//! assert_eq!(schema_filename_for("get user"), "get user-schema.json");
//! assert_eq!(schema_filename_for("tls/domains"), "tls-domains-schema.json");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Suffix appended to every derived schema filename.
pub const SCHEMA_FILENAME_SUFFIX: &str = "-schema.json";

/// Derives the schema filename for one interaction description.
///
/// # Semantics
/// Every `/` becomes `-` and [`SCHEMA_FILENAME_SUFFIX`] is appended. No other
/// character is escaped, so distinct descriptions such as `a/b` and `a-b`
/// collide on the same filename.
pub fn schema_filename_for(description: &str) -> String {
    let mut filename = description.replace('/', "-");
    filename.push_str(SCHEMA_FILENAME_SUFFIX);
    filename
}

/// What to do with an interaction whose derived schema file does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedPolicy {
    /// Record the interaction as skipped; it does not count toward the verdict.
    #[default]
    Skip,
    /// Record the interaction as a failed outcome.
    Fail,
}

impl FromStr for UnmatchedPolicy {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "fail" => Ok(Self::Fail),
            other => Err(CoreError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for UnmatchedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => f.write_str("skip"),
            Self::Fail => f.write_str("fail"),
        }
    }
}

/// One schema constraint violated by an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// JSON pointer into the validated instance (`""` for the root).
    pub instance_path: String,
    /// JSON pointer into the schema that produced the violation.
    pub schema_path: String,
    /// Violated schema keyword (for example `type` or `required`).
    pub keyword: String,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.instance_path.is_empty() {
            "/"
        } else {
            self.instance_path.as_str()
        };
        write!(
            f,
            "{location}: {} [{} at {}]",
            self.message, self.keyword, self.schema_path
        )
    }
}

/// Result of examining one interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Response body satisfied its schema.
    Valid,
    /// Response body violated its schema.
    Invalid {
        /// Parsed schema the body was checked against.
        schema: Value,
        /// Response body that failed.
        instance: Value,
        /// Every violation found, in engine order.
        violations: Vec<Violation>,
    },
    /// Schema file exists but could not be read or compiled.
    InvalidSchema {
        /// Raw schema text, empty when the file could not be read.
        schema_text: String,
        /// Compile or read error detail.
        detail: String,
    },
    /// No schema file exists and the run treats that as a failure.
    Unmatched,
    /// No schema file exists and the run skips the interaction.
    Skipped,
}

/// Outcome for one interaction, tagged with its document position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Position of the interaction in the contract document.
    pub index: usize,
    /// Interaction description.
    pub description: String,
    /// Derived schema filename.
    pub schema_file: String,
    /// Outcome classification.
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl ValidationOutcome {
    /// Returns `true` when a schema file was found for the interaction.
    pub fn is_matched(&self) -> bool {
        !matches!(self.status, OutcomeStatus::Unmatched | OutcomeStatus::Skipped)
    }

    /// Returns `true` when the outcome counts against the verdict.
    pub fn is_failure(&self) -> bool {
        matches!(
            self.status,
            OutcomeStatus::Invalid { .. } | OutcomeStatus::InvalidSchema { .. } | OutcomeStatus::Unmatched
        )
    }

    /// Returns `true` when the outcome was excluded from the verdict.
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, OutcomeStatus::Skipped)
    }

    /// Returns the recorded violations, empty unless the body was invalid.
    pub fn violations(&self) -> &[Violation] {
        match &self.status {
            OutcomeStatus::Invalid { violations, .. } => violations,
            _ => &[],
        }
    }
}

/// Stable process exit statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    /// Every matched interaction validated.
    Success,
    /// Command-line arguments were rejected.
    ArgumentError,
    /// Nothing was matched, so nothing was tested.
    NoTests,
    /// At least one recorded outcome failed.
    ValidationFailed,
    /// Run-level I/O or load failure.
    Fatal,
}

impl ExitStatus {
    /// Numeric process exit code.
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::ArgumentError => 2,
            Self::NoTests => 3,
            Self::ValidationFailed => 5,
            Self::Fatal => 10,
        }
    }
}

/// Aggregated result of one run, outcomes in document order.
///
/// Only [`RunVerdict::from_outcomes`] builds one, so the index invariant holds
/// for every value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunVerdict {
    outcomes: Vec<ValidationOutcome>,
}

impl RunVerdict {
    /// Builds a verdict from outcomes collected in document order.
    ///
    /// # Errors
    /// Returns [`CoreError::OutcomeOrder`] when `outcomes[i].index != i`.
    pub fn from_outcomes(outcomes: Vec<ValidationOutcome>) -> Result<Self, CoreError> {
        // Invariant:
        // - One outcome per interaction, index-stable for reproducible diffs.
        for (position, outcome) in outcomes.iter().enumerate() {
            if outcome.index != position {
                return Err(CoreError::OutcomeOrder {
                    expected: position,
                    actual: outcome.index,
                });
            }
        }

        Ok(Self { outcomes })
    }

    /// Returns outcomes in document order.
    pub fn outcomes(&self) -> &[ValidationOutcome] {
        &self.outcomes
    }

    /// Number of interactions in the document.
    pub fn total_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of interactions with a schema file.
    pub fn matched_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_matched()).count()
    }

    /// Number of outcomes that count against the verdict.
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_failure()).count()
    }

    /// Number of skipped interactions.
    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_skipped()).count()
    }

    /// Number of valid outcomes.
    pub fn valid_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == OutcomeStatus::Valid)
            .count()
    }

    /// Returns `true` when at least one interaction was tested and nothing failed.
    pub fn is_success(&self) -> bool {
        self.exit_status() == ExitStatus::Success
    }

    /// Derives the exit status.
    ///
    /// # Semantics
    /// "Nothing tested" wins over "failed": a document whose interactions are
    /// all unmatched reports [`ExitStatus::NoTests`] even under
    /// [`UnmatchedPolicy::Fail`].
    pub fn exit_status(&self) -> ExitStatus {
        if self.matched_count() == 0 {
            ExitStatus::NoTests
        } else if self.failed_count() > 0 {
            ExitStatus::ValidationFailed
        } else {
            ExitStatus::Success
        }
    }

    /// SHA-256 hex digest over the serialized outcomes.
    ///
    /// Two runs over the same document and schema set yield the same digest.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when serialization fails.
    pub fn fingerprint(&self) -> Result<String, CoreError> {
        let encoded = serde_json::to_vec(&self.outcomes)?;
        let digest = Sha256::digest(&encoded);
        Ok(hex::encode(digest))
    }
}

/// Error type for core model failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Outcomes were not supplied in document order.
    #[error("outcome order violation: expected index {expected}, got {actual}")]
    OutcomeOrder {
        /// Expected document index.
        expected: usize,
        /// Index carried by the outcome.
        actual: usize,
    },
    /// Unknown unmatched-interaction policy name.
    #[error("unknown unmatched policy '{0}': expected 'skip' or 'fail'")]
    UnknownPolicy(String),
    /// JSON encoding failure.
    #[error("verdict codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    //! Unit tests for verdict aggregation.

    use super::*;

    fn outcome(index: usize, status: OutcomeStatus) -> ValidationOutcome {
        ValidationOutcome {
            index,
            description: format!("interaction {index}"),
            schema_file: schema_filename_for(&format!("interaction {index}")),
            status,
        }
    }

    #[test]
    fn rejects_out_of_order_outcomes() {
        let result = RunVerdict::from_outcomes(vec![
            outcome(1, OutcomeStatus::Valid),
            outcome(0, OutcomeStatus::Valid),
        ]);
        assert!(matches!(
            result,
            Err(CoreError::OutcomeOrder {
                expected: 0,
                actual: 1
            })
        ));
    }

    #[test]
    fn skipped_outcomes_do_not_count_as_failures() {
        let verdict = RunVerdict::from_outcomes(vec![
            outcome(0, OutcomeStatus::Skipped),
            outcome(1, OutcomeStatus::Valid),
        ])
        .expect("ordered outcomes");
        assert_eq!(verdict.matched_count(), 1);
        assert_eq!(verdict.skipped_count(), 1);
        assert_eq!(verdict.exit_status(), ExitStatus::Success);
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("FAIL".parse::<UnmatchedPolicy>().unwrap(), UnmatchedPolicy::Fail);
        assert_eq!(" skip ".parse::<UnmatchedPolicy>().unwrap(), UnmatchedPolicy::Skip);
        assert!("ignore".parse::<UnmatchedPolicy>().is_err());
    }
}
