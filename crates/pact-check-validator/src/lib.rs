#![warn(missing_docs)]
//! # pact-check-validator
//!
//! ## Purpose
//! Wraps the `jsonschema` engine behind a small compile/run interface.
//!
//! ## Responsibilities
//! - Compile schema text into a reusable [`CompiledSchema`].
//! - Run a compiled schema against an instance and collect every violation.
//!
//! ## Ownership and lifetimes
//! [`SchemaValidator`] is a plain value holding options only; compiled schemas
//! are owned by the caller, so nothing accumulates between runs.
//!
//! ## Error model
//! Schemas that are not JSON, or not structurally valid for the selected
//! draft, return [`ValidatorError::InvalidSchema`]. Instance violations are
//! data ([`Evaluation`]), not errors.

use std::fmt;
use std::str::FromStr;

use jsonschema::{Draft, JSONSchema};
use pact_check_core::Violation;
use serde_json::Value;
use thiserror::Error;

/// Explicitly selectable JSON Schema drafts.
///
/// Without an explicit draft the engine honours the schema's `$schema`
/// keyword and falls back to draft 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDraft {
    /// Draft 4.
    Draft4,
    /// Draft 6.
    Draft6,
    /// Draft 7.
    Draft7,
    /// Draft 2019-09.
    Draft201909,
}

impl SchemaDraft {
    fn engine_draft(self) -> Draft {
        match self {
            Self::Draft4 => Draft::Draft4,
            Self::Draft6 => Draft::Draft6,
            Self::Draft7 => Draft::Draft7,
            Self::Draft201909 => Draft::Draft201909,
        }
    }
}

impl FromStr for SchemaDraft {
    type Err = ValidatorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "4" | "draft4" | "draft-04" => Ok(Self::Draft4),
            "6" | "draft6" | "draft-06" => Ok(Self::Draft6),
            "7" | "draft7" | "draft-07" => Ok(Self::Draft7),
            "2019-09" | "201909" | "draft2019-09" => Ok(Self::Draft201909),
            other => Err(ValidatorError::UnknownDraft(other.to_string())),
        }
    }
}

impl fmt::Display for SchemaDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft4 => f.write_str("draft-04"),
            Self::Draft6 => f.write_str("draft-06"),
            Self::Draft7 => f.write_str("draft-07"),
            Self::Draft201909 => f.write_str("2019-09"),
        }
    }
}

/// Validator configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Forced draft; `None` follows `$schema`.
    pub draft: Option<SchemaDraft>,
}

/// Schema text plus its compiled predicate.
pub struct CompiledSchema {
    text: String,
    document: Value,
    compiled: JSONSchema,
}

impl CompiledSchema {
    /// Raw schema text as read from the store.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed schema document.
    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

/// Result of running one compiled schema against one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Violations in engine order; empty when valid.
    pub violations: Vec<Violation>,
}

impl Evaluation {
    /// Returns `true` when no constraint was violated.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Compiles and runs schemas with fixed options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator {
    options: ValidatorOptions,
}

impl SchemaValidator {
    /// Creates a validator with explicit options.
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    /// Returns configured options.
    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    /// Compiles schema text.
    ///
    /// # Errors
    /// Returns [`ValidatorError::InvalidSchema`] when the text is not JSON or
    /// is not a valid schema.
    pub fn compile(&self, schema_text: &str) -> Result<CompiledSchema, ValidatorError> {
        let document: Value = serde_json::from_str(schema_text).map_err(|error| {
            ValidatorError::InvalidSchema(format!("schema is not valid JSON: {error}"))
        })?;

        let mut options = JSONSchema::options();
        if let Some(draft) = self.options.draft {
            options.with_draft(draft.engine_draft());
        }

        let compiled = options
            .compile(&document)
            .map_err(|error| ValidatorError::InvalidSchema(describe_compile_error(&error)))?;

        Ok(CompiledSchema {
            text: schema_text.to_string(),
            document,
            compiled,
        })
    }

    /// Runs a compiled schema against an instance, collecting every violation.
    pub fn run(&self, schema: &CompiledSchema, instance: &Value) -> Evaluation {
        let violations = match schema.compiled.validate(instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|error| {
                    let schema_path = error.schema_path.to_string();
                    Violation {
                        instance_path: error.instance_path.to_string(),
                        keyword: keyword_of(&schema_path),
                        schema_path,
                        message: error.to_string(),
                    }
                })
                .collect(),
        };

        Evaluation { violations }
    }
}

fn describe_compile_error(error: &jsonschema::ValidationError<'_>) -> String {
    let location = error.instance_path.to_string();
    if location.is_empty() {
        format!("schema does not compile: {error}")
    } else {
        format!("schema does not compile at {location}: {error}")
    }
}

/// Last non-index segment of a schema pointer.
fn keyword_of(schema_path: &str) -> String {
    schema_path
        .rsplit('/')
        .find(|segment| !segment.is_empty() && segment.parse::<usize>().is_err())
        .unwrap_or("schema")
        .to_string()
}

/// Validator adapter errors.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// Schema text could not be compiled.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// Unsupported draft name.
    #[error("unknown schema draft '{0}': expected 4, 6, 7 or 2019-09")]
    UnknownDraft(String),
}
