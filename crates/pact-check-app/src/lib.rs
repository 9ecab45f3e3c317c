#![warn(missing_docs)]
//! # pact-check-app
//!
//! ## Purpose
//! Orchestrates contract loading, schema matching, validation, and verdict
//! aggregation for `pact-schema-check`.
//!
//! ## Responsibilities
//! - Load the contract document and snapshot the schema store once per run.
//! - Match each interaction to its derived schema file under an explicit
//!   [`UnmatchedPolicy`].
//! - Record one outcome per interaction, in document order, without aborting
//!   on per-interaction failures.
//! - Validate a single instance document against a single schema file.
//!
//! ## Data flow
//! Contract file -> [`load_contract`] -> [`run_interactions`] (derive name ->
//! [`SchemaIndex`] lookup -> store read -> compile -> run) -> [`RunVerdict`].
//!
//! ## Error model
//! Run-level setup failures return [`AppError`] and produce no verdict.
//! Per-interaction failures are recorded as [`OutcomeStatus`] values.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use pact_check_contract::{ContractDocument, ContractError, Interaction, load_contract};
use pact_check_core::{
    CoreError, ExitStatus, OutcomeStatus, RunVerdict, UnmatchedPolicy, ValidationOutcome,
    schema_filename_for,
};
use pact_check_report::ReportError;
use pact_check_store::{SchemaIndex, SchemaStore, StoreError};
use pact_check_validator::{CompiledSchema, SchemaValidator, ValidatorOptions};
use serde_json::Value;
use thiserror::Error;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("PACT_CHECK_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Per-run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Handling of interactions without a schema file.
    pub on_unmatched: UnmatchedPolicy,
    /// Validator engine options.
    pub validator: ValidatorOptions,
    /// Compile each schema file at most once per run.
    pub cache_schemas: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            on_unmatched: UnmatchedPolicy::Skip,
            validator: ValidatorOptions::default(),
            cache_schemas: true,
        }
    }
}

/// Validates every interaction of a contract file against `store`.
///
/// # Errors
/// Returns [`AppError::ContractLoad`] when the contract cannot be read or
/// parsed, and [`AppError::Store`] when the store cannot be listed.
pub fn run_contract(
    contract_path: &Path,
    store: &dyn SchemaStore,
    config: &RunConfig,
) -> Result<RunVerdict, AppError> {
    let document = load_contract(contract_path)?;
    run_interactions(&document, store, config)
}

/// Validates every interaction of an already parsed document.
///
/// # Errors
/// Returns [`AppError::Store`] when the store cannot be listed.
pub fn run_interactions(
    document: &ContractDocument,
    store: &dyn SchemaStore,
    config: &RunConfig,
) -> Result<RunVerdict, AppError> {
    let index = store.list_available()?;
    tracing::debug!(
        store = %store.location(),
        schemas = index.len(),
        interactions = document.interactions.len(),
        policy = %config.on_unmatched,
        "starting contract run"
    );

    let validator = SchemaValidator::new(config.validator);
    let mut cache = SchemaCache::new(config.cache_schemas);

    let outcomes = document
        .interactions
        .iter()
        .enumerate()
        .map(|(position, interaction)| {
            examine_interaction(
                position,
                interaction,
                &index,
                store,
                &validator,
                &mut cache,
                config.on_unmatched,
            )
        })
        .collect();

    Ok(RunVerdict::from_outcomes(outcomes)?)
}

/// Validates one instance document against one schema file.
///
/// The result is a one-outcome verdict so it renders like a contract run.
///
/// # Errors
/// Returns [`AppError::ReadInput`] when either file cannot be read and
/// [`AppError::InstanceDecode`] when the instance is not JSON. A schema that
/// does not compile is recorded, not returned.
pub fn check_document(
    instance_path: &Path,
    schema_path: &Path,
    config: &RunConfig,
) -> Result<RunVerdict, AppError> {
    let instance_text = read_input(instance_path)?;
    let instance: Value =
        serde_json::from_str(&instance_text).map_err(|source| AppError::InstanceDecode {
            path: instance_path.to_path_buf(),
            source,
        })?;
    let schema_text = read_input(schema_path)?;

    let validator = SchemaValidator::new(config.validator);
    let status = match validator.compile(&schema_text) {
        Ok(schema) => evaluate(&validator, &schema, &instance),
        Err(error) => OutcomeStatus::InvalidSchema {
            schema_text,
            detail: error.to_string(),
        },
    };

    let outcome = ValidationOutcome {
        index: 0,
        description: instance_path.display().to_string(),
        schema_file: schema_path.display().to_string(),
        status,
    };
    log_outcome(&outcome);
    Ok(RunVerdict::from_outcomes(vec![outcome])?)
}

fn read_input(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

fn examine_interaction(
    position: usize,
    interaction: &Interaction,
    index: &SchemaIndex,
    store: &dyn SchemaStore,
    validator: &SchemaValidator,
    cache: &mut SchemaCache,
    on_unmatched: UnmatchedPolicy,
) -> ValidationOutcome {
    let schema_file = schema_filename_for(&interaction.description);

    let status = if !index.contains(&schema_file) {
        match on_unmatched {
            UnmatchedPolicy::Skip => OutcomeStatus::Skipped,
            UnmatchedPolicy::Fail => OutcomeStatus::Unmatched,
        }
    } else {
        match &*cache.load(&schema_file, store, validator) {
            Ok(schema) => evaluate(validator, schema, &interaction.response.body),
            Err(failure) => OutcomeStatus::InvalidSchema {
                schema_text: failure.schema_text.clone(),
                detail: failure.detail.clone(),
            },
        }
    };

    let outcome = ValidationOutcome {
        index: position,
        description: interaction.description.clone(),
        schema_file,
        status,
    };
    log_outcome(&outcome);
    outcome
}

fn evaluate(validator: &SchemaValidator, schema: &CompiledSchema, instance: &Value) -> OutcomeStatus {
    let evaluation = validator.run(schema, instance);
    if evaluation.is_valid() {
        OutcomeStatus::Valid
    } else {
        OutcomeStatus::Invalid {
            schema: schema.document().clone(),
            instance: instance.clone(),
            violations: evaluation.violations,
        }
    }
}

fn log_outcome(outcome: &ValidationOutcome) {
    let index = outcome.index;
    let description = outcome.description.as_str();
    let schema_file = outcome.schema_file.as_str();
    match &outcome.status {
        OutcomeStatus::Valid => {
            tracing::info!(index, description, schema_file, "interaction valid");
        }
        OutcomeStatus::Skipped => {
            tracing::debug!(index, description, schema_file, "no schema, skipped");
        }
        OutcomeStatus::Unmatched => {
            tracing::warn!(index, description, schema_file, "no schema, recorded as failure");
        }
        OutcomeStatus::Invalid { violations, .. } => {
            tracing::warn!(
                index,
                description,
                schema_file,
                violations = violations.len(),
                "interaction invalid"
            );
        }
        OutcomeStatus::InvalidSchema { detail, .. } => {
            tracing::warn!(index, description, schema_file, %detail, "schema rejected");
        }
    }
}

#[derive(Debug, Clone)]
struct SchemaFailure {
    schema_text: String,
    detail: String,
}

type LoadedSchema = Rc<Result<CompiledSchema, SchemaFailure>>;

/// Run-scoped compile cache keyed by schema filename.
struct SchemaCache {
    enabled: bool,
    entries: HashMap<String, LoadedSchema>,
}

impl SchemaCache {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: HashMap::new(),
        }
    }

    fn load(
        &mut self,
        filename: &str,
        store: &dyn SchemaStore,
        validator: &SchemaValidator,
    ) -> LoadedSchema {
        if let Some(entry) = self.entries.get(filename) {
            return Rc::clone(entry);
        }

        let loaded = Rc::new(compile_from_store(filename, store, validator));
        if self.enabled {
            self.entries.insert(filename.to_string(), Rc::clone(&loaded));
        }
        loaded
    }
}

fn compile_from_store(
    filename: &str,
    store: &dyn SchemaStore,
    validator: &SchemaValidator,
) -> Result<CompiledSchema, SchemaFailure> {
    let schema_text = store.read(filename).map_err(|error| SchemaFailure {
        schema_text: String::new(),
        detail: error.to_string(),
    })?;

    validator
        .compile(&schema_text)
        .map_err(|error| SchemaFailure {
            detail: error.to_string(),
            schema_text,
        })
}

/// App-level fatal error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Contract file missing, unreadable, or malformed.
    #[error("contract load error: {0}")]
    ContractLoad(#[from] ContractError),
    /// Schema store could not be listed.
    #[error("schema store error: {0}")]
    Store(#[from] StoreError),
    /// Verdict model invariant violated.
    #[error("verdict error: {0}")]
    Core(#[from] CoreError),
    /// Explicit input file could not be read.
    #[error("cannot read '{}': {source}", path.display())]
    ReadInput {
        /// Input path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// Instance document is not JSON.
    #[error("instance '{}' is not valid JSON: {source}", path.display())]
    InstanceDecode {
        /// Instance path.
        path: PathBuf,
        /// Decode failure.
        source: serde_json::Error,
    },
    /// Report could not be written.
    #[error("report error: {0}")]
    Report(#[from] ReportError),
}

impl AppError {
    /// Exit status for a fatal error.
    pub fn exit_status(&self) -> ExitStatus {
        ExitStatus::Fatal
    }
}
