#![warn(missing_docs)]
//! # pact-schema-check binary
//!
//! Validates Pact interactions (or one arbitrary document) against JSON
//! Schema files.
//!
//! Exit codes: 0 success, 2 argument error, 3 nothing tested, 5 validation
//! failed, 10 fatal I/O or load error.

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use pact_check_app::{AppError, RunConfig, check_document, run_interactions};
use pact_check_contract::load_contract;
use pact_check_core::{ExitStatus, UnmatchedPolicy};
use pact_check_report::{OutputFormat, Reporter};
use pact_check_store::DirectorySchemaStore;
use pact_check_validator::{SchemaDraft, ValidatorOptions};
use tracing_subscriber::EnvFilter;

const LOG_FILTER_ENV: &str = "PACT_CHECK_LOG";

/// Contract-to-schema conformance checker.
#[derive(Parser)]
#[command(
    name = "pact-schema-check",
    version = pact_check_app::APP_VERSION,
    about = "Validate Pact interaction responses against JSON Schema files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate every interaction of a contract whose description maps to a
    /// `<description>-schema.json` file.
    Pact {
        /// Contract document (Pact JSON).
        contract: PathBuf,

        /// Directory holding `*-schema.json` files.
        #[arg(long, env = "PACT_CHECK_SCHEMA_DIR", default_value = "schema")]
        schema_dir: PathBuf,

        /// Handling of interactions without a schema file: skip or fail.
        #[arg(long, env = "PACT_CHECK_ON_UNMATCHED", default_value_t = UnmatchedPolicy::Skip)]
        on_unmatched: UnmatchedPolicy,

        /// Compile every schema file anew for each interaction.
        #[arg(long)]
        no_cache: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Validate one JSON document against one schema file.
    Document {
        /// Instance document.
        instance: PathBuf,

        /// Schema file.
        schema: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Options shared by both subcommands.
#[derive(Args)]
struct OutputArgs {
    /// Output format: text or json.
    #[arg(long, env = "PACT_CHECK_FORMAT", default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Force a schema draft (4, 6, 7 or 2019-09) instead of following `$schema`.
    #[arg(long)]
    draft: Option<SchemaDraft>,
}

/// CLI entry point.
fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            let status = if error.use_stderr() {
                ExitStatus::ArgumentError
            } else {
                ExitStatus::Success
            };
            process::exit(status.code());
        }
    };

    init_tracing();

    let status = match execute(cli.command) {
        Ok(status) => status,
        Err(error) => {
            eprintln!("error: {error}");
            error.exit_status()
        }
    };
    process::exit(status.code());
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("error"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn execute(command: Commands) -> Result<ExitStatus, AppError> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    match command {
        Commands::Pact {
            contract,
            schema_dir,
            on_unmatched,
            no_cache,
            output,
        } => {
            let config = RunConfig {
                on_unmatched,
                validator: ValidatorOptions {
                    draft: output.draft,
                },
                cache_schemas: !no_cache,
            };
            tracing::info!(
                contract = %contract.display(),
                schema_dir = %schema_dir.display(),
                policy = %on_unmatched,
                "checking contract"
            );

            let document = load_contract(&contract)?;
            let store = DirectorySchemaStore::new(schema_dir);
            let verdict = run_interactions(&document, &store, &config)?;
            let reporter =
                Reporter::new(output.format).with_header(document.participants_label());
            Ok(reporter.render(&verdict, &mut out, &mut err)?)
        }
        Commands::Document {
            instance,
            schema,
            output,
        } => {
            let config = RunConfig {
                validator: ValidatorOptions {
                    draft: output.draft,
                },
                ..RunConfig::default()
            };
            let verdict = check_document(&instance, &schema, &config)?;
            Ok(Reporter::new(output.format).render(&verdict, &mut out, &mut err)?)
        }
    }
}
