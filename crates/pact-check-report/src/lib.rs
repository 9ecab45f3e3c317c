#![warn(missing_docs)]
//! # pact-check-report
//!
//! ## Purpose
//! Renders run verdicts for humans (text) or tools (JSON).
//!
//! ## Responsibilities
//! - Print one summary line per interaction on the output stream.
//! - Dump schema, instance, and violations for failures on the error stream.
//! - Derive the exit status from the verdict.
//!
//! ## Data flow
//! [`RunVerdict`] -> [`Reporter::render`] -> text/JSON on caller-supplied
//! writers + [`ExitStatus`].
//!
//! ## Error model
//! Writer failures and fingerprint failures surface as [`ReportError`].

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use pact_check_core::{CoreError, ExitStatus, OutcomeStatus, RunVerdict, ValidationOutcome};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

const SEPARATOR: &str = "--------------------";
const SHORT_FINGERPRINT_LEN: usize = 12;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Line-oriented human text.
    #[default]
    Text,
    /// One JSON document on the output stream.
    Json,
}

impl FromStr for OutputFormat {
    type Err = ReportError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Aggregate counters included in every report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Interactions in the document.
    pub total: usize,
    /// Interactions with a schema file.
    pub matched: usize,
    /// Valid outcomes.
    pub valid: usize,
    /// Outcomes counting against the verdict.
    pub failed: usize,
    /// Skipped interactions.
    pub skipped: usize,
    /// Process exit code.
    pub exit_code: i32,
    /// Verdict fingerprint.
    pub fingerprint: String,
}

impl Summary {
    /// Computes counters for a verdict.
    ///
    /// # Errors
    /// Returns [`ReportError::Core`] when the fingerprint cannot be computed.
    pub fn of(verdict: &RunVerdict) -> Result<Self, ReportError> {
        Ok(Self {
            total: verdict.total_count(),
            matched: verdict.matched_count(),
            valid: verdict.valid_count(),
            failed: verdict.failed_count(),
            skipped: verdict.skipped_count(),
            exit_code: verdict.exit_status().code(),
            fingerprint: verdict.fingerprint()?,
        })
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    contract: Option<&'a str>,
    summary: Summary,
    outcomes: &'a [ValidationOutcome],
}

/// Verdict renderer.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    format: OutputFormat,
    header: Option<String>,
}

impl Reporter {
    /// Creates a reporter for one output format.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            header: None,
        }
    }

    /// Sets a header label (for example `consumer -> provider`).
    pub fn with_header(mut self, header: Option<String>) -> Self {
        self.header = header;
        self
    }

    /// Renders a verdict and returns its exit status.
    ///
    /// # Errors
    /// Returns [`ReportError::Io`] when a writer fails.
    pub fn render(
        &self,
        verdict: &RunVerdict,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<ExitStatus, ReportError> {
        let summary = Summary::of(verdict)?;
        match self.format {
            OutputFormat::Text => self.render_text(verdict, &summary, out, err)?,
            OutputFormat::Json => {
                let report = JsonReport {
                    contract: self.header.as_deref(),
                    summary,
                    outcomes: verdict.outcomes(),
                };
                serde_json::to_writer_pretty(&mut *out, &report)?;
                writeln!(out)?;
            }
        }

        Ok(verdict.exit_status())
    }

    fn render_text(
        &self,
        verdict: &RunVerdict,
        summary: &Summary,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), ReportError> {
        if let Some(header) = &self.header {
            writeln!(out, "contract {header}")?;
        }

        for outcome in verdict.outcomes() {
            render_outcome(outcome, out, err)?;
        }

        let short = summary
            .fingerprint
            .get(..SHORT_FINGERPRINT_LEN)
            .unwrap_or(&summary.fingerprint);
        writeln!(
            out,
            "checked {} of {} interactions: {} valid, {} failed, {} skipped (fingerprint {short})",
            summary.matched, summary.total, summary.valid, summary.failed, summary.skipped
        )?;

        if verdict.exit_status() == ExitStatus::NoTests {
            writeln!(err, "no tests found")?;
        }
        Ok(())
    }
}

fn render_outcome(
    outcome: &ValidationOutcome,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), ReportError> {
    let label = format!("{} ({})", outcome.description, outcome.schema_file);
    match &outcome.status {
        OutcomeStatus::Valid => writeln!(out, "{label}: valid")?,
        OutcomeStatus::Skipped => writeln!(out, "{label}: skipped")?,
        OutcomeStatus::Unmatched => {
            writeln!(out, "{label}: unmatched")?;
            writeln!(err, "no schema {} for '{}'", outcome.schema_file, outcome.description)?;
        }
        OutcomeStatus::Invalid {
            schema,
            instance,
            violations,
        } => {
            writeln!(err, "{label}: invalid")?;
            writeln!(err, "{SEPARATOR}")?;
            writeln!(err, "{}", pretty(schema))?;
            writeln!(err, "{SEPARATOR}")?;
            writeln!(err, "{}", pretty(instance))?;
            writeln!(err, "{SEPARATOR}")?;
            for violation in violations {
                writeln!(err, "  - {violation}")?;
            }
            writeln!(out, "{label}: invalid")?;
        }
        OutcomeStatus::InvalidSchema {
            schema_text,
            detail,
        } => {
            writeln!(err, "{label}: invalid schema")?;
            writeln!(err, "{SEPARATOR}")?;
            writeln!(err, "{schema_text}")?;
            writeln!(err, "{SEPARATOR}")?;
            writeln!(err, "  - {detail}")?;
            writeln!(out, "{label}: invalid schema")?;
        }
    }
    Ok(())
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Reporter error type.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Output stream failure.
    #[error("report write failure: {0}")]
    Io(#[from] std::io::Error),
    /// JSON report encoding failure.
    #[error("report encoding failure: {0}")]
    Encode(#[from] serde_json::Error),
    /// Verdict fingerprint failure.
    #[error("report verdict failure: {0}")]
    Core(#[from] CoreError),
    /// Unsupported output format name.
    #[error("unknown output format '{0}': expected 'text' or 'json'")]
    UnknownFormat(String),
}
