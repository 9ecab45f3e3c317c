#![warn(missing_docs)]
//! # pact-check-store
//!
//! ## Purpose
//! Resolves derived schema filenames to schema text.
//!
//! ## Responsibilities
//! - Define a backend-agnostic schema store trait.
//! - Snapshot available filenames once per run.
//! - Expose a read-only directory store and a deterministic in-memory store
//!   for tests.
//!
//! ## Data flow
//! Orchestrator calls [`SchemaStore::list_available`] once -> matches derived
//! filenames against the [`SchemaIndex`] snapshot -> reads only matched files
//! through [`SchemaStore::read`].
//!
//! ## Error model
//! Unreadable directories and missing files are reported as [`StoreError`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Immutable snapshot of schema filenames available to one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaIndex {
    filenames: BTreeSet<String>,
}

impl SchemaIndex {
    /// Builds an index from filenames.
    pub fn new<I, S>(filenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filenames: filenames.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` when `filename` is available.
    pub fn contains(&self, filename: &str) -> bool {
        self.filenames.contains(filename)
    }

    /// Number of available schemas.
    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    /// Returns `true` when no schema is available.
    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }

    /// Iterates filenames in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.filenames.iter().map(String::as_str)
    }
}

/// Trait implemented by schema sources.
pub trait SchemaStore {
    /// Lists available schema filenames.
    ///
    /// # Errors
    /// Returns [`StoreError::DirectoryUnreadable`] when the source cannot be
    /// listed.
    fn list_available(&self) -> Result<SchemaIndex, StoreError>;

    /// Reads schema text for one filename.
    ///
    /// # Errors
    /// Returns [`StoreError::SchemaNotFound`] when the file does not exist and
    /// [`StoreError::Read`] for other read failures.
    fn read(&self, filename: &str) -> Result<String, StoreError>;

    /// Human-readable location used in diagnostics.
    fn location(&self) -> String;
}

/// Read-only schema store backed by one directory.
///
/// # Notes
/// Only regular `*.json` files directly inside the directory are listed.
#[derive(Debug, Clone)]
pub struct DirectorySchemaStore {
    root: PathBuf,
}

impl DirectorySchemaStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SchemaStore for DirectorySchemaStore {
    fn list_available(&self) -> Result<SchemaIndex, StoreError> {
        let unreadable = |source| StoreError::DirectoryUnreadable {
            path: self.root.clone(),
            source,
        };

        let mut filenames = BTreeSet::new();
        for entry in std::fs::read_dir(&self.root).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            let is_file = entry
                .file_type()
                .map(|file_type| file_type.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }

            // Non UTF-8 names can never equal a derived filename.
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".json") {
                    filenames.insert(name.to_string());
                }
            }
        }

        tracing::debug!(
            directory = %self.root.display(),
            schemas = filenames.len(),
            "listed schema directory"
        );
        Ok(SchemaIndex { filenames })
    }

    fn read(&self, filename: &str) -> Result<String, StoreError> {
        let path = self.root.join(filename);
        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StoreError::SchemaNotFound(filename.to_string())
            } else {
                StoreError::Read { path, source }
            }
        })
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

/// Deterministic in-memory store for test and CI usage.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchemaStore {
    schemas: BTreeMap<String, String>,
}

impl InMemorySchemaStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one schema.
    pub fn with_schema(mut self, filename: impl Into<String>, text: impl Into<String>) -> Self {
        self.schemas.insert(filename.into(), text.into());
        self
    }
}

impl SchemaStore for InMemorySchemaStore {
    fn list_available(&self) -> Result<SchemaIndex, StoreError> {
        Ok(SchemaIndex::new(self.schemas.keys().cloned()))
    }

    fn read(&self, filename: &str) -> Result<String, StoreError> {
        self.schemas
            .get(filename)
            .cloned()
            .ok_or_else(|| StoreError::SchemaNotFound(filename.to_string()))
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

/// Schema store error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Schema directory could not be listed.
    #[error("cannot list schema directory '{}': {source}", path.display())]
    DirectoryUnreadable {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// Requested schema file does not exist.
    #[error("schema not found: {0}")]
    SchemaNotFound(String),
    /// Schema file exists but could not be read as UTF-8 text.
    #[error("cannot read schema '{}': {source}", path.display())]
    Read {
        /// Schema path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}
