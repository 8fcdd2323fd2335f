//! Error types for the redcap-cube library.

use std::path::PathBuf;

use oxigraph::model::{IriParseError, LanguageTagParseError};
use oxigraph::sparql::EvaluationError;
use oxigraph::store::StorageError;
use thiserror::Error;

/// Main error type for cube compilation.
#[derive(Debug, Error)]
pub enum CubeError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error (canonical row encoding, reports).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the underlying triple store.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Error evaluating a SPARQL query.
    #[error("Query error: {0}")]
    Query(#[from] EvaluationError),

    /// Error rendering the graph to text.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// A value that should be an IRI is not one.
    #[error("Invalid IRI '{iri}': {source}")]
    InvalidIri {
        iri: String,
        #[source]
        source: IriParseError,
    },

    /// A language tag in the slice definitions is not valid BCP47.
    #[error("Invalid language tag '{tag}': {source}")]
    InvalidLanguageTag {
        tag: String,
        #[source]
        source: LanguageTagParseError,
    },

    /// A prefix was used that is not bound in the term registry.
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// A choice entry is not a single `code,label` pair.
    #[error("Malformed choice '{entry}' for field '{field}': expected exactly one comma")]
    MalformedChoice { field: String, entry: String },

    /// A query passed to `ask` produced solutions or triples instead of a boolean.
    #[error("Expected an ASK query, got a SELECT, CONSTRUCT or DESCRIBE")]
    NotAskQuery,

    /// An observation column has no compiled range.
    #[error("No range compiled for field '{field}'; was the data dictionary compiled?")]
    MissingRange { field: String },
}

/// Result type alias for cube operations.
pub type Result<T> = std::result::Result<T, CubeError>;
